//! Path addresses into a value tree
//!
//! Provides [`PathAddress`] for hierarchical addressing of locations inside a
//! [`Value`] tree, along with the traversals used by the loader: [`PathAddress::set`],
//! [`PathAddress::get`] and [`PathAddress::declared_kind`].

use crate::value::{Kind, Value};
use indexmap::map::Entry;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Largest number of zero values a single assignment may append to a list
pub const MAX_LIST_GROWTH: usize = 1 << 16;

/// Address of a location within a value tree
///
/// Segments are field names, map keys or sequence indices, all stored as text.
///
/// # Examples
/// - `["server", "listener", "port"]` → `server.listener.port`
/// - `["pipeline", "stages", "0"]` → `pipeline.stages.0`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathAddress(Vec<String>);

impl PathAddress {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Create path from a single segment
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment.into());
        Self(segments)
    }

    /// Append a sequence index, returning new path
    #[inline]
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    /// Extend with multiple segments
    #[inline]
    #[must_use]
    pub fn extend(&self, segments: &[impl AsRef<str>]) -> Self {
        let mut new = Vec::with_capacity(self.0.len() + segments.len());
        new.extend(self.0.iter().cloned());
        new.extend(segments.iter().map(|seg| seg.as_ref().to_string()));
        Self(new)
    }

    /// Concatenate two paths into a freshly allocated one
    #[inline]
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        self.extend(&other.0)
    }

    /// First `len` segments (clamped to the path length)
    #[inline]
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Segments after the first `len` (empty when `len` covers the path)
    #[inline]
    #[must_use]
    pub fn suffix(&self, len: usize) -> Self {
        Self(self.0[len.min(self.0.len())..].to_vec())
    }

    /// Check if this path is a prefix of another
    ///
    /// # Examples
    /// - `server.listener` is prefix of `server.listener.port`
    /// - `server.listener` is NOT prefix of `server.other`
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Assign `value` at this path inside `root`
    ///
    /// Missing intermediates are created when the enclosing location is a
    /// dynamic container; sequences grow with zero values when an index at
    /// or past their end is assigned.
    ///
    /// # Errors
    /// - [`PathError::InvalidPath`] if an intermediate segment has no location
    /// - [`PathError::InvalidType`] if `value` does not fit the declared kind
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), PathError> {
        set_in(root, &Kind::Any, &self.0, value)
    }

    /// Read the value at this path inside `root`
    ///
    /// # Errors
    /// Returns [`PathError::InvalidPath`] if any segment is missing
    pub fn get(&self, root: &Value) -> Result<Value, PathError> {
        get_in(root, &self.0)
    }

    /// Statically declared kind at this path
    ///
    /// For an object field this is the field's declaration, regardless of
    /// what (if anything) the field currently holds.
    ///
    /// # Errors
    /// Returns [`PathError::InvalidPath`] if the path leaves the known shape
    pub fn declared_kind(&self, root: &Value) -> Result<Kind, PathError> {
        declared_in(Some(root), Kind::Any, &self.0)
    }
}

fn parse_index(segment: &str, len: usize) -> Result<usize, PathError> {
    segment
        .parse::<usize>()
        .map_err(|_| PathError::missing(segment, format!("list of {len}")))
}

fn set_in(
    current: &mut Value,
    declared: &Kind,
    segments: &[String],
    value: Value,
) -> Result<(), PathError> {
    let Some((head, rest)) = segments.split_first() else {
        *current = declared.admit(value)?;
        return Ok(());
    };

    match current {
        Value::Map(entries) => {
            let kind = declared.element().unwrap_or(Kind::Any);
            if rest.is_empty() {
                entries.insert(head.clone(), kind.admit(value)?);
                return Ok(());
            }
            let child = match entries.entry(head.clone()) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => {
                    let fresh = kind
                        .container()
                        .ok_or_else(|| PathError::missing(head, kind.to_string()))?;
                    slot.insert(fresh)
                }
            };
            set_in(child, &kind, rest, value)
        }
        Value::List(items) => {
            let kind = declared.element().unwrap_or(Kind::Any);
            let index = parse_index(head, items.len())?;
            if index >= items.len() {
                if index - items.len() >= MAX_LIST_GROWTH {
                    return Err(PathError::missing(head, format!("list of {}", items.len())));
                }
                items.resize(index + 1, kind.zero());
            }
            if rest.is_empty() {
                items[index] = kind.admit(value)?;
                Ok(())
            } else {
                set_in(&mut items[index], &kind, rest, value)
            }
        }
        Value::Object(object) => {
            let (kind, child) = {
                let guard = object.read();
                (guard.field_kind(head), guard.field(head))
            };
            let (Some(kind), Some(mut child)) = (kind, child) else {
                return Err(PathError::missing(head, object.type_name()));
            };
            if rest.is_empty() {
                let admitted = kind.admit(value)?;
                return object.write().set_field(head, admitted);
            }
            set_in(&mut child, &kind, rest, value)?;
            object.write().set_field(head, child)
        }
        Value::Null => {
            let fresh = declared
                .container()
                .ok_or_else(|| PathError::missing(head, "null"))?;
            *current = fresh;
            set_in(current, declared, segments, value)
        }
        other => Err(PathError::missing(head, other.kind_name())),
    }
}

fn get_in(current: &Value, segments: &[String]) -> Result<Value, PathError> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(current.clone());
    };

    match current {
        Value::Map(entries) => {
            let child = entries
                .get(head)
                .ok_or_else(|| PathError::missing(head, "map"))?;
            get_in(child, rest)
        }
        Value::List(items) => {
            let index = parse_index(head, items.len())?;
            let child = items
                .get(index)
                .ok_or_else(|| PathError::missing(head, format!("list of {}", items.len())))?;
            get_in(child, rest)
        }
        Value::Object(object) => {
            let child = object
                .read()
                .field(head)
                .ok_or_else(|| PathError::missing(head, object.type_name()))?;
            get_in(&child, rest)
        }
        other => Err(PathError::missing(head, other.kind_name())),
    }
}

fn declared_in(
    current: Option<&Value>,
    declared: Kind,
    segments: &[String],
) -> Result<Kind, PathError> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(declared);
    };

    if let Some(element) = declared.element() {
        let child = match current {
            Some(Value::Map(entries)) => entries.get(head),
            Some(Value::List(items)) => head.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        return declared_in(child, element, rest);
    }

    match current {
        Some(Value::Object(object)) => {
            let (kind, child) = {
                let guard = object.read();
                (guard.field_kind(head), guard.field(head))
            };
            let kind = kind.ok_or_else(|| PathError::missing(head, object.type_name()))?;
            declared_in(child.as_ref(), kind, rest)
        }
        Some(Value::Map(entries)) => declared_in(entries.get(head), Kind::Any, rest),
        Some(Value::List(items)) => {
            let child = head.parse::<usize>().ok().and_then(|i| items.get(i));
            declared_in(child, Kind::Any, rest)
        }
        // Everything beneath an unset dynamic slot is dynamic.
        None | Some(Value::Null) if declared == Kind::Any => Ok(Kind::Any),
        None | Some(Value::Null) => Err(PathError::missing(head, declared.to_string())),
        Some(other) => Err(PathError::missing(head, other.kind_name())),
    }
}

impl Display for PathAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for PathAddress {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment(s.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<Vec<String>> for PathAddress {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[String]> for PathAddress {
    fn from(segments: &[String]) -> Self {
        Self(segments.to_vec())
    }
}

impl Default for PathAddress {
    fn default() -> Self {
        Self::root()
    }
}

/// Errors related to path parsing and traversal
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path text
    #[error("path '{0}' contains empty segment")]
    EmptySegment(String),

    /// Segment has no corresponding location in the current shape
    #[error("invalid path: no '{segment}' in {within}")]
    InvalidPath { segment: String, within: String },

    /// Value does not fit the declared kind of the location
    #[error("invalid type: expected {expected}, got {found}")]
    InvalidType { expected: Kind, found: String },
}

impl PathError {
    /// Create an invalid path error for `segment` inside `within`
    pub fn missing(segment: impl Into<String>, within: impl Into<String>) -> Self {
        Self::InvalidPath {
            segment: segment.into(),
            within: within.into(),
        }
    }

    /// Create an invalid type error for `value` assigned to `expected`
    #[must_use]
    pub fn mismatch(expected: Kind, value: &Value) -> Self {
        Self::InvalidType {
            expected,
            found: value.describe(),
        }
    }

    /// Check if this is an invalid type error
    #[inline]
    #[must_use]
    pub fn is_invalid_type(&self) -> bool {
        matches!(self, Self::InvalidType { .. })
    }
}
