//! Error types for object graph construction
//!
//! Provides error handling for:
//! - Path traversal (see [`PathError`])
//! - Link resolution ([`LinkError`])
//! - Everything the loader records while building ([`LoadError`])
//! - The aggregated result of a failed build ([`LoadErrors`])

use crate::convert::ConvertError;
use crate::path::{PathAddress, PathError};
use std::fmt::{self, Display, Formatter};

/// Errors during link resolution
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    /// Redirection chain longer than the configured bound (or cyclic)
    #[error("reached max links depth {max} for '{target}'")]
    DepthExceeded { target: PathAddress, max: usize },

    /// Resolved target holds no value
    #[error("unable to link '{src}' to nil value '{target}'")]
    EmptyTarget { src: PathAddress, target: PathAddress },

    /// Resolved target cannot be read
    #[error("unreachable link target: {0}")]
    Target(PathError),

    /// Source linked twice while redeclarations are rejected
    #[error("link redeclared to '{ignored}', keeping '{previous}'")]
    Redeclared {
        previous: PathAddress,
        ignored: PathAddress,
    },
}

/// Errors recorded by the loader
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// Path traversal or assignment failed
    #[error(transparent)]
    Path(#[from] PathError),

    /// Type name absent from the registry
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Link could not be resolved
    #[error(transparent)]
    UnresolvedLink(#[from] LinkError),

    /// Converter rejected the value
    #[error(transparent)]
    Conversion(#[from] ConvertError),

    /// Input description could not be interpreted
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Classification of a [`LoadError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A segment has no location in the current shape
    InvalidPath,
    /// Value does not fit the declared kind
    InvalidType,
    /// Type name absent from the registry
    UnknownType,
    /// Link target missing, empty, or too deep
    UnresolvedLink,
    /// Converter failed
    Conversion,
    /// Input description could not be interpreted
    MalformedInput,
}

impl LoadError {
    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Path(PathError::InvalidType { .. }) => ErrorKind::InvalidType,
            Self::Path(_) => ErrorKind::InvalidPath,
            Self::UnknownType(_) => ErrorKind::UnknownType,
            Self::UnresolvedLink(_) => ErrorKind::UnresolvedLink,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
        }
    }
}

/// A recorded failure and the path where it occurred
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{cause} at '{path}'")]
pub struct ErrorRecord {
    /// Underlying failure
    pub cause: LoadError,
    /// Location involved
    pub path: PathAddress,
}

impl ErrorRecord {
    /// Create record
    #[inline]
    #[must_use]
    pub fn new(cause: LoadError, path: PathAddress) -> Self {
        Self { cause, path }
    }

    /// Classify the underlying failure
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }
}

/// Every failure recorded over a loader's lifetime, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadErrors(Vec<ErrorRecord>);

impl LoadErrors {
    /// Wrap records
    #[inline]
    #[must_use]
    pub fn new(records: Vec<ErrorRecord>) -> Self {
        Self(records)
    }

    /// All records
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[ErrorRecord] {
        &self.0
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over records
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.0.iter()
    }

    /// Records whose path renders as `path`
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ErrorRecord> + 'a {
        self.0.iter().filter(move |record| record.path.to_string() == path)
    }

    /// Classification of every record, in order
    #[must_use]
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.0.iter().map(ErrorRecord::kind).collect()
    }

    /// Unwrap records
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<ErrorRecord> {
        self.0
    }
}

impl Display for LoadErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, record) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadErrors {}

impl From<Vec<ErrorRecord>> for LoadErrors {
    fn from(records: Vec<ErrorRecord>) -> Self {
        Self(records)
    }
}

impl IntoIterator for LoadErrors {
    type Item = ErrorRecord;
    type IntoIter = std::vec::IntoIter<ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Result type alias for construction entry points
pub type LoadResult<T> = Result<T, LoadErrors>;
