//! Value tree and the addressable-object capability
//!
//! - [`Value`]: a node of the tree under construction
//! - [`Kind`]: the declared type of a location
//! - [`Object`]: records that can enumerate, read and write their fields by name
//! - [`ObjectRef`]: shared, lock-guarded handle to a record instance
//! - [`Field`]: Rust field types usable inside an [`object!`](crate::object) record

use crate::path::PathError;
use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::Any;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Declared type of a location in the value tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Dynamic slot, holds anything
    Any,
    /// Boolean leaf
    Bool,
    /// Signed integer leaf
    Int,
    /// Floating point leaf
    Float,
    /// Text leaf
    Str,
    /// Duration leaf
    Duration,
    /// Dynamic slot restricted to records (or empty)
    Object,
    /// Sequence with a declared element kind
    List(Box<Kind>),
    /// String-keyed map with a declared element kind
    Map(Box<Kind>),
}

impl Kind {
    /// Sequence of `element`
    #[inline]
    #[must_use]
    pub fn list(element: Kind) -> Self {
        Self::List(Box::new(element))
    }

    /// Map of `element`
    #[inline]
    #[must_use]
    pub fn map(element: Kind) -> Self {
        Self::Map(Box::new(element))
    }

    /// Element kind of a container kind
    #[inline]
    #[must_use]
    pub fn element(&self) -> Option<Kind> {
        match self {
            Self::List(element) | Self::Map(element) => Some((**element).clone()),
            _ => None,
        }
    }

    /// Zero value, used to pad sequences that grow past their end
    #[must_use]
    pub fn zero(&self) -> Value {
        match self {
            Self::Any | Self::Object => Value::Null,
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::Str => Value::Str(String::new()),
            Self::Duration => Value::Duration(Duration::ZERO),
            Self::List(_) => Value::List(Vec::new()),
            Self::Map(_) => Value::Map(IndexMap::new()),
        }
    }

    /// Empty container materialized when a path walks through a missing location
    #[must_use]
    pub fn container(&self) -> Option<Value> {
        match self {
            Self::Any | Self::Map(_) => Some(Value::Map(IndexMap::new())),
            Self::List(_) => Some(Value::List(Vec::new())),
            _ => None,
        }
    }

    /// Check `value` against this kind
    ///
    /// Only lossless numeric widening is applied: integral floats are accepted
    /// as `Int`, integers as `Float`.
    ///
    /// # Errors
    /// Returns [`PathError::InvalidType`] if the value does not fit
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn admit(&self, value: Value) -> Result<Value, PathError> {
        match (self, value) {
            (Self::Any, value) => Ok(value),
            (Self::Object, value @ (Value::Null | Value::Object(_)))
            | (Self::Bool, value @ Value::Bool(_))
            | (Self::Int, value @ Value::Int(_))
            | (Self::Float, value @ Value::Float(_))
            | (Self::Str, value @ Value::Str(_))
            | (Self::Duration, value @ Value::Duration(_)) => Ok(value),
            (Self::Int, Value::Float(f))
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
            {
                Ok(Value::Int(f as i64))
            }
            (Self::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (Self::List(element), Value::List(items)) => items
                .into_iter()
                .map(|item| element.admit(item))
                .collect::<Result<_, _>>()
                .map(Value::List),
            (Self::Map(element), Value::Map(entries)) => entries
                .into_iter()
                .map(|(key, item)| element.admit(item).map(|item| (key, item)))
                .collect::<Result<_, _>>()
                .map(Value::Map),
            (kind, value) => Err(PathError::mismatch(kind.clone(), &value)),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "string"),
            Self::Duration => write!(f, "duration"),
            Self::Object => write!(f, "object"),
            Self::List(element) => write!(f, "list<{element}>"),
            Self::Map(element) => write!(f, "map<{element}>"),
        }
    }
}

/// Node of the value tree
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean leaf
    Bool(bool),
    /// Integer leaf
    Int(i64),
    /// Floating point leaf
    Float(f64),
    /// Text leaf
    Str(String),
    /// Duration leaf
    Duration(Duration),
    /// Ordered sequence
    List(Vec<Value>),
    /// String-keyed map, insertion ordered
    Map(IndexMap<String, Value>),
    /// Shared record
    Object(ObjectRef),
}

impl Value {
    /// Short name of the variant
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Duration(_) => "duration",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }

    /// Variant name, or the concrete type name for records
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Object(object) => object.type_name().to_string(),
            other => other.kind_name().to_string(),
        }
    }

    /// Check if the value is absent
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow as text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Copy out an integer
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Copy out a float
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Copy out a boolean
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Copy out a duration
    #[inline]
    #[must_use]
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// Borrow as a sequence
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as a map
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Borrow as a record handle
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from! {
    bool => |v| Value::Bool(v),
    i32 => |v| Value::Int(i64::from(v)),
    i64 => |v| Value::Int(v),
    u32 => |v| Value::Int(i64::from(v)),
    f32 => |v| Value::Float(f64::from(v)),
    f64 => |v| Value::Float(v),
    &str => |v| Value::Str(v.to_string()),
    String => |v| Value::Str(v),
    Duration => |v| Value::Duration(v),
    Vec<Value> => |v| Value::List(v),
    IndexMap<String, Value> => |v| Value::Map(v),
    ObjectRef => |v| Value::Object(v),
}

/// Record whose fields are addressable by name
///
/// Implemented through the [`object!`](crate::object) macro, which generates
/// the accessor table from the struct's field list.
pub trait Object: Any + Send + Sync + Debug {
    /// Fully qualified type name
    fn type_name(&self) -> &'static str;

    /// Names of all addressable fields, in declaration order
    fn field_names(&self) -> &'static [&'static str];

    /// Declared kind of a field
    fn field_kind(&self, name: &str) -> Option<Kind>;

    /// Current value of a field
    fn field(&self, name: &str) -> Option<Value>;

    /// Replace a field's value
    ///
    /// # Errors
    /// - [`PathError::InvalidPath`] if there is no such field
    /// - [`PathError::InvalidType`] if the value does not fit the field
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), PathError>;

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Shared handle to a record
///
/// Clones share identity: a record linked into several places is one instance,
/// and in-place mutation is visible through all of them. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<dyn Object>>);

impl ObjectRef {
    /// Wrap a record
    #[must_use]
    pub fn new<T: Object>(object: T) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// Concrete type name of the record
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.read().type_name()
    }

    /// Shared access to the record
    pub fn read(&self) -> RwLockReadGuard<'_, dyn Object> {
        self.0.read()
    }

    /// Exclusive access to the record
    pub fn write(&self) -> RwLockWriteGuard<'_, dyn Object> {
        self.0.write()
    }

    /// Check if the record is a `T`
    #[must_use]
    pub fn is<T: Object>(&self) -> bool {
        self.0.read().as_any().is::<T>()
    }

    /// Run `f` against the record if it is a `T`
    pub fn with<T: Object, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.0.read();
        guard.as_any().downcast_ref::<T>().map(f)
    }

    /// Run `f` against the record mutably if it is a `T`
    pub fn with_mut<T: Object, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.0.write();
        guard.as_any_mut().downcast_mut::<T>().map(f)
    }

    /// Check if two handles point at the same record
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Debug for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(guard) => f.debug_tuple("ObjectRef").field(&guard.type_name()).finish(),
            None => f.debug_tuple("ObjectRef").field(&"<locked>").finish(),
        }
    }
}

/// Rust type usable as a field of an [`object!`](crate::object) record
pub trait Field: Sized {
    /// Declared kind of the field
    fn kind() -> Kind;

    /// Current field contents as a value
    ///
    /// Integers wider than [`Value::Int`] saturate: a `u64` or `usize` above
    /// `i64::MAX` reads back as `i64::MAX`. Values written through a path are
    /// always in range, so only fields set directly in Rust can saturate.
    fn to_value(&self) -> Value;

    /// Build the field from a value
    ///
    /// # Errors
    /// Returns [`PathError::InvalidType`] if the value does not fit
    fn from_value(value: Value) -> Result<Self, PathError>;
}

/// Declared kind of a field, inferred from the field itself
#[doc(hidden)]
#[must_use]
pub fn field_kind_of<T: Field>(_field: &T) -> Kind {
    T::kind()
}

impl Field for Value {
    fn kind() -> Kind {
        Kind::Any
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, PathError> {
        Ok(value)
    }
}

impl Field for bool {
    fn kind() -> Kind {
        Kind::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, PathError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(PathError::mismatch(Kind::Bool, &other)),
        }
    }
}

macro_rules! int_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn kind() -> Kind {
                    Kind::Int
                }

                // saturates above i64::MAX
                fn to_value(&self) -> Value {
                    Value::Int(i64::try_from(*self).unwrap_or(i64::MAX))
                }

                fn from_value(value: Value) -> Result<Self, PathError> {
                    match Kind::Int.admit(value)? {
                        Value::Int(i) => <$ty>::try_from(i)
                            .map_err(|_| PathError::InvalidType {
                                expected: Kind::Int,
                                found: format!("int {i} out of range for {}", stringify!($ty)),
                            }),
                        other => Err(PathError::mismatch(Kind::Int, &other)),
                    }
                }
            }
        )*
    };
}

int_field!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

macro_rules! float_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn kind() -> Kind {
                    Kind::Float
                }

                fn to_value(&self) -> Value {
                    Value::Float(f64::from(*self))
                }

                #[allow(clippy::cast_possible_truncation)]
                fn from_value(value: Value) -> Result<Self, PathError> {
                    match Kind::Float.admit(value)? {
                        Value::Float(f) => Ok(f as $ty),
                        other => Err(PathError::mismatch(Kind::Float, &other)),
                    }
                }
            }
        )*
    };
}

float_field!(f32, f64);

impl Field for String {
    fn kind() -> Kind {
        Kind::Str
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, PathError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(PathError::mismatch(Kind::Str, &other)),
        }
    }
}

impl Field for Duration {
    fn kind() -> Kind {
        Kind::Duration
    }

    fn to_value(&self) -> Value {
        Value::Duration(*self)
    }

    fn from_value(value: Value) -> Result<Self, PathError> {
        match value {
            Value::Duration(d) => Ok(d),
            other => Err(PathError::mismatch(Kind::Duration, &other)),
        }
    }
}

impl Field for ObjectRef {
    fn kind() -> Kind {
        Kind::Object
    }

    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, PathError> {
        match value {
            Value::Object(object) => Ok(object),
            other => Err(PathError::mismatch(Kind::Object, &other)),
        }
    }
}

impl Field for Option<ObjectRef> {
    fn kind() -> Kind {
        Kind::Object
    }

    fn to_value(&self) -> Value {
        self.clone().map_or(Value::Null, Value::Object)
    }

    fn from_value(value: Value) -> Result<Self, PathError> {
        match value {
            Value::Null => Ok(None),
            Value::Object(object) => Ok(Some(object)),
            other => Err(PathError::mismatch(Kind::Object, &other)),
        }
    }
}

impl<T: Field> Field for Vec<T> {
    fn kind() -> Kind {
        Kind::list(T::kind())
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Field::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, PathError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(PathError::mismatch(Self::kind(), &other)),
        }
    }
}

impl<T: Field> Field for IndexMap<String, T> {
    fn kind() -> Kind {
        Kind::map(T::kind())
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(key, item)| (key.clone(), item.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, PathError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, item)| T::from_value(item).map(|item| (key, item)))
                .collect(),
            other => Err(PathError::mismatch(Self::kind(), &other)),
        }
    }
}

/// Implement [`Object`] for a struct from its list of addressable fields
///
/// Each listed field must implement [`Field`]. Fields are addressed by their
/// Rust identifiers.
///
/// ```rust
/// use blueprint_core::{object, Object, ObjectRef};
///
/// #[derive(Debug, Default)]
/// struct Listener {
///     host: String,
///     port: i64,
/// }
///
/// object!(Listener { host, port });
///
/// let listener = ObjectRef::new(Listener::default());
/// assert_eq!(listener.read().field_names(), &["host", "port"]);
/// ```
#[macro_export]
macro_rules! object {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Object for $ty {
            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<$ty>()
            }

            fn field_names(&self) -> &'static [&'static str] {
                &[$(stringify!($field)),*]
            }

            fn field_kind(&self, name: &str) -> ::std::option::Option<$crate::Kind> {
                match name {
                    $(stringify!($field) => ::std::option::Option::Some(
                        $crate::__private::field_kind_of(&self.$field),
                    ),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                match name {
                    $(stringify!($field) => ::std::option::Option::Some(
                        $crate::Field::to_value(&self.$field),
                    ),)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::PathError> {
                match name {
                    $(stringify!($field) => {
                        self.$field = $crate::Field::from_value(value)?;
                        ::std::result::Result::Ok(())
                    })*
                    _ => ::std::result::Result::Err($crate::PathError::missing(
                        name,
                        ::std::any::type_name::<$ty>(),
                    )),
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Endpoint {
        name: String,
        port: u16,
        weight: f64,
        enabled: bool,
        timeout: Duration,
        tags: Vec<String>,
        next: Option<ObjectRef>,
        extra: Value,
    }

    crate::object!(Endpoint {
        name,
        port,
        weight,
        enabled,
        timeout,
        tags,
        next,
        extra,
    });

    #[test]
    fn kind_display() {
        assert_eq!(Kind::list(Kind::map(Kind::Str)).to_string(), "list<map<string>>");
        assert_eq!(Kind::Object.to_string(), "object");
    }

    #[test]
    fn admit_widens_numbers_losslessly() {
        assert_eq!(Kind::Int.admit(Value::Float(20.0)).unwrap(), Value::Int(20));
        assert_eq!(Kind::Float.admit(Value::Int(3)).unwrap(), Value::Float(3.0));
        assert!(Kind::Int.admit(Value::Float(10.5)).is_err());
    }

    #[test]
    fn admit_rejects_text_for_duration() {
        let err = Kind::Duration.admit(Value::from("5s")).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidType {
                expected: Kind::Duration,
                found: "string".to_string(),
            }
        );
    }

    #[test]
    fn admit_checks_container_elements() {
        let ok = Kind::list(Kind::Str).admit(Value::List(vec![Value::from("a")]));
        assert!(ok.is_ok());
        let bad = Kind::list(Kind::Str).admit(Value::List(vec![Value::from(1)]));
        assert!(bad.unwrap_err().is_invalid_type());
    }

    #[test]
    fn object_slot_accepts_null_and_records() {
        let record = ObjectRef::new(Endpoint::default());
        assert!(Kind::Object.admit(Value::Null).is_ok());
        assert!(Kind::Object.admit(Value::Object(record)).is_ok());
        assert!(Kind::Object.admit(Value::from(1)).is_err());
    }

    #[test]
    fn wide_unsigned_reads_saturate() {
        assert_eq!(u64::MAX.to_value(), Value::Int(i64::MAX));
        assert_eq!(usize::MAX.to_value(), Value::Int(i64::MAX));
        assert_eq!(42u64.to_value(), Value::Int(42));

        let largest = u64::from_value(Value::Int(i64::MAX)).unwrap();
        assert_eq!(largest, u64::try_from(i64::MAX).unwrap());
        assert!(u64::from_value(Value::Int(-1)).unwrap_err().is_invalid_type());
        assert!(u8::from_value(Value::Int(256)).unwrap_err().is_invalid_type());
    }

    #[test]
    fn object_macro_field_table() {
        let endpoint = Endpoint::default();
        assert_eq!(endpoint.field_names().len(), 8);
        assert_eq!(endpoint.field_kind("port"), Some(Kind::Int));
        assert_eq!(endpoint.field_kind("tags"), Some(Kind::list(Kind::Str)));
        assert_eq!(endpoint.field_kind("next"), Some(Kind::Object));
        assert_eq!(endpoint.field_kind("extra"), Some(Kind::Any));
        assert_eq!(endpoint.field_kind("missing"), None);
        assert!(endpoint.type_name().ends_with("Endpoint"));
    }

    #[test]
    fn object_macro_set_and_get() {
        let mut endpoint = Endpoint::default();
        endpoint.set_field("name", Value::from("api")).unwrap();
        endpoint.set_field("port", Value::Int(8080)).unwrap();
        endpoint.set_field("weight", Value::Int(2)).unwrap();
        endpoint.set_field("enabled", Value::Bool(true)).unwrap();

        assert_eq!(endpoint.name, "api");
        assert_eq!(endpoint.port, 8080);
        assert!((endpoint.weight - 2.0).abs() < f64::EPSILON);
        assert!(endpoint.enabled);
        assert_eq!(endpoint.field("port"), Some(Value::Int(8080)));
    }

    #[test]
    fn object_macro_rejects_bad_values() {
        let mut endpoint = Endpoint::default();
        let err = endpoint.set_field("port", Value::Int(70_000)).unwrap_err();
        assert!(err.is_invalid_type());
        let err = endpoint.set_field("timeout", Value::from("5s")).unwrap_err();
        assert!(err.is_invalid_type());
        let err = endpoint.set_field("nope", Value::Null).unwrap_err();
        assert!(matches!(err, PathError::InvalidPath { .. }));
    }

    #[test]
    fn object_ref_shares_identity() {
        let first = ObjectRef::new(Endpoint::default());
        let second = first.clone();
        second.with_mut(|e: &mut Endpoint| e.name = "shared".to_string());

        assert!(first.ptr_eq(&second));
        assert_eq!(first, second);
        assert_eq!(first.with(|e: &Endpoint| e.name.clone()).unwrap(), "shared");
        assert_ne!(first, ObjectRef::new(Endpoint::default()));
    }

    #[test]
    fn object_ref_downcast_mismatch() {
        #[derive(Debug, Default)]
        struct Other;
        crate::object!(Other {});

        let record = ObjectRef::new(Other);
        assert!(record.is::<Other>());
        assert!(!record.is::<Endpoint>());
        assert!(record.with(|_: &Endpoint| ()).is_none());
    }

    #[test]
    fn optional_object_field_roundtrip() {
        let target = ObjectRef::new(Endpoint::default());
        let mut endpoint = Endpoint::default();
        endpoint.set_field("next", Value::Object(target.clone())).unwrap();
        assert_eq!(endpoint.field("next"), Some(Value::Object(target)));
        endpoint.set_field("next", Value::Null).unwrap();
        assert!(endpoint.next.is_none());
    }

    #[test]
    fn value_describe_names_records() {
        let record = ObjectRef::new(Endpoint::default());
        assert!(Value::Object(record).describe().ends_with("Endpoint"));
        assert_eq!(Value::from(1.5).describe(), "float");
    }
}
