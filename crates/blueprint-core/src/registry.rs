//! Type registry for constructible types
//!
//! Provides [`TypeRegistry`], which maps qualified and short type names to a
//! constructor producing a fresh zero instance.
//!
//! Types can be looked up by their fully qualified form
//! (`my_crate::handlers::Printer`) or their short form (`Printer`). The short
//! form belongs to whichever type claimed it first, so the qualified form is
//! recommended whenever names may collide.

use crate::value::{Field, Kind, Object, ObjectRef, Value};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Constructor producing a fresh zero instance
pub type Constructor = fn() -> Value;

/// Registered type
#[derive(Debug, Clone)]
pub struct TypeInfo {
    qualified: &'static str,
    short: &'static str,
    kind: Kind,
    constructor: Constructor,
}

impl TypeInfo {
    /// Fully qualified name
    #[inline]
    #[must_use]
    pub fn qualified(&self) -> &'static str {
        self.qualified
    }

    /// Short name
    #[inline]
    #[must_use]
    pub fn short(&self) -> &'static str {
        self.short
    }

    /// Kind of the values produced
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Produce a fresh zero instance
    #[inline]
    #[must_use]
    pub fn instantiate(&self) -> Value {
        (self.constructor)()
    }
}

#[derive(Debug, Default)]
struct Tables {
    qualified: HashMap<&'static str, Arc<TypeInfo>>,
    short: HashMap<&'static str, Arc<TypeInfo>>,
}

/// Registry of constructible types
#[derive(Debug, Default)]
pub struct TypeRegistry {
    tables: Mutex<Tables>,
}

fn construct_object<T: Object + Default>() -> Value {
    Value::Object(ObjectRef::new(T::default()))
}

fn construct_field<T: Field + Default>() -> Value {
    T::default().to_value()
}

/// Last `::` segment of a type name, ignoring generic arguments
fn short_name(qualified: &'static str) -> &'static str {
    let base = qualified.split('<').next().unwrap_or(qualified);
    base.rsplit("::").next().unwrap_or(base)
}

static GLOBAL: Lazy<Arc<TypeRegistry>> = Lazy::new(|| Arc::new(TypeRegistry::with_primitives()));

impl TypeRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the primitive leaf types
    ///
    /// Every integer and float width is registered under its Rust name and a
    /// sized short name (`int8` .. `uint64`, `float32`, `float64`). `int`,
    /// `uint` and `float` name `i64`, `usize` and `f64`.
    #[must_use]
    pub fn with_primitives() -> Self {
        let registry = Self::new();
        registry.register_primitive::<bool>("bool");
        registry.register_primitive::<i64>("int");
        registry.register_primitive::<i8>("int8");
        registry.register_primitive::<i16>("int16");
        registry.register_primitive::<i32>("int32");
        registry.register_primitive::<usize>("uint");
        registry.register_primitive::<u8>("uint8");
        registry.register_primitive::<u16>("uint16");
        registry.register_primitive::<u32>("uint32");
        registry.register_primitive::<u64>("uint64");
        registry.register_primitive::<f64>("float");
        registry.register_primitive::<f32>("float32");
        registry.register_primitive::<String>("string");
        registry.register_primitive::<Duration>("duration");
        registry.alias("int64", "i64");
        registry.alias("float64", "f64");
        registry
    }

    /// Process-wide registry, pre-filled with the primitive types
    #[must_use]
    pub fn global() -> &'static Arc<TypeRegistry> {
        &GLOBAL
    }

    /// Register a record type
    ///
    /// # Panics
    /// Panics if a type with the same qualified name is already registered.
    pub fn register<T: Object + Default>(&self) {
        let qualified = std::any::type_name::<T>();
        self.insert(TypeInfo {
            qualified,
            short: short_name(qualified),
            kind: Kind::Object,
            constructor: construct_object::<T>,
        });
    }

    /// Register a leaf type under an explicit short name
    ///
    /// # Panics
    /// Panics if a type with the same qualified name is already registered.
    pub fn register_primitive<T: Field + Default>(&self, short: &'static str) {
        self.insert(TypeInfo {
            qualified: std::any::type_name::<T>(),
            short,
            kind: T::kind(),
            constructor: construct_field::<T>,
        });
    }

    /// Make `short` another name for the already registered `name`
    ///
    /// Returns `false` if `name` is unknown or `short` is already claimed.
    pub fn alias(&self, short: &'static str, name: &str) -> bool {
        let mut tables = self.tables.lock();
        let Some(info) = tables
            .qualified
            .get(name)
            .or_else(|| tables.short.get(name))
            .cloned()
        else {
            return false;
        };
        if tables.short.contains_key(short) {
            return false;
        }
        tables.short.insert(short, info);
        true
    }

    fn insert(&self, info: TypeInfo) {
        let mut tables = self.tables.lock();

        if tables.qualified.contains_key(info.qualified) {
            drop(tables);
            tracing::error!(name = info.qualified, "duplicate type registration");
            panic!("duplicate registration attempt for '{}'", info.qualified);
        }

        let info = Arc::new(info);
        tables.qualified.insert(info.qualified, Arc::clone(&info));

        if tables.short.contains_key(info.short) {
            tracing::debug!(
                name = info.qualified,
                short = info.short,
                "short name already claimed"
            );
        } else {
            tables.short.insert(info.short, info);
        }
    }

    /// Look up a type by qualified or short name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<TypeInfo>> {
        let tables = self.tables.lock();
        tables
            .qualified
            .get(name)
            .or_else(|| tables.short.get(name))
            .cloned()
    }

    /// Produce a fresh zero instance of the named type
    #[must_use]
    pub fn new_instance(&self, name: &str) -> Option<Value> {
        self.get(name).map(|info| info.instantiate())
    }

    /// Check if a name resolves
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.lock().qualified.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All resolvable names (qualified and short), sorted
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let tables = self.tables.lock();
        let mut names: Vec<_> = tables
            .qualified
            .keys()
            .chain(tables.short.keys())
            .copied()
            .collect();
        drop(tables);

        names.sort_unstable();
        names.dedup();
        names
    }
}

impl Display for TypeRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for name in self.names() {
            write!(f, "\n    {name}")?;
        }
        write!(f, "\n]")
    }
}

/// Register a record type with the process-wide registry
///
/// # Panics
/// Panics if the type is already registered.
pub fn register<T: Object + Default>() {
    TypeRegistry::global().register::<T>();
}
