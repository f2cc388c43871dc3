//! Testing utilities for blueprint workspace
//!
//! Shared fixtures (registered record types), contexts with explicit
//! registries, and tracing setup.

#![allow(missing_docs)]

use blueprint_core::{
    object, Context, ConverterRegistry, Object, ObjectRef, PathAddress, TypeRegistry, Value,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Impl {
    pub i: i64,
    pub s: String,
}

object!(Impl { i, s });

#[derive(Debug, Clone, Default)]
pub struct Struct {
    pub i: i64,
    pub s: String,
    pub base: Option<ObjectRef>,
}

object!(Struct { i, s, base });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blah {
    pub a: Vec<String>,
}

object!(Blah { a });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeouts {
    pub idle: Duration,
    pub read: Duration,
}

object!(Timeouts { idle, read });

/// Something that can run, writing its output into a buffer
pub trait Handler {
    fn handle(&self, out: &mut String);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Printer {
    pub value: String,
}

object!(Printer { value });

impl Handler for Printer {
    fn handle(&self, out: &mut String) {
        out.push_str(&self.value);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MultiHandler {
    pub handlers: Vec<Option<ObjectRef>>,
}

object!(MultiHandler { handlers });

impl Handler for MultiHandler {
    fn handle(&self, out: &mut String) {
        for handler in self.handlers.iter().flatten() {
            dispatch(handler, out);
        }
    }
}

/// Run the record behind `object` as a [`Handler`]
///
/// Returns `false` if the record is not a known handler.
pub fn dispatch(object: &ObjectRef, out: &mut String) -> bool {
    if let Some(printer) = read::<Printer>(object) {
        printer.handle(out);
        true
    } else if let Some(multi) = read::<MultiHandler>(object) {
        multi.handle(out);
        true
    } else {
        false
    }
}

/// Copy of the record behind `object`, if it is a `T`
pub fn read<T: Object + Clone>(object: &ObjectRef) -> Option<T> {
    object.with(T::clone)
}

/// Copy of the record held by `value`, if it is a `T`
pub fn read_value<T: Object + Clone>(value: &Value) -> Option<T> {
    value.as_object().and_then(read::<T>)
}

/// Fresh registry with the primitives and every fixture type
pub fn fixture_types() -> TypeRegistry {
    let types = TypeRegistry::with_primitives();
    types.register::<Impl>();
    types.register::<Struct>();
    types.register::<Blah>();
    types.register::<Timeouts>();
    types.register::<Printer>();
    types.register::<MultiHandler>();
    types
}

/// Context with the fixture types and the built-in converters
pub fn fixture_context() -> Context {
    Context::new(
        Arc::new(fixture_types()),
        Arc::new(ConverterRegistry::with_defaults()),
    )
}

/// Context with the fixture types and no converters
pub fn bare_context() -> Context {
    Context::new(Arc::new(fixture_types()), Arc::new(ConverterRegistry::new()))
}

/// Parse a dot path
///
/// # Panics
/// Panics on malformed path text.
pub fn path(text: &str) -> PathAddress {
    text.parse()
        .unwrap_or_else(|err| panic!("bad test path '{text}': {err}"))
}

/// Install a fmt subscriber honouring `RUST_LOG`, ignoring repeat calls
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
