//! Blueprint core
//!
//! Builds object graphs from path-addressed descriptions: values are assigned
//! at dot paths, records are instantiated by registered type name, and links
//! declare that one location equals another. Links are resolved once every
//! assignment is known, so descriptions carry no ordering constraints.
//!
//! # Core Concepts
//!
//! - [`PathAddress`]: hierarchical address of a location (`server.listener.port`)
//! - [`Value`] / [`Kind`]: the tree under construction and its declared types
//! - [`Object`]: records addressable by field name, implemented with [`object!`]
//! - [`TypeRegistry`]: constructible types by qualified or short name
//! - [`ConverterRegistry`]: coercions retried on type mismatch
//! - [`Loader`]: accumulates assignments, types and links, then [`Loader::finish`]es
//!
//! # Example
//!
//! ```rust
//! use blueprint_core::{Loader, PathAddress, Value};
//!
//! let path = |text: &str| text.parse::<PathAddress>().unwrap();
//!
//! let mut loader = Loader::for_map();
//! loader.link(&path("a.x"), &path("b"));
//! loader.add(&path("b"), "v");
//!
//! let root = loader.finish().unwrap();
//! assert_eq!(path("a.x").get(&root).unwrap(), Value::from("v"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod convert;
mod error;
mod loader;
mod path;
mod registry;
mod resolve;
mod value;

pub use config::{LinkPolicy, LoaderConfig, MAX_LINK_DEPTH};
pub use convert::{duration_converter, parse_duration, ConvertError, Converter, ConverterRegistry};
pub use error::{ErrorKind, ErrorRecord, LinkError, LoadError, LoadErrors, LoadResult};
pub use loader::{Context, Loader};
pub use path::{PathAddress, PathError, MAX_LIST_GROWTH};
pub use registry::{register, Constructor, TypeInfo, TypeRegistry};
pub use resolve::{apply_order, LinkResolver, PendingLink, ResolvedLink};
pub use value::{Field, Kind, Object, ObjectRef, Value};

/// Support for the [`object!`] macro
#[doc(hidden)]
pub mod __private {
    pub use crate::value::field_kind_of;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
