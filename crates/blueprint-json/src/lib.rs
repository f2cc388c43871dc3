//! Blueprint JSON front-end
//!
//! Loads object graphs from JSON extended with two key markers:
//!
//! - `"key!Type"` instantiates the registered `Type` at `key` before loading
//!   the value into it
//! - `"#key"` links `key` to the path given as value, or to one path per
//!   index when the value is an array
//!
//! ```rust
//! use blueprint_core::Value;
//! use blueprint_json::load_json;
//!
//! let values = load_json(r##"{ "a": { "#x": "b" }, "b": "v" }"##).unwrap();
//! let a = values["a"].as_map().unwrap();
//! assert_eq!(a["x"], Value::from("v"));
//! ```
//!
//! Element types of arrays cannot be given inline; build the elements
//! elsewhere and link them in.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod walk;

pub use error::{JsonError, JsonResult};

use blueprint_core::{Context, ErrorRecord, LoadError, LoadErrors, Loader, ObjectRef, PathAddress, Value};
use indexmap::IndexMap;

/// JSON loader bound to a set of registries
#[derive(Debug, Clone, Default)]
pub struct JsonLoader {
    context: Context,
}

impl JsonLoader {
    /// Loader using the process-wide registries
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader using explicit registries
    #[must_use]
    pub fn with_context(context: Context) -> Self {
        Self { context }
    }

    /// Build a string-keyed map from `text`
    ///
    /// # Errors
    /// - [`JsonError::Syntax`] if `text` is not JSON
    /// - [`JsonError::Load`] with every construction failure
    pub fn load(&self, text: &str) -> JsonResult<IndexMap<String, Value>> {
        let document: serde_json::Value = serde_json::from_str(text)?;

        let mut loader = Loader::with_context(Value::Map(IndexMap::new()), self.context.clone());
        walk::load_document(&mut loader, document);

        match loader.finish()? {
            Value::Map(values) => Ok(values),
            other => Err(LoadErrors::new(vec![ErrorRecord::new(
                LoadError::MalformedInput(format!("root replaced by {}", other.describe())),
                PathAddress::root(),
            )])
            .into()),
        }
    }

    /// Populate `object` in place from `text`
    ///
    /// # Errors
    /// - [`JsonError::Syntax`] if `text` is not JSON
    /// - [`JsonError::Load`] with every construction failure
    pub fn load_into(&self, text: &str, object: &ObjectRef) -> JsonResult<()> {
        let document: serde_json::Value = serde_json::from_str(text)?;

        let mut loader = Loader::with_context(Value::Object(object.clone()), self.context.clone());
        walk::load_document(&mut loader, document);

        loader.finish()?;
        tracing::debug!(name = object.type_name(), "loaded into");
        Ok(())
    }
}

/// Build a string-keyed map from `text` with the process-wide registries
///
/// # Errors
/// See [`JsonLoader::load`]
pub fn load_json(text: &str) -> JsonResult<IndexMap<String, Value>> {
    JsonLoader::new().load(text)
}

/// Populate `object` in place from `text` with the process-wide registries
///
/// # Errors
/// See [`JsonLoader::load_into`]
pub fn load_json_into(text: &str, object: &ObjectRef) -> JsonResult<()> {
    JsonLoader::new().load_into(text, object)
}
