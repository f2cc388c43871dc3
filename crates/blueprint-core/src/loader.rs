//! Incremental object graph construction
//!
//! A [`Loader`] owns the root under construction. Values, type assertions and
//! links are added in any order; failures are recorded rather than returned,
//! and [`Loader::finish`] resolves every link before reporting the outcome.

use crate::config::{LinkPolicy, LoaderConfig};
use crate::convert::ConverterRegistry;
use crate::error::{ErrorRecord, LinkError, LoadError, LoadErrors, LoadResult};
use crate::path::PathAddress;
use crate::registry::TypeRegistry;
use crate::resolve::{apply_order, LinkResolver, PendingLink};
use crate::value::{ObjectRef, Value};
use indexmap::IndexMap;
use std::sync::Arc;

/// Registries and settings used by a [`Loader`]
#[derive(Debug, Clone)]
pub struct Context {
    /// Constructible types
    pub types: Arc<TypeRegistry>,
    /// Value converters
    pub converters: Arc<ConverterRegistry>,
    /// Loader settings
    pub config: LoaderConfig,
}

impl Context {
    /// Context backed by the process-wide registries
    #[must_use]
    pub fn global() -> Self {
        Self {
            types: Arc::clone(TypeRegistry::global()),
            converters: Arc::clone(ConverterRegistry::global()),
            config: LoaderConfig::default(),
        }
    }

    /// Context backed by explicit registries
    #[must_use]
    pub fn new(types: Arc<TypeRegistry>, converters: Arc<ConverterRegistry>) -> Self {
        Self {
            types,
            converters,
            config: LoaderConfig::default(),
        }
    }

    /// With loader settings
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::global()
    }
}

/// Builds a value tree from paths, type assertions and links
#[derive(Debug)]
pub struct Loader {
    root: Value,
    links: IndexMap<String, PendingLink>,
    errors: Vec<ErrorRecord>,
    context: Context,
}

impl Loader {
    /// Create loader over `root` with the process-wide registries
    #[must_use]
    pub fn new(root: impl Into<Value>) -> Self {
        Self::with_context(root, Context::global())
    }

    /// Create loader over `root` with explicit registries
    #[must_use]
    pub fn with_context(root: impl Into<Value>, context: Context) -> Self {
        Self {
            root: root.into(),
            links: IndexMap::new(),
            errors: Vec::new(),
            context,
        }
    }

    /// Loader over an empty string-keyed map
    #[must_use]
    pub fn for_map() -> Self {
        Self::new(Value::Map(IndexMap::new()))
    }

    /// Loader populating `object` in place
    #[must_use]
    pub fn for_object(object: &ObjectRef) -> Self {
        Self::new(Value::Object(object.clone()))
    }

    /// Tree under construction
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Registries and settings in use
    #[inline]
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Assign `value` at `path`
    ///
    /// A type mismatch is retried once through the converter registered for
    /// the kind declared at `path`. Residual failures are recorded.
    pub fn add(&mut self, path: &PathAddress, value: impl Into<Value>) {
        let value = value.into();
        tracing::debug!(src = %path, value = %value.describe(), "add");

        let err = match path.set(&mut self.root, value.clone()) {
            Ok(()) => return,
            Err(err) if err.is_invalid_type() => match self.convert_and_set(path, value) {
                Some(Ok(())) => return,
                Some(Err(err)) => err,
                None => err.into(),
            },
            Err(err) => err.into(),
        };

        self.error_at(err, path);
    }

    /// Retry an assignment through a converter, `None` when none applies
    fn convert_and_set(
        &mut self,
        path: &PathAddress,
        value: Value,
    ) -> Option<Result<(), LoadError>> {
        let kind = match path.declared_kind(&self.root) {
            Ok(kind) => kind,
            Err(err) => return Some(Err(err.into())),
        };

        let converted = match self.context.converters.convert(&kind, value)? {
            Ok(converted) => converted,
            Err(err) => return Some(Err(err.into())),
        };

        Some(path.set(&mut self.root, converted).map_err(LoadError::from))
    }

    /// Assign a fresh instance of the type registered as `name` at `path`
    pub fn instantiate(&mut self, path: &PathAddress, name: &str) {
        tracing::debug!(src = %path, name, "instantiate");

        let Some(instance) = self.context.types.new_instance(name) else {
            self.error_at(LoadError::UnknownType(name.to_string()), path);
            return;
        };

        if let Err(err) = path.set(&mut self.root, instance) {
            self.error_at(err, path);
        }
    }

    /// Declare that `source` takes the value found at `target`
    ///
    /// Nothing is checked until [`Loader::finish`].
    pub fn link(&mut self, source: &PathAddress, target: &PathAddress) {
        tracing::debug!(src = %source, target = %target, "link");

        let key = source.to_string();
        let previous = self.links.get(&key).map(|link| link.target.clone());

        match (previous, self.context.config.link_policy) {
            (Some(previous), LinkPolicy::Reject) => {
                let err = LinkError::Redeclared {
                    previous,
                    ignored: target.clone(),
                };
                self.error_at(err, source);
            }
            (previous, _) => {
                if let Some(previous) = previous {
                    tracing::warn!(
                        src = %source,
                        previous = %previous,
                        target = %target,
                        "link redeclared, overwriting"
                    );
                }
                self.links
                    .insert(key, PendingLink::new(source.clone(), target.clone()));
            }
        }
    }

    /// Record a failure at `path`
    pub fn error_at(&mut self, err: impl Into<LoadError>, path: &PathAddress) {
        let record = ErrorRecord::new(err.into(), path.clone());
        tracing::debug!(error = %record, "recorded");
        self.errors.push(record);
    }

    /// Failures recorded so far
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Links declared so far, in declaration order
    pub fn pending_links(&self) -> impl Iterator<Item = &PendingLink> {
        self.links.values()
    }

    /// Resolve every link and return the finished tree
    ///
    /// Links are applied so that a link copying a container runs after every
    /// link assigning beneath it. Declaration order only breaks ties.
    ///
    /// # Errors
    /// Returns every failure recorded over the loader's lifetime, including
    /// the link failures found here.
    pub fn finish(mut self) -> LoadResult<Value> {
        let links = std::mem::take(&mut self.links);
        let resolver = LinkResolver::new(&links).with_max_depth(self.context.config.max_link_depth);

        let mut resolved = Vec::with_capacity(links.len());
        for link in links.values() {
            match resolver.resolve_link(link) {
                Ok(link) => resolved.push(link),
                Err(err) => self.error_at(err, &link.source),
            }
        }

        for i in apply_order(&resolved) {
            let link = &resolved[i];
            tracing::debug!(src = %link.source, target = %link.target, "resolved");

            let outcome: Result<(), LoadError> = match link.target.get(&self.root) {
                Ok(Value::Null) => Err(LinkError::EmptyTarget {
                    src: link.declared.clone(),
                    target: link.target.clone(),
                }
                .into()),
                Ok(value) => link.source.set(&mut self.root, value).map_err(LoadError::from),
                Err(err) => Err(LinkError::Target(err).into()),
            };

            if let Err(err) = outcome {
                self.error_at(err, &link.declared);
            }
        }

        tracing::debug!(links = links.len(), errors = self.errors.len(), "finish");

        if self.errors.is_empty() {
            Ok(self.root)
        } else {
            Err(LoadErrors::new(self.errors))
        }
    }
}
