//! Loader configuration

use serde::{Deserialize, Serialize};

/// Default bound on link redirections, the only protection against cycles
pub const MAX_LINK_DEPTH: usize = 128;

/// What to do when a link source is declared twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Last declaration wins (logged at `warn`)
    #[default]
    Overwrite,
    /// First declaration wins, the redeclaration is recorded as an error
    Reject,
}

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Maximum number of link hops when resolving one link
    pub max_link_depth: usize,
    /// Handling of duplicate link sources
    pub link_policy: LinkPolicy,
}

impl LoaderConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max link depth
    #[inline]
    #[must_use]
    pub fn with_max_link_depth(mut self, depth: usize) -> Self {
        self.max_link_depth = depth;
        self
    }

    /// With duplicate link policy
    #[inline]
    #[must_use]
    pub fn with_link_policy(mut self, policy: LinkPolicy) -> Self {
        self.link_policy = policy;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_link_depth: MAX_LINK_DEPTH,
            link_policy: LinkPolicy::Overwrite,
        }
    }
}
