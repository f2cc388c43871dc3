//! Error types for the JSON front-end

use blueprint_core::LoadErrors;

/// Errors returned by the JSON entry points
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    /// Input is not valid JSON; nothing was loaded
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// Input was walked but construction failed
    #[error("{0}")]
    Load(#[from] LoadErrors),
}

impl JsonError {
    /// Construction failures, if the input parsed
    #[must_use]
    pub fn load_errors(&self) -> Option<&LoadErrors> {
        match self {
            Self::Load(errors) => Some(errors),
            Self::Syntax(_) => None,
        }
    }
}

/// Result type alias for the JSON entry points
pub type JsonResult<T> = Result<T, JsonError>;
