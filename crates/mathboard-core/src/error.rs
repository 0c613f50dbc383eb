//! Error types for the core crate.

use thiserror::Error;

/// Failure to parse a lesson `interactionConfig` document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON (or not an object).
    #[error("invalid interaction config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A widget-kind string that does not name one of the six widgets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown widget kind `{0}`")]
pub struct UnknownWidgetKind(pub String);
