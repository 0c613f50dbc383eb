//! Widget configuration parsed from a lesson's `interactionConfig` JSON.
//!
//! Unknown keys are ignored; missing or malformed numeric values fall back
//! to [`NUMERIC_FALLBACK`] uniformly (absence contributes nothing).

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Fallback for missing or malformed numeric config fields.
pub const NUMERIC_FALLBACK: f64 = 0.0;

/// Resolve an optional numeric field to its value or the uniform fallback.
pub fn or_fallback(value: Option<f64>) -> f64 {
    value.unwrap_or(NUMERIC_FALLBACK)
}

/// Per-widget configuration. Every field is optional; each builder reads
/// only the fields it understands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Weight preplaced on the left plate (balance scale).
    #[serde(deserialize_with = "lenient_number")]
    pub left_weight: Option<f64>,
    /// Weight preplaced on the right plate (balance scale).
    #[serde(deserialize_with = "lenient_number")]
    pub right_weight: Option<f64>,
    /// Machine rule string, `+ N` or `* N` (function machine).
    pub rule: Option<String>,
    /// Values for the draggable bank tokens (balance scale, function machine).
    pub inputs: Vec<f64>,
    /// Draw the vertical sine projection segment (unit circle).
    pub show_sine: bool,
    /// Draw the horizontal cosine projection segment (unit circle).
    pub show_cosine: bool,
    /// Target coordinate pair the lesson asks for (coordinate grid).
    pub target: Option<(i64, i64)>,
    /// Initial partition count for the Riemann slider, clamped to [2, 50].
    #[serde(deserialize_with = "lenient_number")]
    pub initial_n: Option<f64>,
}

impl WidgetConfig {
    /// Parse a config from a lesson JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Accept a number, a numeric string, or anything else (treated as absent).
/// This is the single coercion point for malformed numeric input.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeNumber {
        Num(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<MaybeNumber>::deserialize(deserializer)? {
        None => None,
        Some(MaybeNumber::Num(n)) => Some(n),
        Some(MaybeNumber::Text(s)) => s.trim().parse().ok(),
        Some(MaybeNumber::Other(_)) => None,
    })
}
