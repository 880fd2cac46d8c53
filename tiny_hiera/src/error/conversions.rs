//! Trait-based conversions between decoder errors and `HieraError`.

use super::{DocumentFormat, HieraError};

/// Convert JSON decoding failures into [`HieraError::Parse`].
impl From<serde_json::Error> for HieraError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(DocumentFormat::Json, e)
    }
}

/// Convert YAML decoding failures into [`HieraError::Parse`].
impl From<serde_saphyr::Error> for HieraError {
    fn from(e: serde_saphyr::Error) -> Self {
        Self::parse(DocumentFormat::Yaml, e.to_string())
    }
}
