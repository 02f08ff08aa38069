//! Error types for scene loading

use thiserror::Error;

/// Result type alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while loading a document or building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Malformed input: path data, transform lists, colors, numeric attributes.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The XML tree reader rejected the document.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document contains no `<svg>` element.
    #[error("No <svg> element found")]
    MissingRoot,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SceneError {
    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error came from malformed document content.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, SceneError::Parse(_) | SceneError::Xml(_))
    }
}

/// Parse a numeric literal, reporting failures as parse errors.
///
/// Literals that overflow to infinity (or spell out `inf`/`nan`) are
/// rejected, so every parsed value can be written back as path data.
pub(crate) fn parse_number(literal: &str) -> SceneResult<f64> {
    literal
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SceneError::parse(format!("invalid number: {literal}")))
}
