/*!
 * Error Types
 * Provider error taxonomy with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

/// Provider operation result
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced through the provider protocol
///
/// Serialization uses the tagged enum pattern so hosts can match on `error`.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum ProviderError {
    #[error("Not found: {0}")]
    #[diagnostic(
        code(provider::not_found),
        help("The root may be unconfigured or the document was removed out of band.")
    )]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(provider::io))]
    Io(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Internal invariant violated: {0}")]
    #[diagnostic(
        code(provider::fatal),
        help("A path outside the root reached the identifier codec. This is a bug.")
    )]
    Fatal(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid argument: {0}")]
    #[diagnostic(code(provider::invalid_argument))]
    InvalidArgument(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Operation cancelled")]
    #[diagnostic(code(provider::cancelled))]
    Cancelled,
}

impl ProviderError {
    /// Convert std::io::Error to ProviderError with operation context
    pub fn from_io(e: std::io::Error, op: &str, path: &Path) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => {
                ProviderError::NotFound(format!("{} {}", op, path.display()))
            }
            _ => ProviderError::Io(format!("{} {}: {}", op, path.display(), e)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

/// Deserialize and validate non-empty string for error messages
fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
