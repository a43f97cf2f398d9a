/*!
 * Core Module
 * Shared constants, error types, and serialization helpers
 */

pub mod errors;
pub mod limits;
pub mod serde;

pub use errors::{ProviderError, ProviderResult};
