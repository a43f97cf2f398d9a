/*!
 * Provider Types
 * Shared types for the document provider protocol
 */

mod cursor;
mod flags;
pub mod mime;
mod open_mode;
mod record;

pub use crate::core::errors::{ProviderError, ProviderResult};
pub use cursor::{Column, Projection, RowSet, RowSource, Value};
pub use flags::{DocumentFlags, RootFlags};
pub use open_mode::{CancellationSignal, OpenMode, SizeHint, ThumbnailHandle};
pub use record::{is_writable, DocumentRecord, RootDescriptor};
