/*!
 * Document Provider Library
 * A virtual-filesystem document provider over one local directory tree
 *
 * The provider is invoked concurrently by its host. It keeps no state beyond
 * the resolved root and the armed change subscriptions, and re-reads the
 * filesystem on every query. Mutations are not serialized: the collision
 * check and the create or rename after it can race with another mutation on
 * the same parent, and the filesystem decides the outcome.
 */

pub mod codec;
pub mod core;
pub mod monitoring;
pub mod provider;

// Re-exports
pub use codec::{is_descendant, relativize, DocumentId, DocumentIdCodec};
pub use crate::core::{ProviderError, ProviderResult};
pub use monitoring::{init_tracing, span_operation, OperationSpan};
pub use provider::{
    ChangeEvent, ChangeKind, ChangeNotifier, DocumentsProvider, EnvRoot, EventBroadcaster,
    FixedRoot, LocalDocumentProvider, ProviderConfig, RootSource,
};
