/*!
 * Document Provider
 * Exposes a directory tree to the host picker through document identifiers
 */

pub mod config;
pub mod local;
pub mod mutate;
pub mod observable;
pub mod search;
pub mod traits;
pub mod types;
pub mod uri;

pub use config::{EnvRoot, FixedRoot, ProviderConfig};
pub use local::{LocalDocumentProvider, LocalDocumentProviderBuilder};
pub use mutate::{candidate_name, delete_recursively, find_free_path};
pub use observable::{ChangeEvent, ChangeKind, EventBroadcaster, Subscription, SubscriptionRegistry};
pub use traits::{ChangeNotifier, DocumentsProvider, RootSource};
pub use types::*;
