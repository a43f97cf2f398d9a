/*!
 * Provider Traits
 * The fixed provider contract and the host-side seams it consumes
 */

use std::fs;
use std::path::PathBuf;

use super::observable::ChangeEvent;
use super::types::*;
use crate::codec::DocumentId;

/// Document provider contract as invoked by the host picker
///
/// Every method may be called concurrently from host threads. Mutations are
/// not serialized against each other; see the crate docs for the races this
/// leaves open.
pub trait DocumentsProvider: Send + Sync {
    /// Zero rows without a root, otherwise exactly one
    fn query_roots(&self, projection: Option<&Projection>) -> ProviderResult<RowSet>;

    /// Single row describing one document
    fn query_document(
        &self,
        document_id: &str,
        projection: Option<&Projection>,
    ) -> ProviderResult<RowSet>;

    /// Immediate children of a directory; arms change notification for the parent
    fn query_child_documents(
        &self,
        parent_document_id: &str,
        projection: Option<&Projection>,
    ) -> ProviderResult<RowSet>;

    /// Documents under a root whose names match `query`
    fn query_search_documents(
        &self,
        root_id: &str,
        query: &str,
        projection: Option<&Projection>,
    ) -> ProviderResult<RowSet>;

    /// Most recently modified documents under a root
    fn query_recent_documents(
        &self,
        root_id: &str,
        projection: Option<&Projection>,
    ) -> ProviderResult<RowSet>;

    /// MIME type of one document
    fn get_document_type(&self, document_id: &str) -> ProviderResult<String>;

    /// Raw OS handle opened with a host mode string (`r`, `w`, `wt`, `wa`, `rw`, `rwt`)
    fn open_document(
        &self,
        document_id: &str,
        mode: &str,
        signal: Option<&CancellationSignal>,
    ) -> ProviderResult<fs::File>;

    /// Read handle over the whole document; the size hint is not enforced
    fn open_document_thumbnail(
        &self,
        document_id: &str,
        size_hint: SizeHint,
        signal: Option<&CancellationSignal>,
    ) -> ProviderResult<ThumbnailHandle>;

    /// Create a file or directory and return its identifier
    fn create_document(
        &self,
        parent_document_id: &str,
        mime_type: &str,
        display_name: &str,
    ) -> ProviderResult<DocumentId>;

    /// Delete a document, recursively for directories
    fn delete_document(&self, document_id: &str) -> ProviderResult<()>;

    /// Rename within the same parent and return the new identifier
    fn rename_document(&self, document_id: &str, display_name: &str)
        -> ProviderResult<DocumentId>;

    /// Whether `document_id` lies in the subtree of `parent_document_id`
    fn is_child_document(&self, parent_document_id: &str, document_id: &str) -> bool;
}

/// Host environment lookup of the root directory
pub trait RootSource: Send + Sync {
    /// Current root, or none when no storage is available
    fn resolve_root(&self) -> Option<PathBuf>;
}

impl<F> RootSource for F
where
    F: Fn() -> Option<PathBuf> + Send + Sync,
{
    fn resolve_root(&self) -> Option<PathBuf> {
        self()
    }
}

/// Host notification bus
///
/// Delivery and ordering belong to the bus; the provider only publishes.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeNotifier: Send + Sync {
    fn notify_change(&self, event: &ChangeEvent);
}
