/*!
 * Local Document Provider
 * Exposes one host directory tree through document identifiers
 */

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::{FixedRoot, ProviderConfig};
use super::observable::{ChangeEvent, ChangeKind, EventBroadcaster, SubscriptionRegistry};
use super::traits::{ChangeNotifier, DocumentsProvider, RootSource};
use super::types::*;
use super::uri::{child_documents_uri, recent_uri, search_uri};
use crate::codec::{self, DocumentId, DocumentIdCodec};
use crate::core::limits::ROOT_ID;
use crate::monitoring::{span_operation, OperationSpan};

/// Provider over the real filesystem
///
/// Stateless apart from the resolved root and the subscription registry. The
/// filesystem is the only source of truth: every query re-reads it.
pub struct LocalDocumentProvider {
    pub(super) config: ProviderConfig,
    source: Arc<dyn RootSource>,
    codec: RwLock<Option<Arc<DocumentIdCodec>>>,
    notifier: Arc<dyn ChangeNotifier>,
    subscriptions: SubscriptionRegistry,
}

/// Builder for [`LocalDocumentProvider`]
pub struct LocalDocumentProviderBuilder {
    config: ProviderConfig,
    source: Arc<dyn RootSource>,
    notifier: Option<Arc<dyn ChangeNotifier>>,
}

impl LocalDocumentProviderBuilder {
    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_root_source<S: RootSource + 'static>(mut self, source: S) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// Shorthand for a fixed root directory
    pub fn with_root<P: Into<PathBuf>>(self, root: P) -> Self {
        self.with_root_source(FixedRoot::new(root))
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ChangeNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the provider and resolve the root once
    pub fn build(self) -> LocalDocumentProvider {
        let notifier = self.notifier.unwrap_or_else(|| {
            Arc::new(EventBroadcaster::new(self.config.notify_capacity)) as Arc<dyn ChangeNotifier>
        });

        let provider = LocalDocumentProvider {
            config: self.config,
            source: self.source,
            codec: RwLock::new(None),
            notifier,
            subscriptions: SubscriptionRegistry::new(),
        };
        provider.reload_root();
        provider
    }
}

impl LocalDocumentProvider {
    pub fn builder() -> LocalDocumentProviderBuilder {
        LocalDocumentProviderBuilder {
            config: ProviderConfig::default(),
            source: Arc::new(FixedRoot::none()),
            notifier: None,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    /// Currently resolved root directory
    pub fn root(&self) -> Option<PathBuf> {
        self.codec.read().as_ref().map(|c| c.root().to_path_buf())
    }

    /// Re-resolve the root from its source; true when a root is configured
    pub fn reload_root(&self) -> bool {
        let codec = self
            .source
            .resolve_root()
            .and_then(|root| match DocumentIdCodec::new(&root) {
                Ok(codec) => Some(Arc::new(codec)),
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "Unusable root directory");
                    None
                }
            });

        match &codec {
            Some(c) => info!(root = %c.root().display(), "Root directory resolved"),
            None => info!("No root directory available"),
        }

        let configured = codec.is_some();
        *self.codec.write() = codec;
        configured
    }

    pub(super) fn codec(&self) -> Option<Arc<DocumentIdCodec>> {
        self.codec.read().clone()
    }

    pub(super) fn require_codec(&self) -> ProviderResult<Arc<DocumentIdCodec>> {
        self.codec()
            .ok_or_else(|| ProviderError::NotFound("no root directory configured".to_string()))
    }

    /// Run an operation inside a traced span
    pub(super) fn traced<T>(
        &self,
        operation: &'static str,
        document_id: &str,
        f: impl FnOnce(&OperationSpan) -> ProviderResult<T>,
    ) -> ProviderResult<T> {
        let span = span_operation(operation);
        span.record_document(document_id);
        let _entered = span.enter();
        let result = f(&span);
        span.finish(&result);
        result
    }

    /// Root descriptors: none without a root, otherwise exactly one
    pub fn list_roots(&self) -> Vec<RootDescriptor> {
        if self.codec().is_none() {
            return Vec::new();
        }

        vec![RootDescriptor {
            root_id: ROOT_ID.to_string(),
            title: self.config.title.clone(),
            icon: self.config.icon.clone(),
            flags: RootFlags::SUPPORTS_CREATE
                | RootFlags::SUPPORTS_RECENTS
                | RootFlags::SUPPORTS_SEARCH,
            document_id: DocumentId::root(),
            summary: None,
            mime_types: None,
            available_bytes: None,
        }]
    }

    /// Record for one document
    pub fn describe(&self, document_id: &str) -> ProviderResult<DocumentRecord> {
        self.traced("describe", document_id, |_| {
            let codec = self.require_codec()?;
            let path = codec.decode(document_id)?;
            self.record_for(&codec, &path)
        })
    }

    /// MIME type of one document
    pub fn document_type(&self, document_id: &str) -> ProviderResult<String> {
        self.describe(document_id).map(|record| record.mime_type)
    }

    /// Immediate children of a directory, sorted by name
    pub fn list_children(&self, parent_id: &str) -> ProviderResult<Vec<DocumentRecord>> {
        self.list_children_armed(parent_id)
            .map(|(records, _)| records)
    }

    /// Listing plus the notification URI it armed, if any
    pub(super) fn list_children_armed(
        &self,
        parent_id: &str,
    ) -> ProviderResult<(Vec<DocumentRecord>, Option<String>)> {
        self.traced("list_children", parent_id, |span| {
            let codec = match self.codec() {
                Some(codec) => codec,
                None => {
                    self.reload_root();
                    match self.codec() {
                        Some(codec) => codec,
                        None => return Ok((Vec::new(), None)),
                    }
                }
            };

            let folder = codec.decode_target(parent_id)?;
            let records = self.read_children(&codec, &folder);
            span.record_rows(records.len());

            let parent_key = codec.encode(&folder)?;
            let uri = child_documents_uri(&self.config.authority, parent_key.as_str());
            self.subscriptions.arm(parent_key.as_str(), &uri);

            Ok((records, Some(uri)))
        })
    }

    /// Listing failures degrade to an empty or partial result
    fn read_children(&self, codec: &DocumentIdCodec, folder: &Path) -> Vec<DocumentRecord> {
        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(folder = %folder.display(), error = %e, "Could not list directory");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(folder = %folder.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            match self.record_for(codec, &path) {
                Ok(record) => records.push(record),
                Err(e) => debug!(path = %path.display(), error = %e, "Skipping entry"),
            }
        }

        records.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        records
    }

    /// Project one path into a record
    pub(super) fn record_for(
        &self,
        codec: &DocumentIdCodec,
        path: &Path,
    ) -> ProviderResult<DocumentRecord> {
        // links leaving the root, and dangling links, describe the link itself
        let metadata = if codec.is_contained(path) {
            fs::metadata(path)
        } else {
            fs::symlink_metadata(path)
        }
        .map_err(|e| ProviderError::from_io(e, "stat", path))?;
        let document_id = codec.encode(path)?;

        let is_root = codec.is_root(path);
        let display_name = if is_root {
            self.config.title.clone()
        } else {
            display_name_of(path)
        };
        let icon = is_root.then(|| self.config.icon.clone());

        Ok(DocumentRecord::from_metadata(
            document_id,
            path,
            &metadata,
            display_name,
            icon,
        ))
    }

    /// Open the underlying file in the requested mode
    ///
    /// The signal is checked before the OS open and again before returning;
    /// a cancelled open closes the file.
    pub fn open(
        &self,
        document_id: &str,
        mode: OpenMode,
        signal: Option<&CancellationSignal>,
    ) -> ProviderResult<fs::File> {
        self.traced("open", document_id, |_| {
            if let Some(signal) = signal {
                signal.check()?;
            }

            let codec = self.require_codec()?;
            let path = codec.decode_target(document_id)?;
            let metadata =
                fs::metadata(&path).map_err(|e| ProviderError::from_io(e, "stat", &path))?;
            if metadata.is_dir() {
                return Err(ProviderError::InvalidArgument(format!(
                    "{} is a directory",
                    document_id
                )));
            }
            if mode.is_writable() && !is_writable(&path, &metadata) {
                return Err(ProviderError::Io(format!(
                    "{} is not writable",
                    document_id
                )));
            }

            let file = mode
                .options()
                .open(&path)
                .map_err(|e| ProviderError::from_io(e, "open", &path))?;

            if let Some(signal) = signal {
                // dropping the handle closes it
                signal.check()?;
            }

            debug!(path = %path.display(), ?mode, "Opened document");
            Ok(file)
        })
    }

    pub fn open_for_read(&self, document_id: &str) -> ProviderResult<fs::File> {
        self.open(document_id, OpenMode::Read, None)
    }

    pub fn open_for_write(&self, document_id: &str) -> ProviderResult<fs::File> {
        self.open(document_id, OpenMode::WriteTruncate, None)
    }

    /// Read handle over the whole file; no resizing happens here
    pub fn open_thumbnail(
        &self,
        document_id: &str,
        size_hint: SizeHint,
        signal: Option<&CancellationSignal>,
    ) -> ProviderResult<ThumbnailHandle> {
        debug!(
            document_id,
            width = size_hint.width,
            height = size_hint.height,
            "Thumbnail requested"
        );
        self.open(document_id, OpenMode::Read, signal)
            .map(ThumbnailHandle::whole_file)
    }

    /// Segment-wise subtree test on identifiers
    pub fn is_descendant_of(&self, parent_id: &str, document_id: &str) -> bool {
        codec::is_descendant(parent_id, document_id)
    }

    /// Publish a change under a parent's children URI
    pub(super) fn notify(&self, parent_id: DocumentId, document_id: DocumentId, kind: ChangeKind) {
        let uri = child_documents_uri(&self.config.authority, parent_id.as_str());
        let armed = self.subscriptions.record_notification(parent_id.as_str());
        debug!(uri = %uri, armed, "Publishing change");

        self.notifier.notify_change(&ChangeEvent {
            uri,
            parent_id,
            document_id,
            kind,
        });
    }
}

/// Final path component as a display name
pub(super) fn display_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn rows<'a, R: RowSource + 'a>(
    projection: Option<&Projection>,
    default: fn() -> Projection,
    items: impl IntoIterator<Item = &'a R>,
) -> RowSet {
    let mut set = match projection {
        Some(projection) => RowSet::new(projection),
        None => RowSet::new(&default()),
    };
    for item in items {
        set.push(item);
    }
    set
}

impl DocumentsProvider for LocalDocumentProvider {
    fn query_roots(&self, projection: Option<&Projection>) -> ProviderResult<RowSet> {
        let roots = self.list_roots();
        Ok(rows(projection, Projection::root_default, &roots))
    }

    fn query_document(
        &self,
        document_id: &str,
        projection: Option<&Projection>,
    ) -> ProviderResult<RowSet> {
        let record = self.describe(document_id)?;
        Ok(rows(
            projection,
            Projection::document_default,
            std::iter::once(&record),
        ))
    }

    fn query_child_documents(
        &self,
        parent_document_id: &str,
        projection: Option<&Projection>,
    ) -> ProviderResult<RowSet> {
        let (records, uri) = self.list_children_armed(parent_document_id)?;
        let mut set = rows(projection, Projection::document_default, &records);
        if let Some(uri) = uri {
            set.set_notification_uri(uri);
        }
        Ok(set)
    }

    fn query_search_documents(
        &self,
        root_id: &str,
        query: &str,
        projection: Option<&Projection>,
    ) -> ProviderResult<RowSet> {
        let records = self.search(root_id, query)?;
        let mut set = rows(projection, Projection::document_default, &records);
        set.set_notification_uri(search_uri(&self.config.authority, root_id, query));
        Ok(set)
    }

    fn query_recent_documents(
        &self,
        root_id: &str,
        projection: Option<&Projection>,
    ) -> ProviderResult<RowSet> {
        let records = self.recent(root_id)?;
        let mut set = rows(projection, Projection::document_default, &records);
        set.set_notification_uri(recent_uri(&self.config.authority, root_id));
        Ok(set)
    }

    fn get_document_type(&self, document_id: &str) -> ProviderResult<String> {
        self.document_type(document_id)
    }

    fn open_document(
        &self,
        document_id: &str,
        mode: &str,
        signal: Option<&CancellationSignal>,
    ) -> ProviderResult<fs::File> {
        self.open(document_id, OpenMode::parse(mode)?, signal)
    }

    fn open_document_thumbnail(
        &self,
        document_id: &str,
        size_hint: SizeHint,
        signal: Option<&CancellationSignal>,
    ) -> ProviderResult<ThumbnailHandle> {
        self.open_thumbnail(document_id, size_hint, signal)
    }

    fn create_document(
        &self,
        parent_document_id: &str,
        mime_type: &str,
        display_name: &str,
    ) -> ProviderResult<DocumentId> {
        self.create(parent_document_id, mime_type, display_name)
    }

    fn delete_document(&self, document_id: &str) -> ProviderResult<()> {
        self.delete(document_id)
    }

    fn rename_document(&self, document_id: &str, display_name: &str) -> ProviderResult<DocumentId> {
        self.rename(document_id, display_name)
    }

    fn is_child_document(&self, parent_document_id: &str, document_id: &str) -> bool {
        self.is_descendant_of(parent_document_id, document_id)
    }
}
