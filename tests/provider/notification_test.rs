/*!
 * Change Notification Tests
 * Delivery of mutation events through the default broadcast notifier
 */

use doc_provider::core::limits::MIME_TYPE_DIR;
use doc_provider::provider::uri::{child_documents_uri, document_id_from_uri};
use doc_provider::{
    ChangeEvent, ChangeKind, ChangeNotifier, DocumentId, EventBroadcaster, LocalDocumentProvider,
    ProviderConfig,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tempfile::TempDir;

const AUTHORITY: &str = "org.example.saves";

fn setup(broadcaster: &EventBroadcaster) -> (TempDir, LocalDocumentProvider) {
    let temp = TempDir::new().unwrap();
    let provider = LocalDocumentProvider::builder()
        .with_config(ProviderConfig::default().with_authority(AUTHORITY))
        .with_root(temp.path())
        .with_notifier(Arc::new(broadcaster.clone()))
        .build();
    (temp, provider)
}

#[tokio::test]
async fn test_mutations_publish_under_parent_children_uri() {
    let broadcaster = EventBroadcaster::new(16);
    let mut events = broadcaster.subscribe();
    let (_temp, provider) = setup(&broadcaster);

    let dir = provider.create("root/", MIME_TYPE_DIR, "saves").unwrap();
    let file = provider.create(dir.as_str(), "text/plain", "a.txt").unwrap();
    let renamed = provider.rename(file.as_str(), "b.txt").unwrap();
    provider.delete(renamed.as_str()).unwrap();

    let created_dir = events.recv().await.unwrap();
    assert_eq!(created_dir.uri, child_documents_uri(AUTHORITY, "root/"));
    assert_eq!(created_dir.kind, ChangeKind::Created);

    let created_file = events.recv().await.unwrap();
    assert_eq!(created_file.parent_id, "root/saves");
    assert_eq!(
        document_id_from_uri(&created_file.uri).as_deref(),
        Some("root/saves")
    );

    let rename = events.recv().await.unwrap();
    assert_eq!(
        rename.kind,
        ChangeKind::Renamed {
            from: DocumentId::from("root/saves/a.txt")
        }
    );
    assert_eq!(rename.document_id, "root/saves/b.txt");

    let delete = events.recv().await.unwrap();
    assert_eq!(delete.kind, ChangeKind::Deleted);
    assert_eq!(delete.uri, created_file.uri);
}

#[tokio::test]
async fn test_listing_arms_the_key_mutations_publish_under() {
    let broadcaster = EventBroadcaster::new(16);
    let mut events = broadcaster.subscribe();
    let (_temp, provider) = setup(&broadcaster);

    // trailing-slash and bare forms arm the same key
    provider.list_children("root").unwrap();
    provider.list_children("root/").unwrap();
    provider.create("root", "text/plain", "x.txt").unwrap();

    let event = events.recv().await.unwrap();
    let subscription = provider.subscriptions().get("root/").unwrap();
    assert_eq!(subscription.uri, event.uri);
    assert_eq!(subscription.listings, 2);
    assert_eq!(subscription.notifications, 1);
}

#[test]
fn test_failed_mutations_publish_nothing() {
    #[derive(Default)]
    struct Recorder(Mutex<Vec<ChangeEvent>>);

    impl ChangeNotifier for Recorder {
        fn notify_change(&self, event: &ChangeEvent) {
            self.0.lock().push(event.clone());
        }
    }

    let temp = TempDir::new().unwrap();
    let recorder = Arc::new(Recorder::default());
    let provider = LocalDocumentProvider::builder()
        .with_root(temp.path())
        .with_notifier(recorder.clone())
        .build();

    assert!(provider.delete("root/missing").is_err());
    assert!(provider.rename("root/missing", "y").is_err());
    assert!(provider.create("root/", "text/plain", "bad/name").is_err());
    assert!(recorder.0.lock().is_empty());

    provider.create("root/", "text/plain", "ok").unwrap();
    assert_eq!(recorder.0.lock().len(), 1);
}
