/*!
 * Provider Integration Tests
 * End-to-end behaviour of the local provider against a scratch root
 */

use doc_provider::core::limits::{MIME_TYPE_DIR, MIME_TYPE_OCTET_STREAM};
use doc_provider::provider::{
    CancellationSignal, Column, DocumentFlags, DocumentsProvider, Projection, SizeHint, Value,
};
use doc_provider::{LocalDocumentProvider, ProviderConfig, ProviderError};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use tempfile::TempDir;

fn setup() -> (TempDir, LocalDocumentProvider) {
    let temp = TempDir::new().unwrap();
    let provider = LocalDocumentProvider::builder()
        .with_config(ProviderConfig::default().with_title("Game Saves"))
        .with_root(temp.path())
        .build();
    (temp, provider)
}

#[test]
fn test_decode_of_encode_is_identity() {
    let (temp, provider) = setup();
    fs::create_dir_all(temp.path().join("a/b")).unwrap();
    fs::write(temp.path().join("a/b/c.txt"), b"c").unwrap();

    for id in ["root/a", "root/a/b", "root/a/b/c.txt"] {
        let record = provider.describe(id).unwrap();
        assert_eq!(record.document_id, id);
    }
}

#[test]
fn test_file_collisions_number_mid_extension() {
    let (temp, provider) = setup();

    let ids: Vec<String> = (0..3)
        .map(|_| {
            provider
                .create("root/", "text/plain", "note.txt")
                .unwrap()
                .into_string()
        })
        .collect();

    assert_eq!(
        ids,
        vec!["root/note.txt", "root/note.txt.1.txt", "root/note.txt.2.txt"]
    );
    assert!(temp.path().join("note.txt.2.txt").is_file());
}

#[test]
fn test_directory_collisions_append_suffix() {
    let (_temp, provider) = setup();
    assert_eq!(provider.create("root/", MIME_TYPE_DIR, "sub").unwrap(), "root/sub");
    assert_eq!(provider.create("root/", MIME_TYPE_DIR, "sub").unwrap(), "root/sub.1");

    let record = provider.describe("root/sub.1").unwrap();
    assert!(record.is_dir());
}

#[test]
fn test_delete_removes_every_descendant() {
    let (temp, provider) = setup();
    let dir = provider.create("root/", MIME_TYPE_DIR, "level").unwrap();
    let nested = provider.create(dir.as_str(), MIME_TYPE_DIR, "nested").unwrap();
    let file = provider
        .create(nested.as_str(), MIME_TYPE_OCTET_STREAM, "data.bin")
        .unwrap();

    provider.delete(dir.as_str()).unwrap();

    for id in [&dir, &nested, &file] {
        assert!(provider.describe(id.as_str()).unwrap_err().is_not_found());
    }
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_empty_directory_lists_zero_rows() {
    let (_temp, provider) = setup();
    provider.create("root/", MIME_TYPE_DIR, "empty").unwrap();

    let rows = provider.query_child_documents("root/empty", None).unwrap();
    assert!(rows.is_empty());
    assert!(rows.notification_uri().is_some());
}

#[test]
fn test_root_record_uses_configured_title() {
    let (temp, provider) = setup();
    let rows = provider.query_document("root/", None).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows.get(0, Column::DisplayName),
        Some(&Value::from("Game Saves"))
    );
    let raw_name = temp.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_ne!(rows.strings(Column::DisplayName), vec![raw_name.as_str()]);
}

#[test]
fn test_query_roots_projection() {
    let (_temp, provider) = setup();
    let projection = Projection::from_names(&["root_id", "flags", "document_id"]).unwrap();

    let rows = provider.query_roots(Some(&projection)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.get(0, Column::RootId), Some(&Value::from("root")));
    assert_eq!(rows.get(0, Column::Flags), Some(&Value::Integer(13)));
    assert_eq!(rows.get(0, Column::DocumentId), Some(&Value::from("root/")));

    assert!(matches!(
        Projection::from_names(&["bogus"]),
        Err(ProviderError::InvalidArgument(_))
    ));
}

#[test]
fn test_missing_documents_are_not_found() {
    let (_temp, provider) = setup();
    assert!(provider.describe("root/ghost").unwrap_err().is_not_found());
    assert!(provider.delete("root/ghost").unwrap_err().is_not_found());
    assert!(provider.rename("root/ghost", "x").unwrap_err().is_not_found());
    assert!(provider
        .query_child_documents("root/ghost", None)
        .unwrap_err()
        .is_not_found());
    assert!(provider.describe("elsewhere/x").unwrap_err().is_not_found());
}

#[test]
fn test_rename_reports_new_identifier() {
    let (temp, provider) = setup();
    let id = provider.create("root/", "text/plain", "draft.txt").unwrap();

    let renamed = provider.rename(id.as_str(), "final.txt").unwrap();
    assert_eq!(renamed, "root/final.txt");
    assert!(!temp.path().join("draft.txt").exists());
    assert_eq!(
        provider.describe(renamed.as_str()).unwrap().display_name,
        "final.txt"
    );
}

#[test]
fn test_is_child_document_is_segment_wise() {
    let (_temp, provider) = setup();
    assert!(provider.is_child_document("root/a", "root/a/b"));
    assert!(!provider.is_child_document("root/a/b", "root/a/bc"));
    assert!(provider.is_child_document("root/", "root/anything/deep"));
}

#[test]
fn test_escaping_identifiers_are_rejected() {
    let (_temp, provider) = setup();
    assert!(matches!(
        provider.describe("root/../../etc/passwd"),
        Err(ProviderError::InvalidArgument(_))
    ));
}

#[test]
fn test_open_document_modes() {
    let (_temp, provider) = setup();
    let id = provider.create("root/", "text/plain", "log.txt").unwrap();

    let mut file = provider.open_document(id.as_str(), "w", None).unwrap();
    file.write_all(b"one").unwrap();
    drop(file);

    let mut file = provider.open_document(id.as_str(), "wa", None).unwrap();
    file.write_all(b"two").unwrap();
    drop(file);

    let mut file = provider.open_document(id.as_str(), "rw", None).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "onetwo");

    assert!(matches!(
        provider.open_document(id.as_str(), "x", None),
        Err(ProviderError::InvalidArgument(_))
    ));

    let signal = CancellationSignal::new();
    signal.cancel();
    assert!(matches!(
        provider.open_document(id.as_str(), "r", Some(&signal)),
        Err(ProviderError::Cancelled)
    ));
}

#[test]
fn test_image_documents_offer_thumbnails() {
    let (_temp, provider) = setup();
    let id = provider.create("root/", "image/png", "shot.png").unwrap();

    let record = provider.describe(id.as_str()).unwrap();
    assert_eq!(record.mime_type, "image/png");
    assert!(record.flags.contains(DocumentFlags::SUPPORTS_THUMBNAIL));
    assert_eq!(provider.get_document_type(id.as_str()).unwrap(), "image/png");

    let handle = provider
        .open_document_thumbnail(id.as_str(), SizeHint::new(96, 96), None)
        .unwrap();
    assert_eq!(handle.offset, 0);
}

#[test]
fn test_search_and_recent_through_contract() {
    let (_temp, provider) = setup();
    provider.create("root/", "text/plain", "alpha.txt").unwrap();
    provider.create("root/", "text/plain", "beta.txt").unwrap();

    let rows = provider.query_search_documents("root", "ALP", None).unwrap();
    assert_eq!(rows.strings(Column::DisplayName), vec!["alpha.txt"]);

    assert!(rows
        .notification_uri()
        .is_some_and(|uri| uri.contains("/search")));

    let recent = provider.query_recent_documents("root", None).unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent
        .notification_uri()
        .is_some_and(|uri| uri.contains("/recent")));
}

#[cfg(unix)]
#[test]
fn test_links_out_of_the_root_stay_closed() {
    let (temp, provider) = setup();
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
    std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

    let names: Vec<String> = provider
        .list_children("root/")
        .unwrap()
        .into_iter()
        .map(|r| r.display_name)
        .collect();
    assert_eq!(names, vec!["link"]);

    assert!(matches!(
        provider.list_children("root/link"),
        Err(ProviderError::InvalidArgument(_))
    ));
    assert!(matches!(
        provider.open_for_read("root/link/secret.txt"),
        Err(ProviderError::InvalidArgument(_))
    ));
    assert!(matches!(
        provider.create("root/link", "text/plain", "planted.txt"),
        Err(ProviderError::InvalidArgument(_))
    ));
    assert!(!outside.path().join("planted.txt").exists());

    provider.delete("root/link").unwrap();
    assert!(fs::symlink_metadata(temp.path().join("link")).is_err());
    assert_eq!(fs::read(outside.path().join("secret.txt")).unwrap(), b"secret");
}

#[cfg(unix)]
#[test]
fn test_dangling_links_are_listed_and_deletable() {
    let (temp, provider) = setup();
    std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("dangling")).unwrap();

    let listed = provider.list_children("root/").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].document_id, "root/dangling");

    assert_eq!(
        provider.create("root/", "text/plain", "dangling").unwrap(),
        "root/dangling.1"
    );

    provider.delete("root/dangling").unwrap();
    assert!(fs::symlink_metadata(temp.path().join("dangling")).is_err());
    assert!(temp.path().join("dangling.1").is_file());
}
