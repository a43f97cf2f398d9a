/*!
 * Identifier Codec Property Tests
 * Round-trip and containment properties over generated paths
 */

use doc_provider::codec::{escapes_base, relativize, DocumentIdCodec};
use doc_provider::is_descendant;
use proptest::prelude::*;
use std::path::{Path, PathBuf};

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_ .-]{0,11}".prop_filter("not a dot segment", |s| {
        s != "." && s != ".." && !s.ends_with(' ')
    })
}

fn segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 0..6)
}

proptest! {
    #[test]
    fn prop_encode_resolve_round_trip(segs in segments()) {
        let codec = DocumentIdCodec::new("/data/user/files").unwrap();
        let mut path = PathBuf::from("/data/user/files");
        for s in &segs {
            path.push(s);
        }

        let id = codec.encode(&path).unwrap();
        prop_assert!(id.as_str().starts_with("root/"));
        prop_assert_eq!(codec.resolve(id.as_str()).unwrap(), path);
    }

    #[test]
    fn prop_relativize_inside_base_never_escapes(segs in segments()) {
        let target = format!("/base/{}", segs.join("/"));
        let relative = relativize("/base", &target);
        prop_assert!(!escapes_base(&relative));
        prop_assert_eq!(relative, segs.join("/"));
    }

    #[test]
    fn prop_relativize_sibling_escapes(a in segment(), b in segment()) {
        prop_assume!(a != b);
        let relative = relativize(&format!("/base/{}", a), &format!("/base/{}/x", b));
        prop_assert!(escapes_base(&relative));
        prop_assert_eq!(relative, format!("../{}/x", b));
    }

    #[test]
    fn prop_descendant_matches_path_prefix(parent in segments(), child in segments()) {
        let parent_id = format!("root/{}", parent.join("/"));
        let mut all = parent.clone();
        all.extend(child.iter().cloned());
        let child_id = format!("root/{}", all.join("/"));

        prop_assert!(is_descendant(&parent_id, &child_id));

        let parent_path = Path::new("/r").join(parent.join("/"));
        let child_path = Path::new("/r").join(all.join("/"));
        prop_assert!(child_path.starts_with(&parent_path));
    }
}

#[test]
fn test_encode_rejects_paths_outside_root() {
    let codec = DocumentIdCodec::new("/data/user/files").unwrap();
    for outside in ["/data/user", "/data/user/files2/x", "/etc/passwd"] {
        assert!(codec.encode(Path::new(outside)).is_err(), "{}", outside);
    }
}
