/*!
 * Search and Recents
 * Depth-first walks of the root for name matches and recently modified files
 */

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::local::{display_name_of, LocalDocumentProvider};
use super::types::*;
use crate::codec::DocumentIdCodec;
use crate::core::limits::{MAX_QUERY_RESULTS, ROOT_ID};

/// Depth-first walk that never follows symlinked directories
///
/// `visit` returns false to stop the walk early. Unreadable directories are
/// skipped.
fn walk(root: &Path, visit: &mut dyn FnMut(&Path, &fs::Metadata) -> bool) {
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                continue;
            }
        };

        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        paths.sort();

        let mut subdirs = Vec::new();
        for path in paths {
            let link = match fs::symlink_metadata(&path) {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            let metadata = if link.file_type().is_symlink() {
                match fs::metadata(&path) {
                    Ok(target) => target,
                    Err(_) => continue,
                }
            } else {
                link.clone()
            };

            if !visit(&path, &metadata) {
                return;
            }
            if link.is_dir() {
                subdirs.push(path);
            }
        }
        // reversed so subdirectories pop in name order
        stack.extend(subdirs.into_iter().rev());
    }
}

impl LocalDocumentProvider {
    fn require_root_id(&self, root_id: &str) -> ProviderResult<std::sync::Arc<DocumentIdCodec>> {
        if root_id != ROOT_ID {
            return Err(ProviderError::NotFound(format!("unknown root {}", root_id)));
        }
        self.require_codec()
    }

    /// Documents whose display name contains `query`, case-insensitively
    pub fn search(&self, root_id: &str, query: &str) -> ProviderResult<Vec<DocumentRecord>> {
        self.traced("search", root_id, |span| {
            let needle = query.trim().to_lowercase();
            if needle.is_empty() {
                return Err(ProviderError::InvalidArgument(
                    "search query is empty".to_string(),
                ));
            }
            let codec = self.require_root_id(root_id)?;

            let mut results = Vec::new();
            walk(codec.root(), &mut |path, _| {
                if display_name_of(path).to_lowercase().contains(&needle) {
                    match self.record_for(&codec, path) {
                        Ok(record) => results.push(record),
                        Err(e) => debug!(path = %path.display(), error = %e, "Skipping match"),
                    }
                }
                results.len() < MAX_QUERY_RESULTS
            });

            span.record_rows(results.len());
            debug!(query, matches = results.len(), "Search finished");
            Ok(results)
        })
    }

    /// Regular files, most recently modified first
    pub fn recent(&self, root_id: &str) -> ProviderResult<Vec<DocumentRecord>> {
        self.traced("recent", root_id, |span| {
            let codec = self.require_root_id(root_id)?;

            let mut files = Vec::new();
            walk(codec.root(), &mut |path, metadata| {
                if metadata.is_file() {
                    files.push(path.to_path_buf());
                }
                true
            });

            let mut records: Vec<DocumentRecord> = files
                .iter()
                .filter_map(|path| self.record_for(&codec, path).ok())
                .collect();
            records.sort_by_key(|record| Reverse(record.last_modified));
            records.truncate(MAX_QUERY_RESULTS);
            span.record_rows(records.len());
            Ok(records)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn provider(temp: &TempDir) -> LocalDocumentProvider {
        LocalDocumentProvider::builder().with_root(temp.path()).build()
    }

    fn touch(path: &Path, age_secs: u64) {
        fs::write(path, b"").unwrap();
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    #[test]
    fn test_search_matches_names_case_insensitively() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Saves/Zelda")).unwrap();
        fs::write(temp.path().join("Saves/Zelda/zelda.sav"), b"").unwrap();
        fs::write(temp.path().join("mario.sav"), b"").unwrap();
        let provider = provider(&temp);

        let ids: Vec<String> = provider
            .search("root", "ZELDA")
            .unwrap()
            .into_iter()
            .map(|r| r.document_id.into_string())
            .collect();
        assert_eq!(ids, vec!["root/Saves/Zelda", "root/Saves/Zelda/zelda.sav"]);
    }

    #[test]
    fn test_search_rejects_bad_input() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp);
        assert!(matches!(
            provider.search("root", "  "),
            Err(ProviderError::InvalidArgument(_))
        ));
        assert!(provider.search("sdcard", "x").unwrap_err().is_not_found());
        assert!(provider.recent("sdcard").unwrap_err().is_not_found());
    }

    #[test]
    fn test_search_is_capped() {
        let temp = TempDir::new().unwrap();
        for i in 0..(MAX_QUERY_RESULTS + 10) {
            fs::write(temp.path().join(format!("rom{}.bin", i)), b"").unwrap();
        }
        let provider = provider(&temp);
        assert_eq!(provider.search("root", "rom").unwrap().len(), MAX_QUERY_RESULTS);
    }

    #[test]
    fn test_recent_orders_by_modification() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();
        touch(&temp.path().join("old.txt"), 3600);
        touch(&temp.path().join("dir/new.txt"), 10);
        touch(&temp.path().join("mid.txt"), 600);
        let provider = provider(&temp);

        let names: Vec<String> = provider
            .recent("root")
            .unwrap()
            .into_iter()
            .map(|r| r.display_name)
            .collect();
        assert_eq!(names, vec!["new.txt", "mid.txt", "old.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_follow_symlinked_dirs() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), b"").unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();
        let provider = provider(&temp);

        assert!(provider.search("root", "secret").unwrap().is_empty());
    }
}
