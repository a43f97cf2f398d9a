/*!
 * Mutation Operations
 * Create, delete, and rename with collision avoidance
 *
 * Mutations are not serialized against each other. The collision probe and
 * the create/rename that follows are two separate OS calls, so two racing
 * mutations on the same parent can both pick the same free name; the loser
 * then fails with `Io` (create) or overwrites (rename, per OS semantics).
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::local::{display_name_of, LocalDocumentProvider};
use super::observable::ChangeKind;
use super::types::mime::is_directory_mime;
use super::types::*;
use crate::codec::{DocumentId, DocumentIdCodec};
use crate::core::limits::SEPARATOR;

/// Reject names that are not a single path component
pub(super) fn validate_display_name(name: &str) -> ProviderResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(ProviderError::InvalidArgument(format!(
            "invalid display name {:?}",
            name
        )));
    }
    if name.contains(SEPARATOR) || name.contains('\0') {
        return Err(ProviderError::InvalidArgument(format!(
            "display name {:?} must be a single path component",
            name
        )));
    }
    Ok(())
}

/// Candidate `attempt` for a desired name
///
/// `note.txt` becomes `note.txt.1.txt`; `saves` becomes `saves.1`. A dot at
/// the start or end of the name does not introduce an extension.
pub fn candidate_name(name: &str, attempt: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => {
            format!("{}.{}.{}", name, attempt, &name[dot + 1..])
        }
        _ => format!("{}.{}", name, attempt),
    }
}

/// True when something (including a dangling symlink) occupies `path`
fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// First unused path for `name` inside `parent`
///
/// Attempts are capped at the parent's entry count plus one: at most that many
/// candidates can be occupied, so exhausting the cap means the directory
/// changed underneath us.
pub fn find_free_path(parent: &Path, name: &str) -> ProviderResult<PathBuf> {
    let desired = parent.join(name);
    if !is_taken(&desired) {
        return Ok(desired);
    }

    let cap = fs::read_dir(parent)
        .map_err(|e| ProviderError::from_io(e, "list", parent))?
        .count()
        + 1;

    for attempt in 1..=cap {
        let candidate = parent.join(candidate_name(name, attempt));
        if !is_taken(&candidate) {
            debug!(
                desired = %desired.display(),
                chosen = %candidate.display(),
                attempt,
                "Resolved name collision"
            );
            return Ok(candidate);
        }
    }

    Err(ProviderError::Io(format!(
        "no free name for {} in {} after {} attempts",
        name,
        parent.display(),
        cap
    )))
}

/// Remove a node; directories are emptied depth-first first
///
/// Symlinks are unlinked, never traversed. The first failure aborts and
/// leaves whatever was already removed gone.
pub fn delete_recursively(path: &Path) -> ProviderResult<()> {
    delete_tree(path, &os_remove)
}

fn os_remove(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Depth-first removal in name order through `remove`
fn delete_tree(path: &Path, remove: &dyn Fn(&Path, bool) -> io::Result<()>) -> ProviderResult<()> {
    let metadata =
        fs::symlink_metadata(path).map_err(|e| ProviderError::from_io(e, "stat", path))?;

    if metadata.is_dir() {
        let mut children = fs::read_dir(path)
            .map_err(|e| io_failure(e, "list", path))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| io_failure(e, "list", path))?;
        children.sort();

        for child in &children {
            delete_tree(child, remove)?;
        }
        remove(path, true).map_err(|e| io_failure(e, "remove directory", path))
    } else {
        remove(path, false).map_err(|e| io_failure(e, "remove", path))
    }
}

/// Mutation failures are `Io` even when the cause is a vanished entry
fn io_failure(e: std::io::Error, op: &str, path: &Path) -> ProviderError {
    ProviderError::Io(format!("{} {}: {}", op, path.display(), e))
}

/// Parent identifier of a non-root path
fn parent_of(codec: &DocumentIdCodec, path: &Path) -> ProviderResult<(PathBuf, DocumentId)> {
    let parent = path
        .parent()
        .ok_or_else(|| ProviderError::Fatal(format!("{} has no parent", path.display())))?
        .to_path_buf();
    let parent_id = codec.encode(&parent)?;
    Ok((parent, parent_id))
}

impl LocalDocumentProvider {
    /// Create an empty file or directory under a parent directory
    pub fn create(
        &self,
        parent_id: &str,
        mime_type: &str,
        display_name: &str,
    ) -> ProviderResult<DocumentId> {
        self.traced("create", parent_id, |_| {
            validate_display_name(display_name)?;
            let codec = self.require_codec()?;
            let parent = codec.decode_target(parent_id)?;
            if !parent.is_dir() {
                return Err(ProviderError::InvalidArgument(format!(
                    "{} is not a directory",
                    parent_id
                )));
            }

            let target = find_free_path(&parent, display_name)?;
            if is_directory_mime(mime_type) {
                fs::create_dir(&target).map_err(|e| io_failure(e, "create directory", &target))?;
            } else {
                fs::OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&target)
                    .map_err(|e| io_failure(e, "create", &target))?;
            }

            let document_id = codec.encode(&target)?;
            info!(document_id = %document_id, mime_type, "Created document");

            self.notify(codec.encode(&parent)?, document_id.clone(), ChangeKind::Created);
            Ok(document_id)
        })
    }

    /// Delete a document, recursing into directories
    pub fn delete(&self, document_id: &str) -> ProviderResult<()> {
        self.traced("delete", document_id, |_| {
            let codec = self.require_codec()?;
            let path = codec.decode(document_id)?;
            if codec.is_root(&path) {
                return Err(ProviderError::InvalidArgument(
                    "the root document cannot be deleted".to_string(),
                ));
            }

            let (_, parent_id) = parent_of(&codec, &path)?;
            let canonical = codec.encode(&path)?;

            let outcome = delete_recursively(&path);
            let released = self.subscriptions().release_subtree(canonical.as_str());
            debug!(document_id = %canonical, released, "Released subscriptions");
            if let Err(e) = outcome {
                warn!(document_id, error = %e, "Delete aborted, earlier removals are kept");
                return Err(e);
            }

            info!(document_id = %canonical, "Deleted document");
            self.notify(parent_id, canonical, ChangeKind::Deleted);
            Ok(())
        })
    }

    /// Rename a document within its parent; returns the new identifier
    pub fn rename(&self, document_id: &str, display_name: &str) -> ProviderResult<DocumentId> {
        self.traced("rename", document_id, |_| {
            validate_display_name(display_name)?;
            let codec = self.require_codec()?;
            let path = codec.decode(document_id)?;
            if codec.is_root(&path) {
                return Err(ProviderError::InvalidArgument(
                    "the root document cannot be renamed".to_string(),
                ));
            }

            let current = codec.encode(&path)?;
            if display_name_of(&path) == display_name {
                debug!(document_id = %current, "Rename to current name");
                return Ok(current);
            }

            let (parent, parent_id) = parent_of(&codec, &path)?;
            let target = find_free_path(&parent, display_name)?;
            fs::rename(&path, &target).map_err(|e| io_failure(e, "rename", &path))?;

            let renamed = codec.encode(&target)?;
            info!(from = %current, to = %renamed, "Renamed document");
            self.subscriptions().release_subtree(current.as_str());

            self.notify(
                parent_id,
                renamed.clone(),
                ChangeKind::Renamed { from: current },
            );
            Ok(renamed)
        })
    }
}
