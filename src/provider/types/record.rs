/*!
 * Document and Root Records
 * Read-only projections of filesystem entries into provider rows
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::cursor::{Column, RowSource, Value};
use super::flags::{DocumentFlags, RootFlags};
use super::mime;
use crate::codec::DocumentId;
use crate::core::limits::MIME_TYPE_DIR;
use crate::core::serde::{is_none, system_time_millis, to_epoch_millis};

/// Whether the current process may write `path`
///
/// Asks the kernel through access(2), so ownership, groups and read-only
/// mounts count. Symlinks report their own (always permissive) bits, which
/// keeps dangling links deletable.
pub fn is_writable(path: &Path, metadata: &fs::Metadata) -> bool {
    #[cfg(unix)]
    {
        if !metadata.file_type().is_symlink() {
            return nix::unistd::access(path, nix::unistd::AccessFlags::W_OK).is_ok();
        }
    }
    let _ = path;
    !metadata.permissions().readonly()
}

/// One filesystem entry as seen by the host
///
/// Built fresh per query from metadata and dropped after serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DocumentRecord {
    pub document_id: DocumentId,
    pub mime_type: String,
    pub display_name: String,
    #[serde(with = "system_time_millis")]
    pub last_modified: SystemTime,
    pub flags: DocumentFlags,
    pub size: u64,
    #[serde(skip_serializing_if = "is_none", default)]
    pub icon: Option<String>,
}

impl DocumentRecord {
    /// Project metadata of `path` into a record
    ///
    /// `display_name` overrides the file name (used for the root title).
    pub fn from_metadata(
        document_id: DocumentId,
        path: &Path,
        metadata: &fs::Metadata,
        display_name: String,
        icon: Option<String>,
    ) -> Self {
        let is_dir = metadata.is_dir();
        let mime_type = mime::mime_type_for(path, is_dir);
        let writable = is_writable(path, metadata);
        let flags = DocumentFlags::derive(is_dir, writable, mime::is_image(mime_type));

        Self {
            document_id,
            mime_type: mime_type.to_string(),
            display_name,
            last_modified: metadata.modified().unwrap_or(UNIX_EPOCH),
            flags,
            size: metadata.len(),
            icon,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.mime_type == MIME_TYPE_DIR
    }

    #[inline]
    #[must_use]
    pub fn last_modified_millis(&self) -> i64 {
        to_epoch_millis(self.last_modified)
    }
}

impl RowSource for DocumentRecord {
    fn value(&self, column: Column) -> Value {
        match column {
            Column::DocumentId => self.document_id.as_str().into(),
            Column::MimeType => self.mime_type.as_str().into(),
            Column::DisplayName => self.display_name.as_str().into(),
            Column::LastModified => self.last_modified_millis().into(),
            Column::Flags => i64::from(self.flags.bits()).into(),
            Column::Size => Value::Integer(self.size as i64),
            Column::Icon => self.icon.as_deref().into(),
            _ => Value::Null,
        }
    }
}

/// The single root advertised to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RootDescriptor {
    pub root_id: String,
    pub title: String,
    pub icon: String,
    pub flags: RootFlags,
    pub document_id: DocumentId,
    #[serde(skip_serializing_if = "is_none", default)]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "is_none", default)]
    pub mime_types: Option<String>,
    #[serde(skip_serializing_if = "is_none", default)]
    pub available_bytes: Option<u64>,
}

impl RowSource for RootDescriptor {
    fn value(&self, column: Column) -> Value {
        match column {
            Column::RootId => self.root_id.as_str().into(),
            Column::Title => self.title.as_str().into(),
            Column::Icon => self.icon.as_str().into(),
            Column::Flags => i64::from(self.flags.bits()).into(),
            Column::DocumentId => self.document_id.as_str().into(),
            Column::Summary => self.summary.as_deref().into(),
            Column::MimeTypes => self.mime_types.as_deref().into(),
            Column::AvailableBytes => self.available_bytes.map(|b| b as i64).into(),
            _ => Value::Null,
        }
    }
}
