/*!
 * Open Modes and Handles
 * Host access-mode strings, cancellation, and thumbnail handles
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::{ProviderError, ProviderResult};

/// Access mode requested by the host when opening a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    /// `r`
    Read,
    /// `w` or `wt`
    WriteTruncate,
    /// `wa`
    WriteAppend,
    /// `rw`
    ReadWrite,
    /// `rwt`
    ReadWriteTruncate,
}

impl OpenMode {
    /// Parse a host mode string
    pub fn parse(mode: &str) -> ProviderResult<Self> {
        match mode {
            "r" => Ok(OpenMode::Read),
            "w" | "wt" => Ok(OpenMode::WriteTruncate),
            "wa" => Ok(OpenMode::WriteAppend),
            "rw" => Ok(OpenMode::ReadWrite),
            "rwt" => Ok(OpenMode::ReadWriteTruncate),
            other => Err(ProviderError::InvalidArgument(format!(
                "bad mode: {}",
                other
            ))),
        }
    }

    /// Check if the mode permits writing
    #[inline]
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, OpenMode::Read)
    }

    /// Translate into std open options
    pub fn options(self) -> fs::OpenOptions {
        let mut options = fs::OpenOptions::new();
        match self {
            OpenMode::Read => {
                options.read(true);
            }
            OpenMode::WriteTruncate => {
                options.write(true).create(true).truncate(true);
            }
            OpenMode::WriteAppend => {
                options.append(true).create(true);
            }
            OpenMode::ReadWrite => {
                options.read(true).write(true).create(true);
            }
            OpenMode::ReadWriteTruncate => {
                options.read(true).write(true).create(true).truncate(true);
            }
        }
        options
    }
}

/// Host-side cancellation flag
///
/// Only consulted at open boundaries; recursive deletes ignore it.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fail with `Cancelled` once the signal has fired
    pub fn check(&self) -> ProviderResult<()> {
        if self.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        Ok(())
    }
}

/// Requested thumbnail dimensions; accepted but never enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizeHint {
    pub width: u32,
    pub height: u32,
}

impl SizeHint {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Thumbnail byte range over an open file
///
/// Always starts at offset zero with unknown length: the whole file is the thumbnail.
#[derive(Debug)]
pub struct ThumbnailHandle {
    pub file: fs::File,
    pub offset: u64,
    pub length: Option<u64>,
}

impl ThumbnailHandle {
    pub fn whole_file(file: fs::File) -> Self {
        Self {
            file,
            offset: 0,
            length: None,
        }
    }

    pub fn into_file(self) -> fs::File {
        self.file
    }
}
