/*!
 * Capability Flags
 * Bit sets advertised on document and root rows
 */

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Per-document capability bits
///
/// Bit values match the host picker contract so rows can be handed over as-is.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentFlags(u32);

impl DocumentFlags {
    pub const NONE: Self = Self(0);
    pub const SUPPORTS_THUMBNAIL: Self = Self(1);
    pub const SUPPORTS_WRITE: Self = Self(1 << 1);
    pub const SUPPORTS_DELETE: Self = Self(1 << 2);
    pub const DIR_SUPPORTS_CREATE: Self = Self(1 << 3);
    pub const SUPPORTS_RENAME: Self = Self(1 << 6);

    /// Derive capabilities from entry kind, writability, and MIME type
    ///
    /// Writable directories accept children, writable files accept content.
    /// Writable entries of either kind can be deleted and renamed. Image files
    /// advertise thumbnails regardless of writability.
    #[must_use]
    pub fn derive(is_dir: bool, writable: bool, is_image: bool) -> Self {
        let mut flags = Self::NONE;
        if writable {
            flags |= if is_dir {
                Self::DIR_SUPPORTS_CREATE
            } else {
                Self::SUPPORTS_WRITE
            };
            flags |= Self::SUPPORTS_DELETE | Self::SUPPORTS_RENAME;
        }
        if !is_dir && is_image {
            flags |= Self::SUPPORTS_THUMBNAIL;
        }
        flags
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DocumentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DocumentFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Per-root capability bits
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootFlags(u32);

impl RootFlags {
    pub const NONE: Self = Self(0);
    pub const SUPPORTS_CREATE: Self = Self(1);
    pub const SUPPORTS_RECENTS: Self = Self(1 << 2);
    pub const SUPPORTS_SEARCH: Self = Self(1 << 3);

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for RootFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writable_directory() {
        let flags = DocumentFlags::derive(true, true, false);
        assert!(flags.contains(DocumentFlags::DIR_SUPPORTS_CREATE));
        assert!(flags.contains(DocumentFlags::SUPPORTS_DELETE | DocumentFlags::SUPPORTS_RENAME));
        assert!(!flags.contains(DocumentFlags::SUPPORTS_WRITE));
        assert_eq!(flags.bits(), 8 | 4 | 64);
    }

    #[test]
    fn test_writable_image_file() {
        let flags = DocumentFlags::derive(false, true, true);
        assert_eq!(flags.bits(), 1 | 2 | 4 | 64);
    }

    #[test]
    fn test_readonly_entries() {
        assert_eq!(DocumentFlags::derive(true, false, false), DocumentFlags::NONE);
        assert_eq!(
            DocumentFlags::derive(false, false, true),
            DocumentFlags::SUPPORTS_THUMBNAIL
        );
        // directories never advertise thumbnails
        assert_eq!(DocumentFlags::derive(true, false, true), DocumentFlags::NONE);
    }

    #[test]
    fn test_root_flags() {
        let flags =
            RootFlags::SUPPORTS_CREATE | RootFlags::SUPPORTS_RECENTS | RootFlags::SUPPORTS_SEARCH;
        assert_eq!(flags.bits(), 13);
        assert_eq!(serde_json::to_string(&flags).unwrap(), "13");
    }
}
