/*!
 * Identifier Codec
 * Bidirectional mapping between document identifiers and paths under a root
 */

pub mod relativize;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::core::limits::{ROOT_ID, SEPARATOR};
use crate::core::{ProviderError, ProviderResult};

pub use relativize::{escapes_base, relativize, split_path};

/// Opaque document identifier of the form `<root-token>/<relative-path>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Identifier of the root document itself
    #[must_use]
    pub fn root() -> Self {
        Self(format!("{}{}", ROOT_ID, SEPARATOR))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Segment-wise subtree test
    ///
    /// `root/a/bc` is not inside `root/a/b`. An identifier is inside itself.
    #[must_use]
    pub fn is_descendant_of(&self, parent: &str) -> bool {
        is_descendant(parent, &self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl PartialEq<str> for DocumentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DocumentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Segment-wise prefix comparison of two identifiers
///
/// Both identifiers must start with the root token; anything else is never a
/// descendant of anything.
pub fn is_descendant(parent_id: &str, id: &str) -> bool {
    let parent = split_path(parent_id);
    let child = split_path(id);
    if parent.first() != Some(&ROOT_ID) || child.first() != Some(&ROOT_ID) {
        return false;
    }
    parent.len() <= child.len() && parent.iter().zip(&child).all(|(p, c)| p == c)
}

/// Codec bound to one root directory
#[derive(Debug, Clone)]
pub struct DocumentIdCodec {
    root: PathBuf,
    root_str: String,
    /// Symlink-free form of the root, for containment checks
    canonical_root: PathBuf,
}

impl DocumentIdCodec {
    /// Create codec rooted at the specified path
    ///
    /// Fails when the root is not valid UTF-8, since identifiers are strings.
    pub fn new<P: Into<PathBuf>>(root: P) -> ProviderResult<Self> {
        let root = root.into();
        let root_str = path_str(&root)?.to_string();
        let canonical_root = fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        Ok(Self {
            root,
            root_str,
            canonical_root,
        })
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True when `path` names the root directory itself
    #[inline]
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.root
    }

    /// Map a path under the root to its identifier
    ///
    /// Not existence-checked. A path outside the root is a caller bug and
    /// yields [`ProviderError::Fatal`].
    pub fn encode(&self, path: &Path) -> ProviderResult<DocumentId> {
        let target = path_str(path)?;
        let relative = relativize(&self.root_str, target);
        if escapes_base(&relative) {
            return Err(ProviderError::Fatal(format!(
                "{} lies outside root {}",
                target, self.root_str
            )));
        }
        Ok(DocumentId(format!("{}{}{}", ROOT_ID, SEPARATOR, relative)))
    }

    /// Map an identifier to its path without touching the filesystem
    ///
    /// Redundant separators, `.` segments, and trailing separators are dropped,
    /// so equivalent identifiers resolve to the same path.
    pub fn resolve(&self, id: &str) -> ProviderResult<PathBuf> {
        let remainder = id
            .strip_prefix(ROOT_ID)
            .filter(|rest| rest.is_empty() || rest.starts_with(SEPARATOR))
            .ok_or_else(|| ProviderError::NotFound(format!("unknown document {}", id)))?;

        let relative = remainder.trim_start_matches(SEPARATOR);
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(ProviderError::InvalidArgument(format!(
                "document {} escapes the root",
                id
            )));
        }

        let mut path = self.root.clone();
        for component in Path::new(relative).components() {
            if let Component::Normal(name) = component {
                path.push(name);
            }
        }
        Ok(path)
    }

    /// True when `path`, with every symlink resolved, lies under the root
    ///
    /// Paths that cannot be resolved (missing, dangling) are not contained.
    pub fn is_contained(&self, path: &Path) -> bool {
        fs::canonicalize(path)
            .map(|real| real.starts_with(&self.canonical_root))
            .unwrap_or(false)
    }

    /// Map an identifier to an existing entry
    ///
    /// The entry itself is not followed, so a symlink (even a dangling one)
    /// decodes to its own path. The directory holding it must resolve inside
    /// the root.
    pub fn decode(&self, id: &str) -> ProviderResult<PathBuf> {
        let path = self.resolve(id)?;
        if fs::symlink_metadata(&path).is_err() {
            return Err(ProviderError::NotFound(format!(
                "File {} does not exist.",
                id
            )));
        }

        if !self.is_root(&path) {
            if let Some(parent) = path.parent() {
                if !self.is_contained(parent) {
                    return Err(ProviderError::InvalidArgument(format!(
                        "document {} lies behind a link out of the root",
                        id
                    )));
                }
            }
        }
        Ok(path)
    }

    /// Map an identifier to an entry whose contents may be read or written
    ///
    /// Unlike [`decode`](Self::decode) the entry itself is followed: a dangling
    /// link is `NotFound` and a link out of the root is refused.
    pub fn decode_target(&self, id: &str) -> ProviderResult<PathBuf> {
        let path = self.decode(id)?;
        if self.is_contained(&path) {
            return Ok(path);
        }
        if fs::metadata(&path).is_err() {
            return Err(ProviderError::NotFound(format!(
                "link {} points nowhere",
                id
            )));
        }
        Err(ProviderError::InvalidArgument(format!(
            "document {} links out of the root",
            id
        )))
    }
}

/// Borrow a path as UTF-8
pub(crate) fn path_str(path: &Path) -> ProviderResult<&str> {
    path.to_str().ok_or_else(|| {
        ProviderError::InvalidArgument(format!("non UTF-8 path {}", path.display()))
    })
}
