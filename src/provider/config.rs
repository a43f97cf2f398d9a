/*!
 * Provider Configuration
 * Explicit configuration values and root-directory sources
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use super::traits::RootSource;
use crate::core::limits::{
    DEFAULT_AUTHORITY, DEFAULT_ICON, DEFAULT_NOTIFY_CAPACITY, DEFAULT_TITLE, ENV_AUTHORITY,
    ENV_NOTIFY_CAPACITY, ENV_ROOT, ENV_TITLE,
};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ProviderConfig {
    /// Display name of the root, shown instead of the root directory's own name
    pub title: String,
    /// Content authority used in notification URIs
    pub authority: String,
    /// Icon reference advertised on the root
    pub icon: String,
    /// Broadcast buffer for the default notifier
    pub notify_capacity: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            icon: DEFAULT_ICON.to_string(),
            notify_capacity: DEFAULT_NOTIFY_CAPACITY,
        }
    }
}

impl ProviderConfig {
    /// Defaults overridden by `DOC_PROVIDER_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(title) = non_empty_var(ENV_TITLE) {
            config.title = title;
        }
        if let Some(authority) = non_empty_var(ENV_AUTHORITY) {
            config.authority = authority;
        }
        if let Some(raw) = non_empty_var(ENV_NOTIFY_CAPACITY) {
            match raw.parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.notify_capacity = capacity,
                _ => warn!(
                    value = %raw,
                    default = DEFAULT_NOTIFY_CAPACITY,
                    "Ignoring invalid notification capacity"
                ),
            }
        }

        config
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_notify_capacity(mut self, capacity: usize) -> Self {
        self.notify_capacity = capacity;
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Root fixed at construction time
#[derive(Debug, Clone, Default)]
pub struct FixedRoot(Option<PathBuf>);

impl FixedRoot {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self(Some(root.into()))
    }

    /// No storage available
    pub fn none() -> Self {
        Self(None)
    }
}

impl RootSource for FixedRoot {
    fn resolve_root(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Root read from an environment variable, created on first resolution
#[derive(Debug, Clone)]
pub struct EnvRoot {
    var: String,
}

impl EnvRoot {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvRoot {
    fn default() -> Self {
        Self::new(ENV_ROOT)
    }
}

impl RootSource for EnvRoot {
    fn resolve_root(&self) -> Option<PathBuf> {
        let raw = non_empty_var(&self.var)?;
        let path = PathBuf::from(raw);

        if let Err(e) = std::fs::create_dir_all(&path) {
            warn!(path = %path.display(), error = %e, "Could not create root directory");
            return None;
        }

        match path.canonicalize() {
            Ok(canonical) => Some(canonical),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Using root without canonicalization");
                Some(path)
            }
        }
    }
}
