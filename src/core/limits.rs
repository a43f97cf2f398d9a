/*!
 * Provider Limits and Constants
 *
 * Centralized location for fixed tokens, defaults, and caps.
 * Organized by domain for discoverability.
 */

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Sentinel naming the root of the addressable tree
/// Every document identifier starts with this token followed by `/`
pub const ROOT_ID: &str = "root";

/// Separator between identifier segments and path segments
pub const SEPARATOR: char = '/';

/// Token emitted by relativize for each base segment left behind
pub const PARENT_TOKEN: &str = "../";

// =============================================================================
// MIME TYPES
// =============================================================================

/// MIME type advertised for directories
pub const MIME_TYPE_DIR: &str = "vnd.android.document/directory";

/// Fallback MIME type for files without a known extension
pub const MIME_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Prefix that marks a MIME type as thumbnail-capable
pub const IMAGE_MIME_PREFIX: &str = "image/";

// =============================================================================
// CONFIGURATION DEFAULTS
// =============================================================================

/// Default human-readable root title
pub const DEFAULT_TITLE: &str = "Documents";

/// Default content authority used to build notification URIs
pub const DEFAULT_AUTHORITY: &str = "org.psr.gse.user";

/// Default icon reference advertised on the root row
pub const DEFAULT_ICON: &str = "mipmap/ic_launcher";

/// Change event buffer (1024 events)
/// Slow receivers lag and skip events once this fills
pub const DEFAULT_NOTIFY_CAPACITY: usize = 1024;

/// Environment variable naming the root directory
pub const ENV_ROOT: &str = "DOC_PROVIDER_ROOT";

/// Environment variable overriding the root title
pub const ENV_TITLE: &str = "DOC_PROVIDER_TITLE";

/// Environment variable overriding the content authority
pub const ENV_AUTHORITY: &str = "DOC_PROVIDER_AUTHORITY";

/// Environment variable overriding the notification buffer size
pub const ENV_NOTIFY_CAPACITY: &str = "DOC_PROVIDER_NOTIFY_CAPACITY";

/// Environment variable enabling JSON trace output
pub const ENV_TRACE_JSON: &str = "DOC_PROVIDER_TRACE_JSON";

// =============================================================================
// QUERY LIMITS
// =============================================================================

/// Maximum rows returned by search and recent queries
pub const MAX_QUERY_RESULTS: usize = 64;

/// Operations slower than this log a warning (10ms)
pub const SLOW_OPERATION_MS: u128 = 10;
