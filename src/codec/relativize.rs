/*!
 * Path Relativization
 * Shortest relative path between two absolute paths, computed lexically
 */

use crate::core::limits::{PARENT_TOKEN, SEPARATOR};

/// Split a path into its non-empty segments
///
/// Runs of separators collapse, so `//a///b/` yields `["a", "b"]`.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Compute the relative path that leads from `base` to `target`
///
/// `base` is always treated as a directory. One `../` is emitted per base
/// segment past the common prefix, then the remaining target segments. A
/// trailing separator on `target` is carried over unless the result is empty.
pub fn relativize(base: &str, target: &str) -> String {
    let bases = split_path(base);
    let targets = split_path(target);

    let common = bases
        .iter()
        .zip(targets.iter())
        .take_while(|(b, t)| b == t)
        .count();

    let mut out = String::with_capacity(target.len());
    for _ in common..bases.len() {
        out.push_str(PARENT_TOKEN);
    }
    out.push_str(&targets[common..].join("/"));

    if target.ends_with(SEPARATOR) && !out.is_empty() && !out.ends_with(SEPARATOR) {
        out.push(SEPARATOR);
    }

    out
}

/// True when a relativize result climbs out of its base
#[inline]
#[must_use]
pub fn escapes_base(relative: &str) -> bool {
    relative.starts_with(PARENT_TOKEN)
}
