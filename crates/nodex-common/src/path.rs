//! Content path helpers.
//!
//! Node paths are absolute, `/`-separated strings such as `/sites/acme/about`.
//! The root node is `/`, and every site lives below [`SITES_ROOT`].

use std::cmp::Ordering;

use crate::{Error, Result};

/// Path separator.
pub const SEPARATOR: char = '/';

/// Path of the root node.
pub const ROOT: &str = "/";

/// Path of the node all sites hang below.
pub const SITES_ROOT: &str = "/sites";

/// Replacement for [`SEPARATOR`] when building sort keys.
///
/// Must sort before every character that can appear in a path segment, so that
/// `/a/b` orders before `/a-b` and sibling subtrees are never interleaved.
pub const SORT_SENTINEL: char = '\0';

/// Check that a path is absolute and has no empty segments.
pub fn validate(path: &str) -> Result<()> {
    if !path.starts_with(SEPARATOR) {
        return Err(Error::RelativePath(path.to_string()));
    }
    if path != ROOT && path[1..].split(SEPARATOR).any(str::is_empty) {
        return Err(Error::EmptySegment(path.to_string()));
    }
    Ok(())
}

/// Final segment of a path; empty for the root node.
pub fn node_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Parent path, or `None` for the root node.
pub fn parent_path(path: &str) -> Option<&str> {
    if path == ROOT || path.is_empty() {
        return None;
    }
    match path.rfind(SEPARATOR) {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Join a relative path below a parent path.
pub fn join(parent: &str, relative: &str) -> String {
    let relative = relative.trim_matches(SEPARATOR);
    if relative.is_empty() {
        return parent.to_string();
    }
    if parent.ends_with(SEPARATOR) {
        format!("{}{}", parent, relative)
    } else {
        format!("{}{}{}", parent, SEPARATOR, relative)
    }
}

/// Absolute path of a starting point given relative to the sites root
/// (e.g. `acme/about` becomes `/sites/acme/about`).
pub fn site_path(starting_point: &str) -> String {
    join(SITES_ROOT, starting_point)
}

/// Site node name of a starting point (its first segment).
pub fn site_node_name(starting_point: &str) -> &str {
    starting_point
        .trim_start_matches(SEPARATOR)
        .split(SEPARATOR)
        .next()
        .unwrap_or_default()
}

/// Whether `path` lies strictly below `ancestor`.
pub fn is_descendant_of(path: &str, ancestor: &str) -> bool {
    if ancestor == ROOT {
        return path != ROOT && path.starts_with(SEPARATOR);
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path[ancestor.len()..].starts_with(SEPARATOR)
}


/// Sort key for a path: every separator replaced by [`SORT_SENTINEL`].
pub fn sort_key(path: &str) -> String {
    path.replace(SEPARATOR, &SORT_SENTINEL.to_string())
}

/// Compare two paths in depth-first, alphabetical order.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}
