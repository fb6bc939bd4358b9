//! Finding the provisioned executable inside a vendor tree.
//!
//! Release archives are not consistent about their layout: the binary may sit
//! at the root, under `bin/`, or below a platform-key directory, and some
//! archives wrap everything in a versioned top-level folder. The locator tries
//! the known layouts in a fixed order and falls back to a bounded recursive
//! search.

use crate::platform::PlatformKey;
use crate::runtime::Runtime;
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directories nested deeper than this below the vendor root are not searched.
pub const MAX_SEARCH_DEPTH: usize = 32;

/// Locate `file_name` under `vendor_root`.
///
/// Search order, first regular file wins:
/// 1. `<root>/<key>/<name>`
/// 2. `<root>/<key>/bin/<name>`
/// 3. `<root>/<name>`
/// 4. `<root>/bin/<name>`
/// 5. depth-first search of the whole tree, entries visited in sorted order
#[tracing::instrument(skip(runtime))]
pub fn locate<R: Runtime>(
    runtime: &R,
    vendor_root: &Path,
    file_name: &str,
    platform: Option<PlatformKey>,
) -> Option<PathBuf> {
    let mut candidates = Vec::with_capacity(4);
    if let Some(key) = platform {
        let scoped = vendor_root.join(key.as_str());
        candidates.push(scoped.join(file_name));
        candidates.push(scoped.join("bin").join(file_name));
    }
    candidates.push(vendor_root.join(file_name));
    candidates.push(vendor_root.join("bin").join(file_name));

    if let Some(found) = candidates.into_iter().find(|p| runtime.is_file(p)) {
        debug!("Found binary at expected location {:?}", found);
        return Some(found);
    }

    let mut visited = HashSet::new();
    let found = search(runtime, vendor_root, file_name, 0, &mut visited);
    match &found {
        Some(path) => debug!("Found binary by searching: {:?}", path),
        None => debug!("No {} anywhere under {:?}", file_name, vendor_root),
    }
    found
}

fn search<R: Runtime>(
    runtime: &R,
    dir: &Path,
    file_name: &str,
    depth: usize,
    visited: &mut HashSet<PathBuf>,
) -> Option<PathBuf> {
    if depth > MAX_SEARCH_DEPTH {
        debug!("Not descending into {:?}: too deep", dir);
        return None;
    }

    // Symlinked directories can form cycles; visit each real directory once.
    let canonical = match runtime.canonicalize(dir) {
        Ok(path) => path,
        Err(e) => {
            debug!("Skipping {:?}: {}", dir, e);
            return None;
        }
    };
    if !visited.insert(canonical) {
        debug!("Skipping {:?}: already visited", dir);
        return None;
    }

    let mut entries = match runtime.read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping unreadable directory {:?}: {}", dir, e);
            return None;
        }
    };
    entries.sort();

    for entry in entries {
        if runtime.is_dir(&entry) {
            if let Some(found) = search(runtime, &entry, file_name, depth + 1, visited) {
                return Some(found);
            }
        } else if entry.file_name().is_some_and(|name| name == file_name)
            && runtime.is_file(&entry)
        {
            return Some(entry);
        }
    }

    None
}
