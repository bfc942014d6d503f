//! Exhaustive package discovery
//!
//! Walks every directory below the project root. Excluded packages are
//! skipped together with their subtree; everything else is visited, because
//! package roots may nest arbitrarily deep.

use super::classifier::PathClassifier;
use crate::core::error::CiResult;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Find every package below the project root, sorted by identifier
pub fn find_all_packages(classifier: &PathClassifier<'_>) -> CiResult<Vec<String>> {
  let root = classifier.root();
  let config = classifier.config();

  let walker = WalkDir::new(root)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| match relative_id(root, entry) {
      Some(id) => !config.is_excluded(&id),
      None => true,
    });

  let mut packages = Vec::new();
  for entry in walker {
    let entry = entry?;
    if !entry.file_type().is_dir() {
      continue;
    }
    let Some(id) = relative_id(root, &entry) else {
      continue;
    };
    if classifier.matches(&id) && classifier.is_package_root(&id) {
      packages.push(id);
    }
  }

  packages.sort();
  tracing::debug!(count = packages.len(), "discovered packages");
  Ok(packages)
}

/// Slash-separated identifier of an entry relative to the root.
///
/// Directory names are kept as they are on disk, whitespace included.
fn relative_id(root: &Path, entry: &DirEntry) -> Option<String> {
  let relative = entry.path().strip_prefix(root).ok()?;
  let segments: Vec<_> = relative
    .components()
    .map(|component| component.as_os_str().to_string_lossy())
    .collect();
  Some(segments.join("/"))
}
