//! Path classification against a package layout

use crate::core::config::Config;
use crate::utils::{ROOT, parent_dir};
use std::path::Path;

/// Answers "is this path relevant" and "which package owns it".
///
/// Paths are slash-separated and relative to `root`. Only
/// [`is_package_root`](Self::is_package_root) touches the filesystem.
#[derive(Debug, Clone, Copy)]
pub struct PathClassifier<'a> {
  config: &'a Config,
  root: &'a Path,
}

impl<'a> PathClassifier<'a> {
  pub fn new(config: &'a Config, root: &'a Path) -> Self {
    Self { config, root }
  }

  pub fn config(&self) -> &'a Config {
    self.config
  }

  pub fn root(&self) -> &'a Path {
    self.root
  }

  /// True iff the path matches an include pattern and no ignore pattern
  pub fn matches(&self, path: &str) -> bool {
    self.config.matches(path)
  }

  /// True iff `dir` contains one of the configured marker files
  pub fn is_package_root(&self, dir: &str) -> bool {
    let dir = self.root.join(dir);
    self.config.package_files().iter().any(|marker| dir.join(marker).exists())
  }

  /// The package a path belongs to.
  ///
  /// Walks up from the parent directory and stops at the first package root,
  /// or at the project root (`"."`) when no package claims the path.
  pub fn owning_package(&self, path: &str) -> String {
    let mut dir = parent_dir(path);
    while dir != ROOT && !self.is_package_root(dir) {
      dir = parent_dir(dir);
    }
    dir.to_string()
  }
}
