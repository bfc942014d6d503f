//! Affected package analysis
//!
//! Given a set of changed files, determine which packages must be retested:
//! - Files that don't match the config never trigger anything
//! - Every other file belongs to exactly one package
//! - A file owned by the project root is a global change: every package is affected
//! - Excluded packages are dropped from the result

use super::classifier::PathClassifier;
use super::discovery::find_all_packages;
use crate::core::error::CiResult;
use crate::utils::{ROOT, clean_path};
use std::collections::BTreeSet;

/// Result of resolving a diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffectedAnalysis {
  /// Files that changed
  pub changed_files: Vec<String>,

  /// First changed file owned by the project root, if any
  pub global_change: Option<String>,

  /// Packages dropped because they are listed in `exclude-packages`
  pub excluded: Vec<String>,

  /// Affected packages, sorted
  pub packages: Vec<String>,
}

impl AffectedAnalysis {
  pub fn is_empty(&self) -> bool {
    self.packages.is_empty()
  }

  pub fn is_global(&self) -> bool {
    self.global_change.is_some()
  }
}

/// Maps diffs to affected packages
pub struct ChangeResolver<'a> {
  classifier: PathClassifier<'a>,
}

impl<'a> ChangeResolver<'a> {
  pub fn new(classifier: PathClassifier<'a>) -> Self {
    Self { classifier }
  }

  /// Packages owning at least one matching changed file, before exclusion.
  ///
  /// Paths are folded first; paths leaving the project root are skipped.
  /// Also returns the first file that resolved to the project root.
  pub fn changed(&self, diffs: &[String]) -> (BTreeSet<String>, Option<String>) {
    let mut changed = BTreeSet::new();
    let mut global_change = None;

    for diff in diffs {
      let Some(path) = clean_path(diff) else {
        tracing::warn!("⚠️ Skipping {:?}, it is outside the project root.", diff);
        continue;
      };
      if !self.classifier.matches(&path) {
        tracing::debug!(file = %path, "ignoring unmatched file");
        continue;
      }
      let package = self.classifier.owning_package(&path);
      if package == ROOT && global_change.is_none() {
        global_change = Some(path);
      }
      changed.insert(package);
    }

    (changed, global_change)
  }

  /// Resolve a diff into the set of affected packages
  pub fn affected(&self, diffs: &[String]) -> CiResult<AffectedAnalysis> {
    let (changed, global_change) = self.changed(diffs);

    let candidates = match &global_change {
      Some(file) => {
        tracing::info!("🌐 Global file changed ({}), all packages are affected.", file);
        find_all_packages(&self.classifier)?
      }
      None => changed.into_iter().collect(),
    };

    let config = self.classifier.config();
    let (excluded, packages): (Vec<String>, Vec<String>) =
      candidates.into_iter().partition(|pkg| config.is_excluded(pkg));

    for pkg in &excluded {
      tracing::info!("ℹ️ Excluded package {:?}, skipping.", pkg);
    }

    Ok(AffectedAnalysis {
      changed_files: diffs.to_vec(),
      global_change,
      excluded,
      packages,
    })
  }

  /// Every package in the project, with exclusions applied
  pub fn all(&self) -> CiResult<Vec<String>> {
    find_all_packages(&self.classifier)
  }
}
