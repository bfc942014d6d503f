//! Where the list of changed files comes from

use crate::core::error::{CiResult, ResultExt};
use crate::core::vcs::SystemGit;
use crate::utils::parse_diff_lines;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Source of changed file paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
  /// Newline-delimited file of paths
  File(PathBuf),
  /// Newline-delimited paths on stdin
  Stdin,
  /// `git diff` between two revisions
  Git { from: String, to: String },
}

impl DiffSource {
  /// Pick a source from CLI arguments; `-` as file means stdin
  pub fn from_args(diffs_file: Option<PathBuf>, from: Option<String>, to: Option<String>) -> Option<Self> {
    match (diffs_file, from) {
      (Some(path), _) if path == Path::new("-") => Some(Self::Stdin),
      (Some(path), _) => Some(Self::File(path)),
      (None, Some(from)) => Some(Self::Git {
        from,
        to: to.unwrap_or_else(|| "HEAD".to_string()),
      }),
      (None, None) => None,
    }
  }

  /// Read the changed paths, trimmed and without blank entries
  pub fn read(&self, root: &Path) -> CiResult<Vec<String>> {
    match self {
      Self::File(path) => {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(parse_diff_lines(&text))
      }
      Self::Stdin => {
        let mut text = String::new();
        std::io::stdin()
          .read_to_string(&mut text)
          .context("Failed to read changed files from stdin")?;
        Ok(parse_diff_lines(&text))
      }
      Self::Git { from, to } => {
        let git = SystemGit::open(root)?;
        tracing::debug!(work_tree = %git.work_tree().display(), from = %from, to = %to, "listing changed files");
        git.changed_files_between(from, to)
      }
    }
  }

  pub fn describe(&self) -> String {
    match self {
      Self::File(path) => path.display().to_string(),
      Self::Stdin => "stdin".to_string(),
      Self::Git { from, to } => format!("{}..{}", from, to),
    }
  }
}
