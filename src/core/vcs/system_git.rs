//! System git backend
//!
//! Only what the diff source needs: locate the work tree and list the files
//! changed between two revisions. Commands run with an isolated environment
//! so user config cannot change the output format.

use crate::core::error::{CiError, CiResult, GitError, ResultExt};
use crate::utils::clean_path;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> CiResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(CiError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(CiError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Files changed between two revisions, relative to the repository path.
  ///
  /// Deleted files are included: removing a file from a package still
  /// requires retesting it.
  pub fn changed_files_between(&self, from: &str, to: &str) -> CiResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["diff", "--name-only", "-z", "--relative", from, to])
      .output()
      .context("Failed to run git diff")?;

    if !output.status.success() {
      return Err(CiError::Git(GitError::CommandFailed {
        command: format!("git diff --name-only -z --relative {} {}", from, to),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(parse_name_only(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII
    cmd.arg("-c").arg("diff.renames=false"); // Report both sides of a rename

    cmd
  }
}

/// Parse NUL-separated `git diff --name-only -z` output.
///
/// Names are taken verbatim: no unquoting, trimming or separator rewriting.
fn parse_name_only(stdout: &str) -> Vec<String> {
  stdout
    .split('\0')
    .filter(|name| !name.is_empty())
    .filter_map(clean_path)
    .collect()
}
