//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A monorepo fixture on disk
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create an empty project with a config using `package.json` markers
  pub fn new() -> Result<Self> {
    Self::with_config(r#"{ "package-file": ["package.json"] }"#)
  }

  /// Create an empty project with the given config document
  pub fn with_config(config: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    std::fs::write(path.join("ci-config.jsonc"), config)?;
    Ok(Self { _root: root, path })
  }

  /// Add a package (a directory with a `package.json`)
  pub fn add_package(&self, dir: &str) -> Result<PathBuf> {
    let pkg_path = self.path.join(dir);
    std::fs::create_dir_all(&pkg_path)?;
    std::fs::write(pkg_path.join("package.json"), format!("{{ \"name\": \"{}\" }}\n", dir))?;
    Ok(pkg_path)
  }

  /// Write a file, creating parent directories
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Write a diff file listing the given paths
  pub fn write_diffs(&self, paths: &[&str]) -> Result<PathBuf> {
    let diff_path = self.path.join("diffs.txt");
    std::fs::write(&diff_path, paths.join("\n"))?;
    Ok(diff_path)
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Turn the project into a git repo with everything committed
  pub fn init_git(&self) -> Result<String> {
    git(&self.path, &["init", "--initial-branch=main"])?;
    git(&self.path, &["config", "user.name", "Test User"])?;
    git(&self.path, &["config", "user.email", "test@example.com"])?;
    self.commit("Initial commit")
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run affected-ci without checking the exit status
pub fn affected_ci(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_affected-ci");

  Command::new(bin)
    .current_dir(cwd)
    .env_remove("RUST_LOG")
    .args(args)
    .output()
    .context("Failed to run affected-ci")
}

/// Run affected-ci and require success
pub fn run_affected_ci(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = affected_ci(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "affected-ci command failed: affected-ci {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Parse stdout as a JSON array of package ids
pub fn json_packages(output: &Output) -> Result<Vec<String>> {
  let stdout = String::from_utf8_lossy(&output.stdout);
  serde_json::from_str(stdout.trim()).with_context(|| format!("stdout is not a JSON array: {}", stdout))
}
