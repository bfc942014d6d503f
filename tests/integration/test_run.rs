//! Integration tests for `affected-ci run`

use crate::helpers::{TestProject, affected_ci, run_affected_ci};
use anyhow::Result;

fn three_packages() -> Result<TestProject> {
  let project = TestProject::new()?;
  project.add_package("a")?;
  project.add_package("b")?;
  project.add_package("c")?;
  Ok(project)
}

#[test]
fn test_run_every_failure_is_reported() -> Result<()> {
  let project = three_packages()?;

  let output = affected_ci(&project.path, &["run", "--all", "-j", "1", "--", "sh", "-c", "exit 1"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("❌ a (exit status 1)"), "stderr: {}", stderr);
  assert!(stderr.contains("❌ b (exit status 1)"), "stderr: {}", stderr);
  assert!(stderr.contains("❌ c (exit status 1)"), "stderr: {}", stderr);

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("0 passed, 3 failed, 3 total"), "stdout: {}", stdout);
  assert!(stderr.contains("3 of 3 package(s) failed"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_run_substitutes_package() -> Result<()> {
  let project = three_packages()?;

  run_affected_ci(
    &project.path,
    &["run", "--all", "--", "sh", "-c", "touch {package}/ran.txt"],
  )?;

  assert!(project.file_exists("a/ran.txt"));
  assert!(project.file_exists("b/ran.txt"));
  assert!(project.file_exists("c/ran.txt"));

  Ok(())
}

#[test]
fn test_run_appends_package_without_placeholder() -> Result<()> {
  let project = three_packages()?;

  let output = run_affected_ci(&project.path, &["run", "--package", "b", "--", "echo", "testing"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("✅ b"), "stdout: {}", stdout);
  assert!(stdout.contains("1 passed, 0 failed, 1 total"), "stdout: {}", stdout);

  Ok(())
}

#[test]
fn test_run_only_affected_packages() -> Result<()> {
  let project = three_packages()?;
  project.write_diffs(&["c/index.js"])?;

  run_affected_ci(
    &project.path,
    &["run", "--diffs-file", "diffs.txt", "--", "sh", "-c", "touch {package}/ran.txt"],
  )?;

  assert!(!project.file_exists("a/ran.txt"));
  assert!(!project.file_exists("b/ran.txt"));
  assert!(project.file_exists("c/ran.txt"));

  Ok(())
}

#[test]
fn test_run_failure_output_is_captured() -> Result<()> {
  let project = three_packages()?;

  let output = affected_ci(
    &project.path,
    &["run", "--package", "a", "--", "sh", "-c", "echo boom-{package}; exit 3"],
  )?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("❌ a (exit status 3)"), "stderr: {}", stderr);
  assert!(stderr.contains("boom-a"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_run_dry_run() -> Result<()> {
  let project = three_packages()?;

  let output = run_affected_ci(
    &project.path,
    &["run", "--all", "--dry-run", "--", "sh", "-c", "touch {package}/ran.txt"],
  )?;

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("DRY RUN"), "stdout: {}", stdout);
  assert!(stdout.contains("touch a/ran.txt"), "stdout: {}", stdout);
  assert!(!project.file_exists("a/ran.txt"));

  Ok(())
}

#[test]
fn test_run_nothing_affected() -> Result<()> {
  let project = three_packages()?;
  project.write_diffs(&[])?;

  let output = run_affected_ci(&project.path, &["run", "--diffs-file", "diffs.txt", "--", "false"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("No packages affected"), "stdout: {}", stdout);

  Ok(())
}

#[test]
fn test_run_zero_concurrency_is_rejected() -> Result<()> {
  let project = three_packages()?;

  let output = affected_ci(&project.path, &["run", "--all", "-j", "0", "--", "true"])?;
  assert_eq!(output.status.code(), Some(2));

  Ok(())
}
