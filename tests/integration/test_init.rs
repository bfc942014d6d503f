//! Integration tests for `affected-ci init`

use crate::helpers::{TestProject, affected_ci, run_affected_ci};
use anyhow::Result;

#[test]
fn test_init_writes_config() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::remove_file(project.path.join("ci-config.jsonc"))?;

  run_affected_ci(
    &project.path,
    &["init", "--package-file", "package.json", "--ignore", "*.md"],
  )?;

  assert!(project.file_exists("ci-config.jsonc"));
  let written: serde_json::Value = serde_json::from_str(&project.read_file("ci-config.jsonc")?)?;
  assert_eq!(written["package-file"], serde_json::json!(["package.json"]));
  assert_eq!(written["ignore"], serde_json::json!(["*.md"]));

  // The written config drives the other commands
  project.add_package("app")?;
  let output = run_affected_ci(&project.path, &["packages"])?;
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), r#"["app"]"#);

  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let project = TestProject::new()?;
  let before = project.read_file("ci-config.jsonc")?;

  let output = affected_ci(&project.path, &["init", "--package-file", "go.mod"])?;
  assert_eq!(output.status.code(), Some(2));
  assert_eq!(project.read_file("ci-config.jsonc")?, before);

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("--force"), "stderr: {}", stderr);

  run_affected_ci(&project.path, &["init", "--package-file", "go.mod", "--force"])?;
  assert!(project.read_file("ci-config.jsonc")?.contains("go.mod"));

  Ok(())
}
