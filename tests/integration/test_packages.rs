//! Integration tests for `affected-ci packages`

use crate::helpers::{TestProject, json_packages, run_affected_ci};
use anyhow::Result;

#[test]
fn test_packages_lists_every_marker_dir() -> Result<()> {
  let project = TestProject::new()?;
  project.add_package("web")?;
  project.add_package("services/api")?;
  project.add_package("services/api/plugins/auth")?;
  project.write_file("docs/guide.md", "# Guide\n")?;

  let output = run_affected_ci(&project.path, &["packages"])?;
  assert_eq!(
    json_packages(&output)?,
    vec!["services/api", "services/api/plugins/auth", "web"]
  );

  Ok(())
}

#[test]
fn test_packages_skips_excluded_subtree() -> Result<()> {
  let project = TestProject::with_config(
    r#"{
      "package-file": ["package.json"],
      "exclude-packages": ["vendor"]
    }"#,
  )?;
  project.add_package("app")?;
  project.add_package("vendor")?;
  project.add_package("vendor/lib")?;

  let output = run_affected_ci(&project.path, &["packages"])?;
  assert_eq!(json_packages(&output)?, vec!["app"]);

  Ok(())
}

#[test]
fn test_packages_respects_ignore_patterns() -> Result<()> {
  let project = TestProject::with_config(
    r#"{
      "package-file": ["package.json"],
      "ignore": ["fixtures"]
    }"#,
  )?;
  project.add_package("app")?;
  project.add_package("test/fixtures/sample")?;

  let output = run_affected_ci(&project.path, &["packages"])?;
  assert_eq!(json_packages(&output)?, vec!["app"]);

  Ok(())
}

#[test]
fn test_packages_text_format() -> Result<()> {
  let project = TestProject::new()?;
  project.add_package("app")?;

  let output = run_affected_ci(&project.path, &["packages", "--format", "text"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Packages: 1"), "stdout: {}", stdout);
  assert!(stdout.contains("📦 app"), "stdout: {}", stdout);

  Ok(())
}

#[test]
fn test_packages_with_explicit_config_and_root() -> Result<()> {
  let project = TestProject::with_config(r#"{ "package-file": ["go.mod"] }"#)?;
  project.write_file("svc/go.mod", "module svc\n")?;
  project.add_package("web")?;

  let config = project.path.join("ci-config.jsonc");
  let root = project.path.to_string_lossy().to_string();
  let output = run_affected_ci(
    std::env::temp_dir().as_path(),
    &["--root", &root, "--config", &config.to_string_lossy(), "packages"],
  )?;
  assert_eq!(json_packages(&output)?, vec!["svc"]);

  Ok(())
}
