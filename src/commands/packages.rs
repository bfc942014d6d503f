//! `affected-ci packages` - List every package in the project

use super::affected::{OutputFormat, check_matrix_limit, render_packages};
use crate::core::context::ProjectContext;
use crate::core::error::CiResult;
use crate::packages::ChangeResolver;

/// Run the packages command
pub fn run_packages(ctx: &ProjectContext, format: String) -> CiResult<()> {
  let output_format = OutputFormat::from_str(&format)?;
  let packages = ChangeResolver::new(ctx.classifier()).all()?;

  if output_format == OutputFormat::Text {
    println!("Packages: {}", packages.len());
    for pkg in &packages {
      println!("  📦 {}", pkg);
    }
    return Ok(());
  }

  if output_format == OutputFormat::Json {
    check_matrix_limit(&packages)?;
  }
  print!("{}", render_packages(&packages, output_format)?);
  Ok(())
}
