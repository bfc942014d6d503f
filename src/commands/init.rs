//! `affected-ci init` - Write a starter configuration file

use crate::core::config::{self, Config, ConfigFile};
use crate::core::error::{CiError, CiResult, ConfigError};
use std::path::Path;

/// Run the init command
pub fn run_init(
  root: &Path,
  config_path: Option<&Path>,
  package_files: Vec<String>,
  ignore: Vec<String>,
  force: bool,
) -> CiResult<()> {
  let path = config::resolve_config_path(root, config_path);
  if path.exists() && !force {
    return Err(CiError::Config(ConfigError::AlreadyExists { path }));
  }

  let config = Config::from_file(ConfigFile {
    package_file: Some(package_files),
    matches: None,
    ignore: (!ignore.is_empty()).then_some(ignore),
    exclude_packages: None,
  })?;
  config.save(&path)?;

  println!("✅ Wrote {}", path.display());
  println!("\n📌 Next steps:");
  println!("   1. Review the marker files and ignore patterns");
  println!("   2. Run `affected-ci packages` to check package discovery");
  Ok(())
}
