//! Project context - build once, pass everywhere
//!
//! Holds the project root and the loaded configuration. Built in `main`
//! and handed by reference to every command.

use crate::core::config::{self, Config};
use crate::core::error::CiResult;
use crate::packages::PathClassifier;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProjectContext {
  /// Project root directory; diff paths and package ids are relative to it
  pub root: PathBuf,

  /// Path of the loaded config file
  pub config_path: PathBuf,

  /// Package layout configuration
  pub config: Arc<Config>,
}

impl ProjectContext {
  /// Load the configuration for a project root.
  ///
  /// `config` overrides the default `ci-config.jsonc`; relative paths are
  /// resolved against `root`.
  pub fn build(root: &Path, config: Option<&Path>) -> CiResult<Self> {
    let config_path = config::resolve_config_path(root, config);
    let config = Arc::new(Config::load(&config_path)?);

    Ok(Self {
      root: root.to_path_buf(),
      config_path,
      config,
    })
  }

  pub fn classifier(&self) -> PathClassifier<'_> {
    PathClassifier::new(&self.config, &self.root)
  }

  pub fn project_root(&self) -> &Path {
    &self.root
  }
}
