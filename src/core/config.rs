//! Package layout configuration
//!
//! Loaded from a JSON document that may contain `//` and `/* */` comments:
//!
//! ```text
//! {
//!   // Marker files identifying a package root (required)
//!   "package-file": ["package.json"],
//!   "match": ["*"],
//!   "ignore": ["node_modules/", "*.md"],
//!   "exclude-packages": ["legacy"]
//! }
//! ```

use crate::core::error::{CiError, CiResult, ConfigError, ResultExt};
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default config file name, relative to the project root
pub const DEFAULT_CONFIG_FILE: &str = "ci-config.jsonc";

/// On-disk shape of the configuration
///
/// Every field is optional here so that missing required fields can be
/// reported with a proper error instead of a serde message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
  /// Filenames that mark the root of a package
  #[serde(rename = "package-file", default, skip_serializing_if = "Option::is_none")]
  pub package_file: Option<Vec<String>>,

  /// Patterns a path must match to be considered
  #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
  pub matches: Option<Vec<String>>,

  /// Patterns that exclude a path
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ignore: Option<Vec<String>>,

  /// Packages that are never reported
  #[serde(rename = "exclude-packages", default, skip_serializing_if = "Option::is_none")]
  pub exclude_packages: Option<Vec<String>>,
}

/// A single include/ignore pattern
///
/// Matches when the glob matches the path's final segment, or when the raw
/// pattern occurs anywhere in the full path.
#[derive(Debug, Clone)]
pub struct PathPattern {
  raw: String,
  glob: Option<Pattern>,
}

const GLOB_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

impl PathPattern {
  pub fn new(raw: impl Into<String>) -> Self {
    let raw = raw.into();
    // An invalid glob still works as a substring filter
    let glob = Pattern::new(&raw).ok();
    Self { raw, glob }
  }

  pub fn as_str(&self) -> &str {
    &self.raw
  }

  pub fn matches(&self, path: &str) -> bool {
    let filename = path.rsplit('/').next().unwrap_or(path);
    if let Some(glob) = &self.glob
      && glob.matches_with(filename, GLOB_OPTIONS)
    {
      return true;
    }
    path.contains(self.raw.as_str())
  }
}

/// An ordered list of patterns, matching if any of them does
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
  patterns: Vec<PathPattern>,
}

impl PatternSet {
  pub fn new<I, S>(patterns: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      patterns: patterns.into_iter().map(PathPattern::new).collect(),
    }
  }

  pub fn matches(&self, path: &str) -> bool {
    self.patterns.iter().any(|p| p.matches(path))
  }

  pub fn to_strings(&self) -> Vec<String> {
    self.patterns.iter().map(|p| p.as_str().to_string()).collect()
  }
}

/// Validated, immutable package layout configuration
#[derive(Debug, Clone)]
pub struct Config {
  package_file: Vec<String>,
  matches: PatternSet,
  ignore: PatternSet,
  exclude_packages: Vec<String>,
}

impl Config {
  /// Build a config from its on-disk shape, applying defaults
  pub fn from_file(file: ConfigFile) -> CiResult<Self> {
    let package_file = match file.package_file {
      Some(markers) if !markers.is_empty() => markers,
      _ => {
        return Err(CiError::Config(ConfigError::MissingField {
          field: "package-file".to_string(),
        }));
      }
    };

    Ok(Self {
      package_file,
      matches: PatternSet::new(file.matches.unwrap_or_else(|| vec!["*".to_string()])),
      ignore: PatternSet::new(file.ignore.unwrap_or_default()),
      exclude_packages: file.exclude_packages.unwrap_or_default(),
    })
  }

  /// Load a config file from disk
  pub fn load(path: &Path) -> CiResult<Self> {
    if !path.exists() {
      return Err(CiError::Config(ConfigError::NotFound {
        path: path.to_path_buf(),
      }));
    }

    let source = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Self::parse(&source).map_err(|e| match e {
      CiError::Message { message, .. } => CiError::Config(ConfigError::Parse {
        path: path.to_path_buf(),
        message,
      }),
      other => other,
    })
  }

  /// Parse a JSON-with-comments document
  pub fn parse(source: &[u8]) -> CiResult<Self> {
    let mut stripped = String::new();
    json_comments::StripComments::new(source)
      .read_to_string(&mut stripped)
      .context("Failed to strip comments")?;
    let file: ConfigFile = serde_json::from_str(&stripped)?;
    Self::from_file(file)
  }

  /// Save the config as pretty-printed JSON
  pub fn save(&self, path: &Path) -> CiResult<()> {
    let mut json = serde_json::to_string_pretty(&self.to_file())?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
  }

  /// Convert back into the on-disk shape
  pub fn to_file(&self) -> ConfigFile {
    let ignore = self.ignore.to_strings();
    ConfigFile {
      package_file: Some(self.package_file.clone()),
      matches: Some(self.matches.to_strings()),
      ignore: (!ignore.is_empty()).then_some(ignore),
      exclude_packages: (!self.exclude_packages.is_empty()).then(|| self.exclude_packages.clone()),
    }
  }

  /// Marker filenames, checked in order
  pub fn package_files(&self) -> &[String] {
    &self.package_file
  }

  /// True iff the path matches an include pattern and no ignore pattern
  pub fn matches(&self, path: &str) -> bool {
    self.matches.matches(path) && !self.ignore.matches(path)
  }

  pub fn is_excluded(&self, package: &str) -> bool {
    self.exclude_packages.iter().any(|p| p == package)
  }
}

/// Resolve the config path against the project root
pub fn resolve_config_path(root: &Path, config: Option<&Path>) -> PathBuf {
  match config {
    Some(path) if path.is_absolute() => path.to_path_buf(),
    Some(path) => root.join(path),
    None => root.join(DEFAULT_CONFIG_FILE),
  }
}
