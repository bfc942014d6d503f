//! Error types for affected-ci with contextual messages and exit codes
//!
//! Every failure is categorised so `main` can pick an exit code, and most
//! categories carry a help message that points the user at the fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for affected-ci
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// At least one package run failed
  Failed = 1,
  /// User error (config, invalid args, missing files)
  User = 2,
  /// System error (git, I/O)
  System = 3,
  /// Policy violation (too many affected packages)
  Policy = 4,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for affected-ci
#[derive(Debug)]
pub enum CiError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Platform constraints violated by the result
  Policy(PolicyError),

  /// One or more package runs failed
  Run { failed: usize, total: usize },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl CiError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    CiError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    CiError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      CiError::Message { message, context, help } => CiError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      CiError::Io(err) => CiError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      CiError::Config(_) => ExitCode::User,
      CiError::Git(_) => ExitCode::System,
      CiError::Policy(_) => ExitCode::Policy,
      CiError::Run { .. } => ExitCode::Failed,
      CiError::Io(_) => ExitCode::System,
      CiError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      CiError::Config(e) => e.help_message(),
      CiError::Git(e) => e.help_message(),
      CiError::Policy(e) => e.help_message(),
      CiError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for CiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CiError::Config(e) => write!(f, "{}", e),
      CiError::Git(e) => write!(f, "{}", e),
      CiError::Policy(e) => write!(f, "{}", e),
      CiError::Run { failed, total } => write!(f, "{} of {} package(s) failed", failed, total),
      CiError::Io(e) => write!(f, "I/O error: {}", e),
      CiError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for CiError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CiError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for CiError {
  fn from(err: io::Error) -> Self {
    CiError::Io(err)
  }
}

impl From<ConfigError> for CiError {
  fn from(err: ConfigError) -> Self {
    CiError::Config(err)
  }
}

impl From<GitError> for CiError {
  fn from(err: GitError) -> Self {
    CiError::Git(err)
  }
}

impl From<PolicyError> for CiError {
  fn from(err: PolicyError) -> Self {
    CiError::Policy(err)
  }
}

impl From<serde_json::Error> for CiError {
  fn from(err: serde_json::Error) -> Self {
    CiError::message(format!("JSON error: {}", err))
  }
}

impl From<walkdir::Error> for CiError {
  fn from(err: walkdir::Error) -> Self {
    let path = err.path().map(|p| p.display().to_string());
    match err.into_io_error() {
      Some(io_err) => match path {
        Some(path) => CiError::message(format!("Failed to walk {}: {}", path, io_err)),
        None => CiError::Io(io_err),
      },
      None => CiError::message("Filesystem loop detected while walking the project"),
    }
  }
}

impl From<rayon::ThreadPoolBuildError> for CiError {
  fn from(err: rayon::ThreadPoolBuildError) -> Self {
    CiError::message(format!("Failed to start worker pool: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file not found
  NotFound { path: PathBuf },

  /// Missing or empty required field
  MissingField { field: String },

  /// Config document could not be parsed
  Parse { path: PathBuf, message: String },

  /// Refusing to overwrite an existing file
  AlreadyExists { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `affected-ci init` to create a configuration file.".to_string()),
      ConfigError::MissingField { field } if field == "package-file" => Some(
        "List the marker files that identify a package root, e.g. \"package-file\": [\"package.json\"]".to_string(),
      ),
      ConfigError::AlreadyExists { .. } => Some("Pass --force to overwrite it.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "No affected-ci configuration found.\nExpected file: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "{} is required", field)
      }
      ConfigError::Parse { path, message } => {
        write!(f, "Failed to parse config {}: {}", path.display(), message)
      }
      ConfigError::AlreadyExists { path } => {
        write!(f, "Config file already exists: {}", path.display())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } if stderr.contains("unknown revision") => Some(
        "Make sure both revisions were fetched. Shallow CI checkouts usually need `fetch-depth: 0`.".to_string(),
      ),
      GitError::RepoNotFound { path } => Some(format!(
        "Run inside a git checkout or pass --diffs-file instead of --from/--to: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Constraints imposed by the consuming CI platform
#[derive(Debug)]
pub enum PolicyError {
  /// More affected packages than a job matrix can hold
  TooManyPackages { count: usize, limit: usize },
}

impl PolicyError {
  fn help_message(&self) -> Option<String> {
    match self {
      PolicyError::TooManyPackages { .. } => Some(
        "Split the change into smaller pull requests, or add large subtrees to \"exclude-packages\".".to_string(),
      ),
    }
  }
}

impl fmt::Display for PolicyError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PolicyError::TooManyPackages { count, limit } => {
        write!(f, "{} packages affected, but at most {} can be tested in one run", count, limit)
      }
    }
  }
}

/// Result type alias for affected-ci
pub type CiResult<T> = Result<T, CiError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> CiResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> CiResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<CiError>,
{
  fn context(self, ctx: impl Into<String>) -> CiResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> CiResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &CiError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
