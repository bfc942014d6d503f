//! Command templates instantiated once per package

use crate::core::error::{CiError, CiResult};
use std::fmt;

/// Placeholder replaced by the package identifier
pub const PLACEHOLDER: &str = "{package}";

/// A program plus argument template.
///
/// Every argument containing `{package}` gets the package identifier
/// substituted in. When no argument mentions the placeholder, the identifier
/// is appended as the last argument instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
  program: String,
  args: Vec<String>,
}

impl CommandTemplate {
  pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
    Self {
      program: program.into(),
      args,
    }
  }

  /// Build from a full argument vector (`argv[0]` is the program)
  pub fn from_argv(argv: &[String]) -> CiResult<Self> {
    match argv.split_first() {
      Some((program, args)) if !program.trim().is_empty() => Ok(Self::new(program.clone(), args.to_vec())),
      _ => Err(CiError::with_help(
        "No command given",
        format!("Pass the command after `--`, e.g. `affected-ci run -- ./test.sh {}`", PLACEHOLDER),
      )),
    }
  }

  fn has_placeholder(&self) -> bool {
    self.args.iter().any(|arg| arg.contains(PLACEHOLDER))
  }

  /// Concrete invocation for one package
  pub fn instantiate(&self, package: &str) -> Invocation {
    let args = if self.has_placeholder() {
      self.args.iter().map(|arg| arg.replace(PLACEHOLDER, package)).collect()
    } else {
      let mut args = self.args.clone();
      args.push(package.to_string());
      args
    };

    Invocation {
      program: self.program.clone(),
      args,
    }
  }
}

impl fmt::Display for CommandTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// A fully substituted command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.is_empty() || arg.contains(char::is_whitespace) {
        write!(f, " {:?}", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}
