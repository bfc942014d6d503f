//! `affected-ci affected` - Show which packages are affected by changes
//!
//! Reads the changed files (from a file, stdin or git) and prints the
//! packages that need retesting. JSON output is meant to feed a CI job
//! matrix, so it is capped at [`MAX_MATRIX_PACKAGES`].

use crate::core::context::ProjectContext;
use crate::core::diff::DiffSource;
use crate::core::error::{CiError, CiResult, PolicyError};
use crate::packages::{AffectedAnalysis, ChangeResolver};

/// Largest job matrix the CI platform accepts
pub const MAX_MATRIX_PACKAGES: usize = 256;

/// Output format for package lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  Text,
  Json,
  NamesOnly,
}

impl OutputFormat {
  pub fn from_str(s: &str) -> CiResult<Self> {
    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names" | "names-only" => Ok(Self::NamesOnly),
      _ => Err(CiError::message(format!(
        "Unknown format '{}'. Valid formats: text, json, names-only",
        s
      ))),
    }
  }
}

/// Run the affected command
pub fn run_affected(ctx: &ProjectContext, source: Option<DiffSource>, format: String) -> CiResult<()> {
  let output_format = OutputFormat::from_str(&format)?;
  let source = source.ok_or_else(|| {
    CiError::with_help(
      "No diff source given",
      "Pass --diffs-file <path> (or - for stdin), or --from <rev> [--to <rev>]",
    )
  })?;

  let diffs = source.read(ctx.project_root())?;
  tracing::debug!(source = %source.describe(), files = diffs.len(), "read changed files");

  let analysis = ChangeResolver::new(ctx.classifier()).affected(&diffs)?;
  tracing::debug!(
    global = analysis.is_global(),
    packages = analysis.packages.len(),
    "resolved affected packages"
  );
  check_matrix_limit(&analysis.packages)?;

  print!("{}", render(&analysis, output_format)?);
  Ok(())
}

/// Fail when there are more packages than one CI matrix can hold
pub fn check_matrix_limit(packages: &[String]) -> CiResult<()> {
  if packages.len() > MAX_MATRIX_PACKAGES {
    return Err(CiError::Policy(PolicyError::TooManyPackages {
      count: packages.len(),
      limit: MAX_MATRIX_PACKAGES,
    }));
  }
  Ok(())
}

/// Render an analysis in the requested format
pub fn render(analysis: &AffectedAnalysis, format: OutputFormat) -> CiResult<String> {
  match format {
    OutputFormat::Json => render_packages(&analysis.packages, format),
    OutputFormat::NamesOnly => render_packages(&analysis.packages, format),
    OutputFormat::Text => Ok(render_text(analysis)),
  }
}

/// Render a plain package list (JSON array or one name per line)
pub fn render_packages(packages: &[String], format: OutputFormat) -> CiResult<String> {
  match format {
    OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(packages)?)),
    _ => Ok(packages.iter().map(|p| format!("{}\n", p)).collect()),
  }
}

fn render_text(analysis: &AffectedAnalysis) -> String {
  let mut out = String::new();
  out.push_str("Affected Analysis\n");
  out.push_str("=================\n\n");

  out.push_str(&format!("Changed files: {}\n", analysis.changed_files.len()));
  if !analysis.changed_files.is_empty() && analysis.changed_files.len() <= 20 {
    for file in &analysis.changed_files {
      out.push_str(&format!("  {}\n", file));
    }
  }
  out.push('\n');

  if let Some(file) = &analysis.global_change {
    out.push_str(&format!("🌐 Global change: {}\n\n", file));
  }

  if !analysis.excluded.is_empty() {
    out.push_str(&format!("Excluded: {} packages\n", analysis.excluded.len()));
    for pkg in &analysis.excluded {
      out.push_str(&format!("  ⏭  {}\n", pkg));
    }
    out.push('\n');
  }

  if analysis.is_empty() {
    out.push_str("✅ No packages affected\n");
    return out;
  }

  out.push_str(&format!("Affected packages: {}\n", analysis.packages.len()));
  for pkg in &analysis.packages {
    out.push_str(&format!("  📦 {}\n", pkg));
  }
  out
}
