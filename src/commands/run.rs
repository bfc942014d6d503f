//! `affected-ci run` - Run a command for each affected package
//!
//! Picks the packages (explicit list, every package, or the ones affected by
//! a diff) and runs the command once per package with bounded concurrency.
//!
//! Supports:
//! - `--all` to run for every package
//! - `--package <id>` (repeatable) to name packages directly
//! - `--diffs-file` / `--from` / `--to` to resolve affected packages
//! - `--dry-run` to show the plan without executing

use crate::core::context::ProjectContext;
use crate::core::diff::DiffSource;
use crate::core::error::{CiError, CiResult};
use crate::packages::ChangeResolver;
use crate::runner::{CommandTemplate, ParallelRunner, RunSummary};
use std::io::IsTerminal;

/// Which packages to run for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  All,
  Packages(Vec<String>),
  Affected(DiffSource),
}

/// Run the run command
pub fn run_run(
  ctx: &ProjectContext,
  selection: Option<Selection>,
  concurrency: usize,
  dry_run: bool,
  command: Vec<String>,
) -> CiResult<()> {
  let template = CommandTemplate::from_argv(&command)?;
  let selection = selection.ok_or_else(|| {
    CiError::with_help(
      "No packages selected",
      "Pass --all, --package <id>, --diffs-file <path>, or --from <rev>",
    )
  })?;

  let packages = select_packages(ctx, &selection)?;
  if packages.is_empty() {
    println!("✅ No packages affected");
    println!("   Nothing to run");
    return Ok(());
  }

  if dry_run {
    println!("DRY RUN: Would execute:");
    for pkg in &packages {
      println!("  {}", template.instantiate(pkg));
    }
    return Ok(());
  }

  let runner = ParallelRunner::new(ctx.project_root(), concurrency)?.with_progress(std::io::stderr().is_terminal());

  println!(
    "🚀 Running `{}` for {} package(s), {} at a time\n",
    template,
    packages.len(),
    runner.limit()
  );
  let summary = runner.run(&packages, &template)?;

  print_summary(&summary);
  summary.into_result().map(|_| ())
}

fn select_packages(ctx: &ProjectContext, selection: &Selection) -> CiResult<Vec<String>> {
  let resolver = ChangeResolver::new(ctx.classifier());
  match selection {
    Selection::All => resolver.all(),
    Selection::Packages(packages) => Ok(dedup_sorted(packages)),
    Selection::Affected(source) => {
      let diffs = source.read(ctx.project_root())?;
      Ok(resolver.affected(&diffs)?.packages)
    }
  }
}

fn dedup_sorted(packages: &[String]) -> Vec<String> {
  let mut packages = packages.to_vec();
  packages.sort();
  packages.dedup();
  packages
}

fn print_summary(summary: &RunSummary) {
  println!();
  println!("════════════════════════════════════════");
  println!("📊 {} passed, {} failed, {} total", summary.passed(), summary.failed(), summary.total());

  if summary.failed() > 0 {
    println!("\nFailed packages:");
    for result in summary.failures() {
      println!("  ❌ {}", result.package);
    }
  } else {
    println!("\n✅ All packages passed");
  }
}
