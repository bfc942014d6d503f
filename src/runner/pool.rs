//! Bounded parallel execution of one command per package
//!
//! A dedicated rayon pool with `limit` threads runs the packages. Each worker
//! blocks on a single child process, so at most `limit` children are alive at
//! any time, and `collect` keeps every outcome in its package's slot no matter
//! which one finishes first.

use super::template::{CommandTemplate, Invocation};
use crate::core::error::{CiError, CiResult};
use crate::ui::progress::RunProgress;
use rayon::prelude::*;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// Concurrency used when the caller doesn't pick one
pub const DEFAULT_CONCURRENCY: usize = 4;

/// How a single package run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Success,
  Failure,
}

/// Result of running the command for one package
#[derive(Debug, Clone)]
pub struct RunResult {
  pub package: String,
  pub outcome: Outcome,
  /// Command line that was executed
  pub command: String,
  /// Captured stdout and stderr, interleaved as written
  pub output: String,
  /// Why the run failed (exit status or spawn error)
  pub error: Option<String>,
  pub duration: Duration,
}

impl RunResult {
  pub fn is_success(&self) -> bool {
    self.outcome == Outcome::Success
  }
}

/// All package results, in input order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
  pub results: Vec<RunResult>,
}

impl RunSummary {
  pub fn total(&self) -> usize {
    self.results.len()
  }

  pub fn failed(&self) -> usize {
    self.results.iter().filter(|r| !r.is_success()).count()
  }

  pub fn passed(&self) -> usize {
    self.total() - self.failed()
  }

  pub fn failures(&self) -> impl Iterator<Item = &RunResult> {
    self.results.iter().filter(|r| !r.is_success())
  }

  /// `Ok` when every package passed
  pub fn into_result(self) -> CiResult<Self> {
    let failed = self.failed();
    if failed > 0 {
      return Err(CiError::Run {
        failed,
        total: self.total(),
      });
    }
    Ok(self)
  }
}

/// Runs a command template for many packages with bounded concurrency
pub struct ParallelRunner {
  root: PathBuf,
  limit: usize,
  progress: bool,
}

impl ParallelRunner {
  /// Runner executing commands from `root` with at most `limit` in flight
  pub fn new(root: &Path, limit: usize) -> CiResult<Self> {
    if limit == 0 {
      return Err(CiError::with_help(
        "Concurrency limit must be at least 1",
        format!("Omit --concurrency to use the default of {}", DEFAULT_CONCURRENCY),
      ));
    }
    Ok(Self {
      root: root.to_path_buf(),
      limit,
      progress: false,
    })
  }

  /// Draw a progress bar on stderr while running
  pub fn with_progress(mut self, enabled: bool) -> Self {
    self.progress = enabled;
    self
  }

  pub fn limit(&self) -> usize {
    self.limit
  }

  /// Run the template once per package
  pub fn run(&self, packages: &[String], template: &CommandTemplate) -> CiResult<RunSummary> {
    let progress = self.progress.then(|| RunProgress::new(packages.len(), "Running packages"));

    self.run_with(packages, |package| {
      let result = execute(&self.root, package, template);
      report(&result);
      if let Some(progress) = &progress {
        progress.inc();
      }
      result
    })
  }

  /// Apply `job` to every package on a pool of `limit` threads
  pub fn run_with<F>(&self, packages: &[String], job: F) -> CiResult<RunSummary>
  where
    F: Fn(&str) -> RunResult + Sync,
  {
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(self.limit)
      .thread_name(|idx| format!("affected-ci-worker-{}", idx))
      .build()?;

    let results: Vec<RunResult> = pool.install(|| packages.par_iter().map(|package| job(package.as_str())).collect());

    Ok(RunSummary { results })
  }
}

/// Run one invocation to completion, capturing its output
fn execute(root: &Path, package: &str, template: &CommandTemplate) -> RunResult {
  let invocation = template.instantiate(package);
  let command = invocation.to_string();
  tracing::debug!(package, command = %command, "starting");

  let start = Instant::now();
  let captured = capture(root, &invocation);
  let duration = start.elapsed();

  match captured {
    Ok((status, output)) => {
      let success = status.success();
      RunResult {
        package: package.to_string(),
        outcome: if success { Outcome::Success } else { Outcome::Failure },
        command,
        output,
        error: (!success).then(|| describe_status(status)),
        duration,
      }
    }
    Err(err) => RunResult {
      package: package.to_string(),
      outcome: Outcome::Failure,
      command,
      output: String::new(),
      error: Some(format!("failed to start: {}", err)),
      duration,
    },
  }
}

/// Spawn the child with stdout and stderr on one pipe, so the captured
/// output keeps the order in which the child wrote it
fn capture(root: &Path, invocation: &Invocation) -> io::Result<(ExitStatus, String)> {
  let (mut reader, writer) = io::pipe()?;

  let mut cmd = Command::new(&invocation.program);
  cmd
    .args(&invocation.args)
    .current_dir(root)
    .stdin(Stdio::null())
    .stdout(writer.try_clone()?)
    .stderr(writer);
  let mut child = cmd.spawn()?;
  // The parent's write ends must be closed before reading to EOF
  drop(cmd);

  let mut output = Vec::new();
  let read = reader.read_to_end(&mut output);
  let status = child.wait()?;
  read?;

  Ok((status, String::from_utf8_lossy(&output).into_owned()))
}

fn describe_status(status: ExitStatus) -> String {
  match status.code() {
    Some(code) => format!("exit status {}", code),
    None => "terminated by signal".to_string(),
  }
}

/// Completion notice for the pipeline log
fn report(result: &RunResult) {
  if result.is_success() {
    println!("✅ {} ({:.1}s)", result.package, result.duration.as_secs_f64());
    return;
  }

  let mut block = format!(
    "❌ {} ({})\n   command: {}\n",
    result.package,
    result.error.as_deref().unwrap_or("failed"),
    result.command
  );
  if !result.output.trim().is_empty() {
    block.push_str("   output:\n");
    for line in result.output.lines() {
      block.push_str("     ");
      block.push_str(line);
      block.push('\n');
    }
  }
  // One write per block keeps concurrent failures from interleaving
  eprint!("{}", block);
}
