mod commands;
mod core;
mod packages;
mod runner;
mod telemetry;
mod ui;
mod utils;

use clap::{Args, Parser, Subcommand};
use crate::core::context::ProjectContext;
use crate::core::diff::DiffSource;
use crate::core::error::{CiError, CiResult, print_error};
use std::path::{Path, PathBuf};

/// Find the monorepo packages touched by a diff and test them in parallel
#[derive(Parser)]
#[command(name = "affected-ci")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Config file (default: ci-config.jsonc in the project root)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Project root; changed paths and package ids are relative to it
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Log debug diagnostics to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Where to read changed files from
#[derive(Args, Debug, Default)]
struct DiffArgs {
  /// File with one changed path per line (`-` for stdin)
  #[arg(long, conflicts_with = "from")]
  diffs_file: Option<PathBuf>,
  /// Base revision for `git diff`
  #[arg(long)]
  from: Option<String>,
  /// Head revision for `git diff` (default: HEAD)
  #[arg(long, requires = "from")]
  to: Option<String>,
}

impl DiffArgs {
  fn into_source(self) -> Option<DiffSource> {
    DiffSource::from_args(self.diffs_file, self.from, self.to)
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Print the packages affected by a diff
  Affected {
    #[command(flatten)]
    diff: DiffArgs,
    /// Output format: json (default), text, names-only
    #[arg(long, default_value = "json")]
    format: String,
  },

  /// Print every package in the project
  Packages {
    /// Output format: json (default), text, names-only
    #[arg(long, default_value = "json")]
    format: String,
  },

  /// Run a command once per package, in parallel
  Run {
    /// Run for every package
    #[arg(long, conflicts_with_all = ["package", "diffs_file", "from"])]
    all: bool,
    /// Run for this package (repeatable)
    #[arg(short, long, conflicts_with_all = ["diffs_file", "from"])]
    package: Vec<String>,
    #[command(flatten)]
    diff: DiffArgs,
    /// Maximum number of packages running at once
    #[arg(short = 'j', long, default_value_t = runner::DEFAULT_CONCURRENCY)]
    concurrency: usize,
    /// Show the commands without executing them
    #[arg(long)]
    dry_run: bool,
    /// Command to run; `{package}` is replaced by the package, otherwise it is appended
    #[arg(last = true, required = true, value_name = "COMMAND")]
    command: Vec<String>,
  },

  /// Write a starter configuration file
  Init {
    /// Marker file identifying a package root (repeatable)
    #[arg(long = "package-file", required = true)]
    package_files: Vec<String>,
    /// Pattern of files that never trigger tests (repeatable)
    #[arg(long)]
    ignore: Vec<String>,
    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  telemetry::init_tracing(if cli.verbose {
    tracing::Level::DEBUG
  } else {
    tracing::Level::INFO
  });

  let root = match cli.root {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => {
        eprintln!("Error: Failed to get current directory: {}", e);
        std::process::exit(crate::core::error::ExitCode::System.as_i32());
      }
    },
  };

  if let Err(err) = dispatch(&root, cli.config.as_deref(), cli.command) {
    handle_error(err);
  }
}

fn dispatch(root: &Path, config: Option<&Path>, command: Commands) -> CiResult<()> {
  // init runs before a config exists, so the context is built per command
  let ctx = || -> CiResult<ProjectContext> {
    let ctx = ProjectContext::build(root, config)?;
    tracing::debug!(config = %ctx.config_path.display(), "loaded config");
    Ok(ctx)
  };

  match command {
    Commands::Affected { diff, format } => commands::run_affected(&ctx()?, diff.into_source(), format),
    Commands::Packages { format } => commands::run_packages(&ctx()?, format),
    Commands::Run {
      all,
      package,
      diff,
      concurrency,
      dry_run,
      command,
    } => {
      let selection = if all {
        Some(commands::Selection::All)
      } else if !package.is_empty() {
        Some(commands::Selection::Packages(package))
      } else {
        diff.into_source().map(commands::Selection::Affected)
      };
      commands::run_run(&ctx()?, selection, concurrency, dry_run, command)
    }
    Commands::Init {
      package_files,
      ignore,
      force,
    } => commands::run_init(root, config, package_files, ignore, force),
  }
}

fn handle_error(err: CiError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
