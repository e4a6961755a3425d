mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use solgen_lib::consts::DEFAULT_CONFIG_FILE;

use crate::output::{OutputFormat, print_error};

/// solgen - compose project and solution descriptions over a build matrix
#[derive(Parser)]
#[command(name = "solgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Evaluate a declaration file and write project and solution descriptions
  Generate {
    /// Path to the declaration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    file: PathBuf,

    /// Value of [root] (default: SOLGEN_ROOT, then the file's directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Write every file flat into this directory instead of next to the resolved paths
    #[arg(long)]
    out: Option<PathBuf>,

    /// Only generate the named solution (repeatable)
    #[arg(long = "solution", value_name = "NAME")]
    solutions: Vec<String>,

    /// Compose and render, but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Compose a declaration file and print a summary without writing
  Plan {
    /// Path to the declaration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    file: PathBuf,

    /// Value of [root] (default: SOLGEN_ROOT, then the file's directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Only plan the named solution (repeatable)
    #[arg(long = "solution", value_name = "NAME")]
    solutions: Vec<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show version, host platform and template variables
  Info {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Generate {
      file,
      root,
      out,
      solutions,
      dry_run,
      output,
    } => cmd::cmd_generate(&file, root, out, solutions, dry_run, output),
    Commands::Plan {
      file,
      root,
      solutions,
      output,
    } => cmd::cmd_plan(&file, root, solutions, output),
    Commands::Info { output } => cmd::cmd_info(output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}
