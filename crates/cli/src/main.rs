use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use cmd::{BuildArgs, cmd_build, cmd_inspect};
use output::{OutputFormat, Status, print_status};

/// eggpack - Package a Scrapy project into a deployable egg
#[derive(Parser)]
#[command(name = "eggpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging on stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the project's egg and write it to stdout
  Build(BuildArgs),

  /// Show the descriptor sections and settings module a build would use
  Inspect {
    /// Path to the project's scrapy.cfg
    config: PathBuf,

    /// Project key looked up in the [settings] section before `default`
    #[arg(long, env = "SCRAPY_PROJECT")]
    project: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match &cli.command {
    Commands::Build(args) => cmd_build(args),
    Commands::Inspect {
      config,
      project,
      format,
    } => cmd_inspect(config, project.as_deref(), *format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_status(Status::Error, &format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

/// Logs go to stderr; stdout is reserved for the archive.
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
