//! droidconf - Android build-configuration resolver
//!
//! Entry point: parses arguments, loads settings, installs logging, and
//! dispatches to the command layer.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use droidconf::commands::{AbisCommand, CheckCommand, OutputFormat, ProfilesCommand, ResolveCommand};
use droidconf::core::{APP_NAME, VERSION};
use droidconf::logging;

/// Validate and normalize Android build declarations.
#[derive(Parser, Debug)]
#[command(name = "droidconf", version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,

    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a declaration and print the normalized configuration.
    Resolve {
        /// Declaration file (.toml, .json, .yaml).
        file: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Validate a declaration without printing it.
    Check {
        /// Declaration file (.toml, .json, .yaml).
        file: PathBuf,
    },
    /// List supported ABIs.
    Abis,
    /// List known signing profiles.
    Profiles,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let bootstrap = logging::subscriber(
        logging::env_filter(logging::flag_level(cli.verbose, cli.quiet).unwrap_or("info")),
        std::io::stderr,
    );
    let settings = logging::load_settings(cli.settings.as_deref(), bootstrap).await?;

    logging::init(cli.verbose, cli.quiet, &settings)?;
    debug!("{} v{} starting", APP_NAME, VERSION);

    let output = match cli.command {
        Command::Resolve { file, format } => {
            ResolveCommand {
                declaration: file,
                format,
            }
            .execute(&settings)
            .await?
        }
        Command::Check { file } => CheckCommand { declaration: file }.execute(&settings).await?,
        Command::Abis => AbisCommand.execute(),
        Command::Profiles => ProfilesCommand.execute(&settings),
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
