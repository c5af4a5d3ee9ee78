//! `stayframe`: cohort-windowed extraction and progressive merge.
//!
//! ```sh
//! stayframe --config stayframe.toml check
//! stayframe --config stayframe.toml run
//! stayframe --config stayframe.toml extract --source lab
//! ```

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stayframe_core::{StayframeError, StayframeErrorCode};

#[derive(Parser, Debug)]
#[command(name = "stayframe", version)]
#[command(about = "Extract cohort-windowed clinical variables and merge them into one wide table")]
struct Cli {
    /// TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override `paths.base_dir`.
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug").
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the config and report missing input files
    Check,

    /// Write one VariableTable per configured variable
    Extract {
        /// Only extract this source (repeatable)
        #[arg(long = "source", value_name = "NAME")]
        sources: Vec<String>,
    },

    /// Build the WideTable from existing VariableTables
    Merge,

    /// Extract every source, then merge
    Run,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    stayframe_core::logging::init_tracing(cli.log.as_deref());

    let result = commands::load_config(cli.config.as_deref(), cli.base_dir).and_then(|config| {
        match cli.command {
            Command::Check => commands::check(&config),
            Command::Extract { sources } => commands::extract(&config, &sources).map(|_| ()),
            Command::Merge => commands::merge(&config).map(|_| ()),
            Command::Run => commands::run(&config),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<StayframeError>()
                .map_or("UNKNOWN", |e| e.error_code());
            tracing::error!(code, "{e:#}");
            eprintln!("error [{code}]: {e:#}");
            ExitCode::FAILURE
        }
    }
}
