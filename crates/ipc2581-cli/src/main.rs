use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use ipc2581_export::Units;
use ipc2581_export::types::Mode;

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "ipc2581-export")]
#[command(about = "Export board layouts to IPC-2581 XML", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a layout description to an IPC-2581 document
    Export {
        /// Layout JSON file (optionally .zst compressed)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,

        /// Output XML path, defaults to the input name with an .xml extension
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// TOML file with export options
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        config: Option<PathBuf>,

        /// Output units (mm, um, mil, inch, cm)
        #[arg(short, long)]
        units: Option<Units>,

        /// Function mode written to the Content section
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Function mode level
        #[arg(long)]
        level: Option<u8>,

        /// Step name, defaults to the design name
        #[arg(long)]
        step: Option<String>,

        /// Fixed timestamp for the history record
        #[arg(long)]
        timestamp: Option<String>,

        /// Append the MD5 checksum trailer
        #[arg(long)]
        checksum: bool,

        /// Summary format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize color handling (respects NO_COLOR)
    utils::color::init_color();

    // Initialize logger with default level (overridden by RUST_LOG)
    let env = Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            units,
            mode,
            level,
            step,
            timestamp,
            checksum,
            format,
        } => commands::export::execute(
            &input,
            output,
            commands::export::Overrides {
                config,
                units,
                mode,
                level,
                step,
                timestamp,
                checksum,
            },
            format,
        ),
    }
}
