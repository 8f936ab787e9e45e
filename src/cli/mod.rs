use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use mspconvert::aggregate::GroupingMode;
use std::path::PathBuf;

mod config;
mod convert;

/// assay2msp - Assay library to MSP spectral library converter
#[derive(Parser)]
#[command(name = "assay2msp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Group boundary handling.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GroupingArg {
    /// Adjacency rules of the established converters (the last row joins the
    /// entry in progress)
    Adjacent,
    /// One entry per contiguous transition group
    Strict,
}

impl From<GroupingArg> for GroupingMode {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::Adjacent => GroupingMode::Adjacent,
            GroupingArg::Strict => GroupingMode::Strict,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a transition table (TSV/CSV) to an MSP spectral library
    Convert {
        /// Input assay library (.tsv or .csv)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output spectral library (.msp); appended to if it exists
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Keep decoy transitions instead of removing them
        #[arg(long)]
        keep_decoys: bool,

        /// Group boundary handling (default: adjacent)
        #[arg(short = 'g', long, value_enum)]
        grouping: Option<GroupingArg>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write conversion statistics as JSON
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            keep_decoys,
            grouping,
            config,
            report,
        } => convert::run(
            input,
            output,
            keep_decoys,
            grouping.map(GroupingMode::from),
            config,
            report,
        ),
    }
}
