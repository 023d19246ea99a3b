use crate::formatting::ColorMode;
use crate::io::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "decouple")]
#[command(
    about = "Find function parameters whose concrete types could be narrower interfaces",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a corpus for parameters that could take an interface
    Check {
        /// Corpus JSON written by a front end
        corpus: PathBuf,

        /// Output format [default: plain, or the config file's]
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file to use instead of searching for .decouple.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also list functions with no eligible parameters
        #[arg(long)]
        include_empty: bool,

        /// Omit parameters that need no methods at all
        #[arg(long)]
        exclude_unused: bool,

        /// Do not suggest declared interface names
        #[arg(long)]
        no_names: bool,

        /// Analyze functions sequentially
        #[arg(long)]
        no_parallel: bool,

        /// Worker threads (0 = one per core)
        #[arg(short = 'j', long, env = "DECOUPLE_JOBS")]
        jobs: Option<usize>,

        /// Stop at the first parameter that cannot be analyzed
        #[arg(long)]
        fail_fast: bool,

        /// When to color plain output
        #[arg(long, value_enum)]
        color: Option<ColorMode>,

        /// Plain ASCII output without colors
        #[arg(long)]
        plain: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .decouple.toml in the current directory
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Check { verbosity, .. } => *verbosity,
            Commands::Init { .. } => 0,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
