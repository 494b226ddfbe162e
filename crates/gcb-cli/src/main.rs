// crates/gcb-cli/src/main.rs

use clap::{Parser, Subcommand};

mod cmd;
mod io;
mod logging;

#[derive(Parser)]
#[command(name = "gcb-cli")]
#[command(about = "Gray-Code Beacon parser CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a recognizer analyzer-result JSON into per-frame beacon timing
    Parse(cmd::parse::ParseArgs),

    /// Inspect a CL/CM dictionary pair (duration buckets, offset counts)
    DictInfo(cmd::dict_info::DictInfoArgs),
}

fn main() -> anyhow::Result<()> {
    let _guard = logging::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Parse(args) => cmd::parse::run(args),
        Commands::DictInfo(args) => cmd::dict_info::run(args),
    }
}
