mod cli;
mod completion;
mod dispatch;
mod prompt;
mod render;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    dispatch::run_cli(cli)
}
