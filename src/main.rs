//! CLI entry point for the chunk layout generator

use chunkwalk::io::cli::{Cli, RunProcessor};
use clap::Parser;

fn main() -> chunkwalk::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut processor = RunProcessor::new(cli);
    processor.process()
}
