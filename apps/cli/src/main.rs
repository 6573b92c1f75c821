//! qaextract CLI: Q&A notes to fine-tuning JSONL.
//!
//! Reads loosely formatted question/answer text files and writes one chat
//! record per pair to a JSONL dataset next to the input.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
