//! datapeek: inspect a serialized dataset blob and extract selected fields
//!
//! Usage:
//!   # Report the dataset structure to stdout
//!   datapeek dataset.json
//!
//!   # Also write the extracted subset as indented JSON
//!   datapeek dataset.json --write
//!
//!   # Write mode with a custom output path
//!   datapeek dataset.json --write -o subset.json

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use datapeek::{run, RunConfig, DEFAULT_OUTPUT_PATH};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "datapeek")]
#[command(about = "Inspect a serialized dataset and extract selected fields", long_about = None)]
struct Args {
    /// Path to the serialized dataset blob
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Normalize the extracted subset and write it as indented JSON
    #[arg(long)]
    write: bool,

    /// Output path for --write mode
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = RunConfig {
        input: args.input,
        write_output: args.write,
        output_path: args.output,
    };

    let stdout = std::io::stdout();
    let mut report = stdout.lock();
    run(&config, &mut report)?;
    report.flush()?;

    Ok(())
}
