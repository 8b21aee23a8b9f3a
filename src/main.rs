use anyhow::Result;
use clap::{Parser, Subcommand};

mod config;
mod pipeline;
mod stats;
mod telemetry;
mod tokenizer;

#[derive(Parser)]
#[command(name = "chunker", about = "Token-window chunking pipeline CLI")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Chunk(pipeline::chunk::ChunkCmd),
    Stats(stats::StatsCmd),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and CHUNKER_LOG_FORMAT
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Chunk(args) => pipeline::chunk::run(args)?,
        Commands::Stats(args) => stats::run(args)?,
    }

    Ok(())
}
