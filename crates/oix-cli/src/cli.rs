use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "oix",
    about = "OIX: in-memory object index driver",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log table growth and placeholder creation
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured probe count
    #[arg(long, global = true)]
    pub probes: Option<usize>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register random hashes and verify every lookup
    Stress(StressArgs),
    /// Register hashes that share every probe slot
    Collide(CollideArgs),
    /// Resolve a synthetic commit history and walk it
    Walk(WalkArgs),
}

#[derive(Args)]
pub struct StressArgs {
    #[arg(short = 'n', long, default_value = "100000")]
    pub count: usize,
    /// Seed for the hash generator; random if omitted
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct CollideArgs {
    #[arg(short = 'n', long, default_value = "64")]
    pub count: usize,
}

#[derive(Args)]
pub struct WalkArgs {
    /// Number of commits in the history
    #[arg(short, long, default_value = "8")]
    pub depth: usize,
}
