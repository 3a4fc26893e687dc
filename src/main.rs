use anyhow::Result;
use clap::Parser;
use rulemap::cli::{Cli, Commands};
use rulemap::commands::generate::{self, GenerateConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { path, options } => generate::generate(GenerateConfig { path, options }),
    }
}
