use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rulemap")]
#[command(about = "Generate URL rewrite rules from annotated handler functions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan sources and write the rewrite rule file
    Generate {
        /// Source path to scan
        path: PathBuf,

        /// Processor options as key=value pairs
        /// (saveRulesTo=<path>, showPositions=<true|false>)
        #[arg(short = 'A', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },
}
