pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod discovery;
pub mod extract;
pub mod io;
pub mod output;
pub mod signature;

pub use crate::commands::generate::{run_generation, GenerateConfig};
pub use crate::core::records::{CatchRecord, RuleRecord};
