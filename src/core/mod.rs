pub mod errors;
pub mod records;

pub use errors::Error;
pub use records::{CatchRecord, RuleRecord};
