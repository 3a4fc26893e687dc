//! Normalized records for discovered handler annotations.
//!
//! One `RuleRecord` per `#[http_url]` occurrence, one `CatchRecord` per
//! `#[http_exception_handler]` occurrence. Records are flat and immutable
//! once built; only their serialized XML projection ever leaves the
//! process. Both derive `Serialize` for structured debug logging, which
//! has no effect on the emitted rule file.

use serde::Serialize;
use std::cmp::Ordering;

/// One URL-mapping rule, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRecord {
    /// Higher weights are written first.
    pub weight: i32,
    /// The URL-matching pattern from the annotation's value.
    pub pattern: String,
    /// A parameter of the filter-chain type was declared, so the rule must
    /// not terminate the chain.
    pub chain_used: bool,
    /// Parenthesized parameter list, e.g. `(Request, String id)`.
    pub params_formatted: String,
    pub method_name: String,
    pub class_name: String,
    pub doc_comment: Option<String>,
    /// Optional auxiliary handler reference on the run element.
    pub handler: Option<String>,
    /// `<file>:<line>` provenance, used as the rule name.
    pub source_ref: String,
}

impl RuleRecord {
    /// Output order: descending weight, then class name, then method name.
    /// Residual ties are left to the (stable) sort.
    pub fn output_order(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.class_name.cmp(&other.class_name))
            .then_with(|| self.method_name.cmp(&other.method_name))
    }
}

/// One exception-handler binding, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatchRecord {
    /// Exception type this handler covers. Falls back to the first
    /// parameter's declared type when the annotation leaves it unset.
    pub exception_name: String,
    /// Carried for ordering parity with rules; the handler annotation has
    /// no weight attribute, so this is always 0 today.
    pub weight: i32,
    pub chain_used: bool,
    pub params_formatted: String,
    pub method_name: String,
    pub class_name: String,
    pub doc_comment: Option<String>,
    pub source_ref: String,
}

impl CatchRecord {
    /// The rule order, further disambiguated by exception type name.
    pub fn output_order(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.class_name.cmp(&other.class_name))
            .then_with(|| self.method_name.cmp(&other.method_name))
            .then_with(|| self.exception_name.cmp(&other.exception_name))
    }
}
