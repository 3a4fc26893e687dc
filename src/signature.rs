//! Canonical parameter-signature formatting.

use crate::discovery::{Parameter, UNASSIGNED};

/// Well-known type whose presence in a parameter list keeps the rule
/// chain running instead of terminating it.
pub const FILTER_CHAIN_TYPE: &str = "FilterChain";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedParams {
    /// Parenthesized list, e.g. `(Request, String id)`.
    pub text: String,
    /// Some parameter's declared type is the filter-chain type.
    pub chain_used: bool,
}

/// Render a formal parameter list in declaration order.
///
/// A name suffix is appended only for parameters carrying a named-binding
/// hint; the sentinel hint resolves to the parameter's own declared name.
pub fn format_parameters(parameters: &[Parameter]) -> FormattedParams {
    let mut text = String::from("(");
    let mut chain_used = false;
    for (i, parameter) in parameters.iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        text.push_str(&parameter.type_name);
        if is_chain_type(&parameter.type_name) {
            chain_used = true;
        }
        if let Some(binding) = &parameter.named_binding {
            text.push(' ');
            if binding == UNASSIGNED {
                text.push_str(&parameter.name);
            } else {
                text.push_str(binding);
            }
        }
    }
    text.push(')');
    FormattedParams { text, chain_used }
}

/// The bare chain type, or any path spelling of it.
pub fn is_chain_type(type_name: &str) -> bool {
    type_name == FILTER_CHAIN_TYPE
        || type_name
            .strip_suffix(FILTER_CHAIN_TYPE)
            .is_some_and(|prefix| prefix.ends_with("::"))
}
