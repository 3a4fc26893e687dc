//! Per-declaration normalization into rule and catch records.
//!
//! Extraction never fails the run on its own: a declaration that cannot
//! become a usable record yields [`Extraction::Discard`], which lets the
//! run continue discovering the remaining annotations while poisoning the
//! final commit. One malformed annotation never hides the others, and it
//! never ships a partial rule file either.

use crate::core::records::{CatchRecord, RuleRecord};
use crate::diagnostics::Messager;
use crate::discovery::{AnnotationKind, Declaration, UNASSIGNED};
use crate::signature::format_parameters;
use serde::Serialize;

/// Outcome of extracting one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    /// A usable record.
    Record(T),
    /// No record; the run's final commit must be suppressed.
    Discard,
}

/// Build a rule record from one `#[http_url]` declaration.
pub fn rule(
    declaration: &Declaration,
    messager: &dyn Messager,
    show_positions: bool,
) -> Extraction<RuleRecord> {
    if !declaration.is_method {
        warn_non_method(declaration, AnnotationKind::Url, messager);
        return Extraction::Discard;
    }
    let Some(pattern) = declaration.annotation.value.clone() else {
        messager.warning(
            &declaration.position,
            &format!(
                "@{} on {} is missing its url pattern value",
                AnnotationKind::Url.attribute_name(),
                declaration.simple_name
            ),
        );
        return Extraction::Discard;
    };

    let params = format_parameters(&declaration.parameters);
    if show_positions {
        messager.notice_at(
            &declaration.position,
            &format!(
                "@{} value {} weight {}",
                AnnotationKind::Url.attribute_name(),
                pattern,
                declaration.annotation.weight
            ),
        );
    }

    let record = RuleRecord {
        weight: declaration.annotation.weight,
        pattern,
        chain_used: params.chain_used,
        params_formatted: params.text,
        method_name: declaration.simple_name.clone(),
        class_name: declaration.class_name.clone(),
        doc_comment: declaration.doc_comment.clone(),
        handler: declaration.annotation.handler.clone(),
        source_ref: declaration.position.source_ref(),
    };
    debug_dump("rule", &record);
    Extraction::Record(record)
}

/// Build a catch record from one `#[http_exception_handler]` declaration.
pub fn catch(
    declaration: &Declaration,
    messager: &dyn Messager,
    show_positions: bool,
) -> Extraction<CatchRecord> {
    if !declaration.is_method {
        warn_non_method(declaration, AnnotationKind::ExceptionHandler, messager);
        return Extraction::Discard;
    }

    // exception type might not be set; use the first param's type
    let mut exception_name = declaration
        .annotation
        .value
        .clone()
        .unwrap_or_else(|| UNASSIGNED.to_string());
    if exception_name == UNASSIGNED {
        if let Some(first) = declaration.parameters.first() {
            exception_name = first.type_name.clone();
        }
    }

    let params = format_parameters(&declaration.parameters);
    if show_positions {
        messager.notice_at(
            &declaration.position,
            &format!(
                "@{} type {}",
                AnnotationKind::ExceptionHandler.attribute_name(),
                exception_name
            ),
        );
    }

    let record = CatchRecord {
        exception_name,
        weight: 0,
        chain_used: params.chain_used,
        params_formatted: params.text,
        method_name: declaration.simple_name.clone(),
        class_name: declaration.class_name.clone(),
        doc_comment: declaration.doc_comment.clone(),
        source_ref: declaration.position.source_ref(),
    };
    debug_dump("catch", &record);
    Extraction::Record(record)
}

fn warn_non_method(declaration: &Declaration, kind: AnnotationKind, messager: &dyn Messager) {
    messager.warning(
        &declaration.position,
        &format!(
            "@{} declared on a non-method {}",
            kind.attribute_name(),
            declaration.position
        ),
    );
}

fn debug_dump<T: Serialize>(label: &str, record: &T) {
    if log::log_enabled!(log::Level::Debug) {
        if let Ok(json) = serde_json::to_string(record) {
            log::debug!("extracted {} {}", label, json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemoryMessager, Severity};
    use crate::discovery::{AnnotationValues, Parameter, SourcePosition};
    use std::path::PathBuf;

    fn declaration(is_method: bool) -> Declaration {
        Declaration {
            is_method,
            class_name: "routes::WebApp".to_string(),
            simple_name: "show".to_string(),
            doc_comment: Some("Show one item.".to_string()),
            position: SourcePosition {
                file: PathBuf::from("src/routes.rs"),
                line: 14,
            },
            parameters: vec![Parameter {
                type_name: "Request".to_string(),
                name: "request".to_string(),
                named_binding: None,
            }],
            annotation: AnnotationValues {
                value: Some("/items/show".to_string()),
                weight: 10,
                handler: None,
            },
        }
    }

    #[test]
    fn test_rule_populates_all_fields() {
        let messager = MemoryMessager::new();
        let Extraction::Record(record) = rule(&declaration(true), &messager, false) else {
            panic!("expected a record");
        };
        assert_eq!(record.weight, 10);
        assert_eq!(record.pattern, "/items/show");
        assert_eq!(record.params_formatted, "(Request)");
        assert_eq!(record.class_name, "routes::WebApp");
        assert_eq!(record.method_name, "show");
        assert_eq!(record.source_ref, "routes.rs:14");
        assert!(!record.chain_used);
        assert!(!messager.has_severity(Severity::Warning));
    }

    #[test]
    fn test_rule_on_non_method_is_discarded_with_warning() {
        let messager = MemoryMessager::new();
        let outcome = rule(&declaration(false), &messager, false);
        assert_eq!(outcome, Extraction::Discard);
        let warnings = messager.messages_with_severity(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("non-method"));
        assert_eq!(warnings[0].position.as_deref(), Some("src/routes.rs:14"));
    }

    #[test]
    fn test_rule_without_value_is_discarded() {
        let messager = MemoryMessager::new();
        let mut missing = declaration(true);
        missing.annotation.value = None;
        assert_eq!(rule(&missing, &messager, false), Extraction::Discard);
        assert!(messager.has_severity(Severity::Warning));
    }

    #[test]
    fn test_rule_show_positions_emits_notice() {
        let messager = MemoryMessager::new();
        rule(&declaration(true), &messager, true);
        let notices = messager.messages_with_severity(Severity::Notice);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("value /items/show weight 10"));
    }

    #[test]
    fn test_catch_uses_explicit_exception_type() {
        let messager = MemoryMessager::new();
        let mut explicit = declaration(true);
        explicit.annotation.value = Some("app::NotFound".to_string());
        let Extraction::Record(record) = catch(&explicit, &messager, false) else {
            panic!("expected a record");
        };
        assert_eq!(record.exception_name, "app::NotFound");
    }

    #[test]
    fn test_catch_falls_back_to_first_parameter_type() {
        let messager = MemoryMessager::new();
        let mut fallback = declaration(true);
        fallback.annotation.value = None;
        fallback.parameters[0].type_name = "io::Error".to_string();
        let Extraction::Record(record) = catch(&fallback, &messager, false) else {
            panic!("expected a record");
        };
        assert_eq!(record.exception_name, "io::Error");
    }

    #[test]
    fn test_catch_sentinel_value_also_falls_back() {
        let messager = MemoryMessager::new();
        let mut fallback = declaration(true);
        fallback.annotation.value = Some(UNASSIGNED.to_string());
        fallback.parameters[0].type_name = "io::Error".to_string();
        let Extraction::Record(record) = catch(&fallback, &messager, false) else {
            panic!("expected a record");
        };
        assert_eq!(record.exception_name, "io::Error");
    }

    #[test]
    fn test_catch_without_parameters_keeps_sentinel() {
        let messager = MemoryMessager::new();
        let mut bare = declaration(true);
        bare.annotation.value = None;
        bare.parameters.clear();
        let Extraction::Record(record) = catch(&bare, &messager, false) else {
            panic!("expected a record");
        };
        assert_eq!(record.exception_name, UNASSIGNED);
    }

    #[test]
    fn test_catch_on_non_method_is_discarded() {
        let messager = MemoryMessager::new();
        assert_eq!(catch(&declaration(false), &messager, false), Extraction::Discard);
        assert!(messager.has_severity(Severity::Warning));
    }
}
