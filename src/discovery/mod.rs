//! Declaration discovery.
//!
//! The generation pipeline never inspects syntax trees directly; it
//! consumes the narrow declaration model defined here, produced by the
//! `syn`-based [`scanner`]. Any other introspection backend can satisfy
//! the [`Discovery`] trait, which keeps the transformation pipeline
//! independent of the parsing toolchain.

pub mod scanner;

use std::fmt;
use std::path::PathBuf;

pub use scanner::{ScanIndex, SourceScanner};

/// Reserved annotation-default value meaning "no explicit value supplied".
pub const UNASSIGNED: &str = "[ unassigned ]";

/// The two annotation kinds the scanner recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Url,
    ExceptionHandler,
}

impl AnnotationKind {
    /// Attribute path as written in source, without the `@`/`#[]` dressing.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            AnnotationKind::Url => "http_url",
            AnnotationKind::ExceptionHandler => "http_exception_handler",
        }
    }
}

/// Where a declaration lives in the scanned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub file: PathBuf,
    pub line: usize,
}

impl SourcePosition {
    /// `<file>:<line>` with the file name only, as embedded in generated
    /// rule names. Diagnostics use the full-path `Display` form instead.
    pub fn source_ref(&self) -> String {
        let name = match self.file.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.file.display().to_string(),
        };
        format!("{}:{}", name, self.line)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// One formal parameter of an annotated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
    /// Present iff the parameter carries `#[http_param]`; the explicit
    /// string argument, or [`UNASSIGNED`] when the attribute is bare.
    pub named_binding: Option<String>,
}

/// Attribute arguments of the handler annotation on a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationValues {
    pub value: Option<String>,
    pub weight: i32,
    pub handler: Option<String>,
}

/// One discovered annotated program element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// False when the annotation sits on a non-function item.
    pub is_method: bool,
    /// Qualified enclosing-scope name (module path plus impl type).
    pub class_name: String,
    pub simple_name: String,
    pub doc_comment: Option<String>,
    pub position: SourcePosition,
    pub parameters: Vec<Parameter>,
    pub annotation: AnnotationValues,
}

/// Query interface over one completed discovery pass.
pub trait Discovery {
    fn declarations(&self, kind: AnnotationKind) -> &[Declaration];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_ref_uses_file_name_only() {
        let position = SourcePosition {
            file: PathBuf::from("deep/nested/handlers.rs"),
            line: 12,
        };
        assert_eq!(position.source_ref(), "handlers.rs:12");
    }

    #[test]
    fn test_display_keeps_full_path() {
        let position = SourcePosition {
            file: PathBuf::from("deep/nested/handlers.rs"),
            line: 12,
        };
        assert_eq!(position.to_string(), "deep/nested/handlers.rs:12");
    }
}
