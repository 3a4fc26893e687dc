//! Diagnostic message sink.
//!
//! The generation pipeline reports everything user-visible through the
//! `Messager` trait rather than printing directly, so tests can capture
//! diagnostics and the production path can route them through the `log`
//! facade. This mirrors the position-tagged error/warning/notice sink of
//! the build environment the tool runs in.

use crate::discovery::SourcePosition;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Notice,
}

/// Sink for build-time diagnostics, optionally tagged with a source position.
pub trait Messager {
    fn report(&self, severity: Severity, position: Option<&SourcePosition>, message: &str);

    fn error(&self, message: &str) {
        self.report(Severity::Error, None, message);
    }

    fn warning(&self, position: &SourcePosition, message: &str) {
        self.report(Severity::Warning, Some(position), message);
    }

    fn notice(&self, message: &str) {
        self.report(Severity::Notice, None, message);
    }

    fn notice_at(&self, position: &SourcePosition, message: &str) {
        self.report(Severity::Notice, Some(position), message);
    }
}

/// Production sink: forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMessager;

impl Messager for LogMessager {
    fn report(&self, severity: Severity, position: Option<&SourcePosition>, message: &str) {
        let line = match position {
            Some(position) => format!("{}: {}", position, message),
            None => message.to_string(),
        };
        match severity {
            Severity::Error => log::error!("{}", line),
            Severity::Warning => log::warn!("{}", line),
            Severity::Notice => log::info!("{}", line),
        }
    }
}

/// A diagnostic captured by [`MemoryMessager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedMessage {
    pub severity: Severity,
    pub position: Option<String>,
    pub message: String,
}

/// In-memory sink for tests.
///
/// Captures every report in a thread-safe buffer that can be inspected
/// after the run, without touching the process logger.
#[derive(Debug, Clone, Default)]
pub struct MemoryMessager {
    captured: Arc<RwLock<Vec<CapturedMessage>>>,
}

impl MemoryMessager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> Vec<CapturedMessage> {
        self.captured.read().expect("RwLock poisoned").clone()
    }

    pub fn messages_with_severity(&self, severity: Severity) -> Vec<CapturedMessage> {
        self.captured()
            .into_iter()
            .filter(|m| m.severity == severity)
            .collect()
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        !self.messages_with_severity(severity).is_empty()
    }
}

impl Messager for MemoryMessager {
    fn report(&self, severity: Severity, position: Option<&SourcePosition>, message: &str) {
        self.captured
            .write()
            .expect("RwLock poisoned")
            .push(CapturedMessage {
                severity,
                position: position.map(|p| p.to_string()),
                message: message.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_memory_messager_captures_in_order() {
        let messager = MemoryMessager::new();
        messager.notice("first");
        messager.error("second");
        let captured = messager.captured();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].message, "first");
        assert_eq!(captured[1].severity, Severity::Error);
    }

    #[test]
    fn test_warning_carries_position() {
        let messager = MemoryMessager::new();
        let position = SourcePosition {
            file: PathBuf::from("src/handlers.rs"),
            line: 7,
        };
        messager.warning(&position, "bad target");
        let captured = messager.captured();
        assert_eq!(captured[0].position.as_deref(), Some("src/handlers.rs:7"));
    }

    #[test]
    fn test_has_severity_filters() {
        let messager = MemoryMessager::new();
        messager.notice("ok");
        assert!(messager.has_severity(Severity::Notice));
        assert!(!messager.has_severity(Severity::Error));
    }
}
