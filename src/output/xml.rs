//! Rule-file serialization.
//!
//! Writers render one record at a time into any [`Write`] target, so the
//! orchestrating command can stream into its output channel and tests can
//! render into a buffer. Escaping is intentionally minimal: only `&`, `<`
//! and `>` are replaced, because the consumer of the generated dialect
//! relies on exactly that narrow contract.

use crate::core::records::{CatchRecord, RuleRecord};
use std::io::{self, Write};

const INDENT: &str = "    ";
const NOTE_PAD: &str = "        ";

/// a very very basic xml escaper
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Prefix every line with `pad`. No trailing newline is added and empty
/// input stays empty.
pub fn pad_each_line(pad: &str, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn write_rule<W: Write>(out: &mut W, record: &RuleRecord) -> io::Result<()> {
    writeln!(out, "<rule>")?;
    writeln!(out, "{INDENT}<name>{}</name>", record.source_ref)?;
    write_note(out, record.doc_comment.as_deref())?;
    writeln!(out, "{INDENT}<from>{}</from>", record.pattern)?;
    let handler_attr = match &record.handler {
        Some(handler) => format!(" handler=\"{handler}\""),
        None => String::new(),
    };
    writeln!(
        out,
        "{INDENT}<run class=\"{}\" method=\"{}{}\"{} />",
        record.class_name, record.method_name, record.params_formatted, handler_attr
    )?;
    if !record.chain_used {
        writeln!(out, "{INDENT}<to>null</to>")?;
    }
    writeln!(out, "</rule>")
}

pub fn write_catch<W: Write>(out: &mut W, record: &CatchRecord) -> io::Result<()> {
    writeln!(out, "<catch class=\"{}\">", record.exception_name)?;
    write_note(out, record.doc_comment.as_deref())?;
    writeln!(
        out,
        "{INDENT}<run class=\"{}\" method=\"{}{}\"/>",
        record.class_name, record.method_name, record.params_formatted
    )?;
    writeln!(out, "</catch>")
}

fn write_note<W: Write>(out: &mut W, doc_comment: Option<&str>) -> io::Result<()> {
    if let Some(doc) = doc_comment {
        if !is_blank(doc) {
            writeln!(out, "{INDENT}<note>")?;
            writeln!(out, "{}", pad_each_line(NOTE_PAD, &escape_xml(doc)))?;
            writeln!(out, "{INDENT}</note>")?;
        }
    }
    Ok(())
}
