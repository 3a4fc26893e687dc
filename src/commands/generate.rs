//! The `generate` command.
//!
//! One invocation is one generation run: read options, open the output
//! channel, extract every discovered annotation, sort, then either commit
//! the serialized rule set or delete the file. The delete-on-any-failure
//! policy guarantees the consumer never observes a partially written or
//! semantically incomplete rule file.

use crate::config::GeneratorOptions;
use crate::core::errors::Error;
use crate::core::records::{CatchRecord, RuleRecord};
use crate::diagnostics::{LogMessager, Messager};
use crate::discovery::{AnnotationKind, Discovery, SourceScanner};
use crate::extract::{self, Extraction};
use crate::io::OutputChannel;
use crate::output::xml;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub struct GenerateConfig {
    pub path: PathBuf,
    pub options: Vec<String>,
}

pub fn generate(config: GenerateConfig) -> Result<()> {
    run_generation(&config.path, &config.options, &LogMessager)
}

/// Run one generation pass against `scan_root`.
///
/// All diagnostics go through `messager`; the returned error mirrors the
/// first fatal condition for the caller's exit status.
pub fn run_generation(
    scan_root: &Path,
    raw_options: &[String],
    messager: &dyn Messager,
) -> Result<()> {
    let options = GeneratorOptions::from_pairs(raw_options);
    let Some(rules_path) = options.save_rules_to.clone() else {
        messager.error("saveRulesTo option must be specified");
        return Err(Error::configuration("saveRulesTo option must be specified").into());
    };

    let mut channel = match OutputChannel::create(&rules_path) {
        Ok(channel) => channel,
        Err(e) => {
            messager.error(&e.to_string());
            return Err(e.into());
        }
    };

    let mut poisoned = false;
    let outcome = write_rule_set(scan_root, &options, messager, &mut channel, &mut poisoned);
    if let Err(e) = &outcome {
        poisoned = true;
        messager.error(&format!("error occurred during processing: {e}"));
    }

    if poisoned {
        messager.error("deleting generated file");
        channel.discard()?;
        return outcome.and(Err(anyhow::anyhow!(
            "rule file discarded, see reported warnings"
        )));
    }

    channel.commit()?;
    Ok(())
}

/// Extract, order and serialize both record lists.
///
/// Per-declaration failures set `poisoned` and keep going; only unexpected
/// faults (unreadable tree, parse failure, write failure) return an error.
/// Nothing is written once `poisoned` is set.
fn write_rule_set(
    scan_root: &Path,
    options: &GeneratorOptions,
    messager: &dyn Messager,
    channel: &mut OutputChannel,
    poisoned: &mut bool,
) -> Result<()> {
    let index = SourceScanner::new(scan_root).scan()?;

    let mut rules: Vec<RuleRecord> = Vec::new();
    for declaration in index.declarations(AnnotationKind::Url) {
        match extract::rule(declaration, messager, options.show_positions) {
            Extraction::Record(record) => rules.push(record),
            Extraction::Discard => *poisoned = true,
        }
    }

    let mut catches: Vec<CatchRecord> = Vec::new();
    for declaration in index.declarations(AnnotationKind::ExceptionHandler) {
        match extract::catch(declaration, messager, options.show_positions) {
            Extraction::Record(record) => catches.push(record),
            Extraction::Discard => *poisoned = true,
        }
    }

    if !rules.is_empty() {
        messager.notice(&format!("Got {} @http_url annotations", rules.len()));
        rules.sort_by(|a, b| a.output_order(b));
    }
    if !catches.is_empty() {
        messager.notice(&format!(
            "Got {} @http_exception_handler annotations",
            catches.len()
        ));
        catches.sort_by(|a, b| a.output_order(b));
    }

    if !*poisoned {
        messager.notice(&format!("Writing to {}", channel.path().display()));
        let out = channel.writer();
        for rule in &rules {
            xml::write_rule(out, rule)?;
        }
        for catch in &catches {
            xml::write_catch(out, catch)?;
        }
    }

    Ok(())
}
