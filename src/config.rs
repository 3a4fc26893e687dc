//! Processor option parsing.
//!
//! Options arrive as a flat list of `key=value` pairs (the `-A` arguments
//! on the command line). Recognition is by key prefix; unknown keys are
//! ignored so callers can pass through options meant for other tools.

use std::path::PathBuf;

const SAVE_RULES_TO: &str = "saveRulesTo=";
const SHOW_POSITIONS: &str = "showPositions=";

/// Configuration for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Output file path. Required; its absence is a fatal configuration
    /// error reported by the orchestrating command, not here.
    pub save_rules_to: Option<PathBuf>,
    /// Emit a per-annotation notice with the source position and the
    /// extracted values.
    pub show_positions: bool,
}

impl GeneratorOptions {
    pub fn from_pairs(pairs: &[String]) -> Self {
        let mut options = Self::default();
        for pair in pairs {
            if let Some(path) = pair.strip_prefix(SAVE_RULES_TO) {
                options.save_rules_to = Some(PathBuf::from(path));
            } else if let Some(flag) = pair.strip_prefix(SHOW_POSITIONS) {
                options.show_positions = flag.eq_ignore_ascii_case("true");
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_options_are_defaults() {
        let options = GeneratorOptions::from_pairs(&[]);
        assert_eq!(options.save_rules_to, None);
        assert!(!options.show_positions);
    }

    #[test]
    fn test_save_rules_to_is_parsed() {
        let options = GeneratorOptions::from_pairs(&pairs(&["saveRulesTo=out/rules.xml"]));
        assert_eq!(options.save_rules_to, Some(PathBuf::from("out/rules.xml")));
    }

    #[test]
    fn test_show_positions_is_case_insensitive() {
        let options = GeneratorOptions::from_pairs(&pairs(&["showPositions=TRUE"]));
        assert!(options.show_positions);
    }

    #[test]
    fn test_show_positions_rejects_non_true_values() {
        let options = GeneratorOptions::from_pairs(&pairs(&["showPositions=yes"]));
        assert!(!options.show_positions);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options = GeneratorOptions::from_pairs(&pairs(&[
            "debugLevel=3",
            "saveRulesTo=rules.xml",
            "somethingElse=x",
        ]));
        assert_eq!(options.save_rules_to, Some(PathBuf::from("rules.xml")));
    }

    #[test]
    fn test_later_pair_wins() {
        let options =
            GeneratorOptions::from_pairs(&pairs(&["saveRulesTo=a.xml", "saveRulesTo=b.xml"]));
        assert_eq!(options.save_rules_to, Some(PathBuf::from("b.xml")));
    }
}
