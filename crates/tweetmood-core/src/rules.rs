use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Immutable abbreviation/contraction expansion table.
///
/// Built once at startup from the YAML rules file and shared read-only by
/// every normalization call. Lookup is exact whole-token match; expansions
/// may span multiple words (`"cant"` → `"can not"`) or be a bare space to
/// drop filler tokens (`"lol"` → `" "`).
///
/// Keys and replacement values are case-folded to lowercase at load time:
/// normalization lowercases text before the expansion stage, so a
/// mixed-case key could never match, and a mixed-case replacement would
/// break the pipeline's idempotence.
#[derive(Debug, Clone)]
pub struct RuleSet {
    expansions: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    abbreviations: HashMap<String, String>,
}

impl RuleSet {
    /// Build a rule set from `(token, expansion)` pairs, validating and
    /// case-folding each entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a key is empty, contains
    /// whitespace (lookup is per whitespace-delimited token, so such a key
    /// could never match), or collides with another key after case-folding.
    pub fn from_entries<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut expansions = HashMap::new();

        for (key, value) in entries {
            if key.is_empty() {
                return Err(ConfigError::Validation(
                    "abbreviation key must be non-empty".to_string(),
                ));
            }
            if key.chars().any(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "abbreviation key '{key}' must be a single token"
                )));
            }

            let folded = key.to_lowercase();
            if expansions.insert(folded, value.to_lowercase()).is_some() {
                return Err(ConfigError::Validation(format!(
                    "duplicate abbreviation key after case-folding: '{}'",
                    key.to_lowercase()
                )));
            }
        }

        Ok(Self { expansions })
    }

    /// Look up the expansion for a token. Exact match only — no stemming,
    /// no fuzzy matching, no partial-token matching.
    #[must_use]
    pub fn expansion(&self, token: &str) -> Option<&str> {
        self.expansions.get(token).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }
}

/// Load and validate the abbreviation rule table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_rules(path: &Path) -> Result<RuleSet, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rules_file: RulesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::RulesFileParse)?;

    RuleSet::from_entries(rules_file.abbreviations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn lookup_is_exact_match() {
        let rules = RuleSet::from_entries(pairs(&[("cant", "can not")])).unwrap();
        assert_eq!(rules.expansion("cant"), Some("can not"));
        assert_eq!(rules.expansion("cant!"), None);
        assert_eq!(rules.expansion("can"), None);
    }

    #[test]
    fn keys_are_case_folded_at_load() {
        let rules = RuleSet::from_entries(pairs(&[("I'm", "I am")])).unwrap();
        assert_eq!(rules.expansion("i'm"), Some("i am"));
        assert_eq!(rules.expansion("I'm"), None);
    }

    #[test]
    fn values_are_case_folded_at_load() {
        let rules = RuleSet::from_entries(pairs(&[("id", "I would")])).unwrap();
        assert_eq!(rules.expansion("id"), Some("i would"));
    }

    #[test]
    fn space_valued_rules_are_preserved() {
        let rules = RuleSet::from_entries(pairs(&[("lol", " ")])).unwrap();
        assert_eq!(rules.expansion("lol"), Some(" "));
    }

    #[test]
    fn rejects_empty_key() {
        let err = RuleSet::from_entries(pairs(&[("", "nothing")])).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn rejects_key_with_whitespace() {
        let err = RuleSet::from_entries(pairs(&[("sort of", "kind of")])).unwrap_err();
        assert!(err.to_string().contains("single token"));
    }

    #[test]
    fn rejects_duplicate_key_after_folding() {
        let err =
            RuleSet::from_entries(pairs(&[("I'd", "i would"), ("i'd", "i would")])).unwrap_err();
        assert!(err.to_string().contains("duplicate abbreviation key"));
    }

    #[test]
    fn load_rules_missing_file_is_io_error() {
        let err = load_rules(Path::new("/nonexistent/abbrev.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::RulesFileIo { .. }));
    }

    #[test]
    fn load_rules_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("abbreviations.yaml");
        assert!(
            path.exists(),
            "abbreviations.yaml missing at {path:?} — required for this test"
        );
        let result = load_rules(&path);
        assert!(result.is_ok(), "failed to load abbreviations.yaml: {result:?}");
        let rules = result.unwrap();
        assert!(!rules.is_empty());
        // Spot-check entries the normalizer depends on.
        assert_eq!(rules.expansion("cant"), Some("can not"));
        assert_eq!(rules.expansion("lol"), Some(" "));
        assert_eq!(rules.expansion("u"), Some("you"));
    }
}
