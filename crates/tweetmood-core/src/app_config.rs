use std::path::PathBuf;

/// Process-level configuration shared by every tweetmood binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the external scoring service.
    pub scorer_url: String,
    /// Per-request timeout for scoring calls, in seconds.
    pub scorer_timeout_secs: u64,
    /// Path to the abbreviation rule table (YAML).
    pub rules_path: PathBuf,
    pub log_level: String,
    /// Input cap enforced at the host boundary, in characters. Texts longer
    /// than this are rejected before normalization runs.
    pub max_text_chars: usize,
}
