use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let scorer_url = require("TWEETMOOD_SCORER_URL")?;
    let scorer_timeout_secs = parse_u64("TWEETMOOD_SCORER_TIMEOUT_SECS", "30")?;
    let rules_path = PathBuf::from(or_default(
        "TWEETMOOD_RULES_PATH",
        "./config/abbreviations.yaml",
    ));
    let log_level = or_default("TWEETMOOD_LOG_LEVEL", "info");
    let max_text_chars = parse_usize("TWEETMOOD_MAX_TEXT_CHARS", "10000")?;

    Ok(AppConfig {
        scorer_url,
        scorer_timeout_secs,
        rules_path,
        log_level,
        max_text_chars,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid values.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("TWEETMOOD_SCORER_URL", "http://localhost:8501");
        m
    }

    #[test]
    fn build_succeeds_with_only_required_vars() {
        let env = full_env();
        let config = build_app_config(lookup_from_map(&env)).unwrap();
        assert_eq!(config.scorer_url, "http://localhost:8501");
        assert_eq!(config.scorer_timeout_secs, 30);
        assert_eq!(
            config.rules_path.to_str().unwrap(),
            "./config/abbreviations.yaml"
        );
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_text_chars, 10_000);
    }

    #[test]
    fn build_fails_without_scorer_url() {
        let env = HashMap::new();
        let err = build_app_config(lookup_from_map(&env)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnvVar(var) if var == "TWEETMOOD_SCORER_URL"
        ));
    }

    #[test]
    fn build_honors_overrides() {
        let mut env = full_env();
        env.insert("TWEETMOOD_SCORER_TIMEOUT_SECS", "5");
        env.insert("TWEETMOOD_RULES_PATH", "/etc/tweetmood/abbrev.yaml");
        env.insert("TWEETMOOD_LOG_LEVEL", "debug");
        env.insert("TWEETMOOD_MAX_TEXT_CHARS", "280");
        let config = build_app_config(lookup_from_map(&env)).unwrap();
        assert_eq!(config.scorer_timeout_secs, 5);
        assert_eq!(config.rules_path.to_str().unwrap(), "/etc/tweetmood/abbrev.yaml");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_text_chars, 280);
    }

    #[test]
    fn build_rejects_non_numeric_timeout() {
        let mut env = full_env();
        env.insert("TWEETMOOD_SCORER_TIMEOUT_SECS", "soon");
        let err = build_app_config(lookup_from_map(&env)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { var, .. } if var == "TWEETMOOD_SCORER_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn build_rejects_non_numeric_max_text_chars() {
        let mut env = full_env();
        env.insert("TWEETMOOD_MAX_TEXT_CHARS", "-1");
        let err = build_app_config(lookup_from_map(&env)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { var, .. } if var == "TWEETMOOD_MAX_TEXT_CHARS"
        ));
    }
}
