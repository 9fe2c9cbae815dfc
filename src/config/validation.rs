use regex::Regex;

use super::schema::Config;
use crate::plugins;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let sources = [config.org.is_some(), config.user.is_some(), !config.repos.is_empty()];
    if sources.iter().filter(|set| **set).count() > 1 {
        errors.push("org, user and repos are mutually exclusive: set only one".to_string());
    }

    if !plugins::AVAILABLE.contains(&config.plugin.as_str()) {
        errors.push(format!(
            "plugin: unknown '{}' (available: {})",
            config.plugin,
            plugins::AVAILABLE.join(", ")
        ));
    }

    if config.max_workers == 0 {
        errors.push("max_workers: must be at least 1".to_string());
    }

    if let Err(e) = humantime::parse_duration(config.retry.delay.trim()) {
        errors.push(format!("retry.delay: invalid '{}' - {}", config.retry.delay, e));
    }

    if config.retry.backoff.is_nan() || config.retry.backoff < 1.0 {
        errors.push("retry.backoff: must be at least 1".to_string());
    }

    if config.retry.max_retries < 2 {
        errors.push("retry.max_retries: must be at least 2 to allow one attempt".to_string());
    }

    for (i, pattern) in config.ok_patterns.iter().enumerate() {
        if let Err(e) = Regex::new(pattern) {
            errors.push(format!("ok_patterns[{}]: invalid '{}' - {}", i, pattern, e));
        }
    }

    if reqwest::Url::parse(&config.api_url).is_err() {
        errors.push(format!("api_url: invalid URL '{}'", config.api_url));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_sources_are_mutually_exclusive() {
        let config = Config {
            org: Some("acme".to_string()),
            repos: vec!["https://api.github.com/repos/a/b".to_string()],
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("mutually exclusive"));
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = Config {
            plugin: "gerrit".to_string(),
            max_workers: 0,
            ok_patterns: vec!["ok".to_string(), "(".to_string()],
            ..Config::default()
        };
        config.retry.delay = "soon".to_string();
        config.retry.backoff = 0.5;
        config.retry.max_retries = 1;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().any(|e| e.starts_with("plugin:")));
        assert!(errors.iter().any(|e| e.starts_with("retry.delay:")));
        assert!(errors.iter().any(|e| e.starts_with("ok_patterns[1]:")));
    }
}
