use std::collections::HashSet;

use grievance_common::config::{ClassifierConfig, RetryConfig};

use super::loader::ConfigError;

/// Validate classifier configuration.
///
/// Collects every problem before failing so one run reports them all.
pub fn validate(config: &ClassifierConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_engine(config, &mut errors);
    validate_fallback(config, &mut errors);
    validate_rules(config, &mut errors);
    validate_urgency_markers(config, &mut errors);
    validate_remote(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.join("; ")))
    }
}

fn validate_engine(config: &ClassifierConfig, errors: &mut Vec<String>) {
    let e = &config.engine;

    if e.summary_max_chars == 0 {
        errors.push("engine.summary_max_chars must be > 0".into());
    }
    if e.max_matched_keywords == 0 {
        errors.push("engine.max_matched_keywords must be > 0".into());
    }
    if e.base_score_floor > 100 {
        errors.push("engine.base_score_floor must be <= 100".into());
    }
}

fn validate_fallback(config: &ClassifierConfig, errors: &mut Vec<String>) {
    let f = &config.fallback;

    if f.escalation_score > 100 {
        errors.push("fallback.escalation_score must be <= 100".into());
    }
    if f.sub_category.trim().is_empty() {
        errors.push("fallback.sub_category must not be empty".into());
    }
    if f.marker.trim().is_empty() {
        errors.push("fallback.marker must not be empty".into());
    }
}

fn validate_rules(config: &ClassifierConfig, errors: &mut Vec<String>) {
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, rule) in config.rules.iter().enumerate() {
        if rule.keyword.trim().is_empty() {
            errors.push(format!("rules[{}].keyword must not be empty", i));
        } else if rule.keyword != rule.keyword.to_lowercase() {
            errors.push(format!("rules[{}].keyword must be lowercase", i));
        }
        if rule.base_score > 100 {
            errors.push(format!("rules[{}].base_score must be <= 100", i));
        }
        if rule.sub_category.trim().is_empty() {
            errors.push(format!("rules[{}].sub_category must not be empty", i));
        }
        if !seen.insert(rule.keyword.as_str()) {
            errors.push(format!(
                "rules[{}].keyword '{}' is defined more than once",
                i, rule.keyword
            ));
        }
    }
}

fn validate_urgency_markers(config: &ClassifierConfig, errors: &mut Vec<String>) {
    for (i, marker) in config.urgency_markers.iter().enumerate() {
        if marker.trim().is_empty() {
            errors.push(format!("urgency_markers[{}] must not be empty", i));
        } else if *marker != marker.to_lowercase() {
            errors.push(format!("urgency_markers[{}] must be lowercase", i));
        }
    }
}

fn validate_remote(config: &ClassifierConfig, errors: &mut Vec<String>) {
    let r = &config.remote;

    if r.timeout_ms == 0 {
        errors.push("remote.timeout_ms must be > 0".into());
    }
    if r.circuit_failure_threshold == 0 {
        errors.push("remote.circuit_failure_threshold must be > 0".into());
    }
    validate_retry(&r.retry, "remote.retry", errors);
}

fn validate_retry(rc: &RetryConfig, name: &str, errors: &mut Vec<String>) {
    if rc.max_attempts == 0 {
        errors.push(format!("{}.max_attempts must be > 0", name));
    }
    if rc.initial_backoff_ms == 0 {
        errors.push(format!("{}.initial_backoff_ms must be > 0", name));
    }
    if rc.max_backoff_ms < rc.initial_backoff_ms {
        errors.push(format!(
            "{}.max_backoff_ms must be >= initial_backoff_ms",
            name
        ));
    }
    if rc.backoff_multiplier < 1.0 {
        errors.push(format!("{}.backoff_multiplier must be >= 1.0", name));
    }
}
