use serde::{Deserialize, Serialize};

use crate::types::Department;

/// Top-level classifier configuration, deserialized from classifier.toml.
///
/// Every section has defaults, so an empty file yields the reference behavior.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub engine: EngineSettings,
    pub fallback: FallbackConfig,
    /// Keyword rules in evaluation order. Empty means "use the built-in table".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<KeywordRuleConfig>,
    /// Urgency markers. Empty means "use the built-in markers".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub urgency_markers: Vec<String>,
    pub remote: RemoteConfig,
}

/// Scoring and output-shaping constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Characters of complaint text kept in the summary before the ellipsis.
    pub summary_max_chars: usize,
    /// Cap on `matched_keywords`.
    pub max_matched_keywords: usize,
    /// Score added per distinct urgency marker found.
    pub urgency_bonus: u32,
    /// Minimum base score once any rule is considered.
    pub base_score_floor: u8,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            summary_max_chars: 60,
            max_matched_keywords: 4,
            urgency_bonus: 15,
            base_score_floor: 10,
        }
    }
}

/// Bucket used when no department keyword matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub department: Department,
    pub sub_category: String,
    pub escalation_score: u8,
    /// Single generic entry reported in `matched_keywords`.
    pub marker: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            department: Department::Sanitation,
            sub_category: "General Nuisance".into(),
            escalation_score: 20,
            marker: "general".into(),
        }
    }
}

/// One keyword rule as written in configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordRuleConfig {
    pub keyword: String,
    pub department: Department,
    pub base_score: u8,
    pub sub_category: String,
}

/// How callers reach a remote analysis backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// Consecutive failures before the circuit opens.
    pub circuit_failure_threshold: u32,
    /// Seconds the circuit stays open before a probe is allowed.
    pub circuit_cooldown_seconds: u64,
    pub retry: RetryConfig,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            circuit_failure_threshold: 5,
            circuit_cooldown_seconds: 60,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for remote calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 2_000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}
