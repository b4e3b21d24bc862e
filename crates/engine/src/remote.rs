//! Client for an analysis backend reached over HTTP.
//!
//! Wire contract: `POST {base}/analyze` with `{"complaint": "..."}`, answered
//! by the `AnalysisResult` JSON. Failures surface as errors; callers must not
//! store a complaint without an analysis.

use std::time::Duration;

use grievance_common::api::analyze::AnalyzeRequest;
use grievance_common::config::{RemoteConfig, RetryConfig};
use grievance_common::types::{AnalysisResult, RiskLevel};
use grievance_common::{GrievanceError, Result};

use crate::circuit_breaker::{CircuitBreaker, CircuitState};
use crate::scoring::MAX_SCORE;

/// Upper bound on `matchedKeywords` in any analysis.
const MAX_MATCHED_KEYWORDS: usize = 4;

/// Outcome of a single HTTP attempt.
#[derive(Debug)]
enum AttemptError {
    /// Connection refused, DNS failure, timeout, or a 5xx. Retryable.
    Transient { detail: String, timed_out: bool },
    /// The backend understood and refused the request (4xx). Not retryable.
    Rejected { status: u16, detail: String },
    /// The backend answered 2xx with something that is not a valid analysis.
    Malformed(String),
}

pub struct RemoteAnalyzer {
    http: reqwest::Client,
    endpoint: String,
    retry: RetryConfig,
    breaker: CircuitBreaker,
}

impl RemoteAnalyzer {
    pub fn new(base_url: &str, config: &RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("grievance-engine/0.1")
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GrievanceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}/analyze", base_url.trim_end_matches('/')),
            retry: config.retry.clone(),
            breaker: CircuitBreaker::new(
                "analysis_backend",
                config.circuit_failure_threshold,
                Duration::from_secs(config.circuit_cooldown_seconds),
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn circuit_state(&self) -> CircuitState {
        self.breaker.current_state()
    }

    /// Analyze `text` on the remote backend, retrying transient failures.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        if text.trim().is_empty() {
            return Err(GrievanceError::InvalidInput(
                "complaint text must not be empty".into(),
            ));
        }

        if !self.breaker.allow() {
            metrics::counter!("grievance.remote.errors", "kind" => "circuit_open").increment(1);
            return Err(GrievanceError::CircuitOpen(self.breaker.name().to_string()));
        }

        let mut attempt = 0u32;
        let mut backoff_ms = self.retry.initial_backoff_ms;

        loop {
            attempt += 1;
            match self.call_once(text).await {
                Ok(analysis) => {
                    self.breaker.record_success();
                    return Ok(analysis);
                }
                Err(AttemptError::Rejected { status, detail }) => {
                    // Backend is healthy; the request was bad.
                    self.breaker.record_success();
                    metrics::counter!("grievance.remote.errors", "kind" => "rejected").increment(1);
                    return Err(GrievanceError::RemoteRejected { status, detail });
                }
                Err(AttemptError::Malformed(detail)) => {
                    self.breaker.record_failure();
                    metrics::counter!("grievance.remote.errors", "kind" => "malformed").increment(1);
                    return Err(GrievanceError::Internal(format!(
                        "Malformed analysis from {}: {}",
                        self.endpoint, detail
                    )));
                }
                Err(AttemptError::Transient { detail, timed_out }) => {
                    if attempt >= self.retry.max_attempts {
                        self.breaker.record_failure();
                        let kind = if timed_out { "timeout" } else { "unreachable" };
                        metrics::counter!("grievance.remote.errors", "kind" => kind).increment(1);
                        tracing::error!(
                            endpoint = %self.endpoint,
                            attempts = attempt,
                            error = %detail,
                            "Analysis backend unreachable"
                        );
                        let message =
                            format!("{} after {} attempts: {}", self.endpoint, attempt, detail);
                        return Err(if timed_out {
                            GrievanceError::Timeout(message)
                        } else {
                            GrievanceError::UnreachableRemote(message)
                        });
                    }
                    let wait = backoff_ms + jitter_ms(&self.retry, attempt, backoff_ms);
                    tracing::warn!(attempt, wait_ms = wait, error = %detail, "Analysis backend error, retrying");
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                    backoff_ms = (backoff_ms as f64 * self.retry.backoff_multiplier) as u64;
                    backoff_ms = backoff_ms.min(self.retry.max_backoff_ms);
                }
            }
        }
    }

    async fn call_once(&self, text: &str) -> std::result::Result<AnalysisResult, AttemptError> {
        let start = std::time::Instant::now();
        let request = AnalyzeRequest {
            complaint: text.to_string(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AttemptError::Transient {
                timed_out: e.is_timeout(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        metrics::histogram!("grievance.remote.latency").record(start.elapsed().as_secs_f64());

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Transient {
                detail: format!("{}: {}", status, body),
                timed_out: false,
            });
        }

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AttemptError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let analysis: AnalysisResult = response
            .json()
            .await
            .map_err(|e| AttemptError::Malformed(format!("Failed to parse response: {}", e)))?;

        check_analysis(&analysis).map_err(AttemptError::Malformed)?;
        Ok(analysis)
    }
}

/// Reject analyses that break the output contract. Stored complaints are
/// never re-derived, so the tier, action and SLA must already agree.
fn check_analysis(analysis: &AnalysisResult) -> std::result::Result<(), String> {
    if analysis.escalation_score > MAX_SCORE {
        return Err(format!(
            "escalationScore {} out of range",
            analysis.escalation_score
        ));
    }
    if !(-1.0..=0.0).contains(&analysis.sentiment_score) {
        return Err(format!(
            "sentimentScore {} out of range",
            analysis.sentiment_score
        ));
    }
    if analysis.matched_keywords.len() > MAX_MATCHED_KEYWORDS {
        return Err(format!(
            "{} matchedKeywords, at most {} allowed",
            analysis.matched_keywords.len(),
            MAX_MATCHED_KEYWORDS
        ));
    }

    let expected = RiskLevel::from_score(analysis.escalation_score);
    if analysis.risk_level != expected {
        return Err(format!(
            "riskLevel {} does not match escalationScore {} ({})",
            analysis.risk_level, analysis.escalation_score, expected
        ));
    }
    if analysis.estimated_resolution_hours != expected.resolution_hours() {
        return Err(format!(
            "estimatedResolutionHours {} does not match riskLevel {}",
            analysis.estimated_resolution_hours, expected
        ));
    }
    if analysis.suggested_action != expected.suggested_action() {
        return Err(format!(
            "suggestedAction does not match riskLevel {}",
            expected
        ));
    }
    Ok(())
}

fn jitter_ms(retry: &RetryConfig, attempt: u32, backoff_ms: u64) -> u64 {
    if !retry.jitter {
        return 0;
    }
    use std::hash::{Hash, Hasher};
    let mut hasher = std::hash::DefaultHasher::new();
    attempt.hash(&mut hasher);
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos()
        .hash(&mut hasher);
    hasher.finish() % (backoff_ms / 2 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grievance_common::types::Department;

    fn analysis(score: u8, sentiment: f64) -> AnalysisResult {
        let risk_level = RiskLevel::from_score(score);
        AnalysisResult {
            department: Department::Water,
            sub_category: "Pipeline Burst".into(),
            risk_level,
            escalation_score: score,
            sentiment_score: sentiment,
            matched_keywords: vec!["pipe burst".into()],
            summary: String::new(),
            suggested_action: risk_level.suggested_action().to_string(),
            estimated_resolution_hours: risk_level.resolution_hours(),
        }
    }

    #[test]
    fn test_endpoint_normalized() {
        let client = RemoteAnalyzer::new("http://analyzer:8000/", &RemoteConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "http://analyzer:8000/analyze");
        assert_eq!(client.circuit_state(), CircuitState::Closed);
    }

    #[test]
    fn test_check_analysis() {
        assert!(check_analysis(&analysis(70, -0.8)).is_ok());
        assert!(check_analysis(&analysis(101, -1.0)).is_err());
        assert!(check_analysis(&analysis(50, 0.3)).is_err());
    }

    #[test]
    fn test_check_analysis_tier_consistency() {
        let mut wrong_tier = analysis(95, -1.0);
        wrong_tier.risk_level = RiskLevel::Low;
        assert!(check_analysis(&wrong_tier).is_err());

        let mut wrong_sla = analysis(95, -1.0);
        wrong_sla.estimated_resolution_hours = 999;
        assert!(check_analysis(&wrong_sla).is_err());

        let mut wrong_action = analysis(30, -0.4);
        wrong_action.suggested_action = "Ignore.".into();
        assert!(check_analysis(&wrong_action).is_err());

        let mut too_many = analysis(70, -0.8);
        too_many.matched_keywords = (0..5).map(|i| format!("kw{}", i)).collect();
        assert!(check_analysis(&too_many).is_err());
    }

    #[test]
    fn test_jitter_bounded() {
        let retry = RetryConfig::default();
        for attempt in 1..20 {
            assert!(jitter_ms(&retry, attempt, 200) <= 100);
        }
        let no_jitter = RetryConfig {
            jitter: false,
            ..RetryConfig::default()
        };
        assert_eq!(jitter_ms(&no_jitter, 1, 200), 0);
    }

    #[tokio::test]
    async fn test_blank_text_not_sent() {
        let client = RemoteAnalyzer::new("http://127.0.0.1:1", &RemoteConfig::default()).unwrap();
        let err = client.analyze("  ").await.unwrap_err();
        assert!(matches!(err, GrievanceError::InvalidInput(_)));
        assert_eq!(client.circuit_state(), CircuitState::Closed);
    }
}
