//! The classification pipeline from complaint text to `AnalysisResult`.

use std::sync::Arc;

use grievance_common::config::{ClassifierConfig, EngineSettings};
use grievance_common::types::{AnalysisResult, Assessment, RiskLevel};
use grievance_common::{GrievanceError, Result};

use crate::rules::RuleSet;
use crate::scoring::{self, clamp_score};
use crate::summary::summarize;
use crate::urgency;

/// Rule-based grievance classifier.
///
/// Pure and deterministic: the same text always yields the same analysis.
/// Holds only read-only configuration, so one instance can serve any number
/// of concurrent callers.
#[derive(Clone, Debug)]
pub struct Classifier {
    rules: Arc<RuleSet>,
    settings: EngineSettings,
}

impl Classifier {
    pub fn new(rules: Arc<RuleSet>, settings: EngineSettings) -> Self {
        Self { rules, settings }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            Arc::new(RuleSet::from_config(config)),
            config.engine.clone(),
        )
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Classify a complaint. Fails only on blank text.
    pub fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        self.assess(text).map(|a| a.analysis)
    }

    /// Classify a complaint and report how the escalation score was reached.
    pub fn assess(&self, text: &str) -> Result<Assessment> {
        if text.trim().is_empty() {
            return Err(GrievanceError::InvalidInput(
                "complaint text must not be empty".into(),
            ));
        }

        let lowered = text.to_lowercase();
        let markers = urgency::find_markers(&lowered, self.rules.urgency_markers());

        let (department, sub_category, escalation_score, matched_keywords, breakdown) =
            match self.rules.strongest_match(&lowered) {
                Some(best) => {
                    let composed =
                        scoring::compose(Some(best.base_score), markers.len(), &self.settings);
                    let keywords = self.collect_keywords(&lowered, &markers);
                    (
                        best.department,
                        best.sub_category.clone(),
                        composed.escalation_score,
                        keywords,
                        composed.breakdown(&self.settings),
                    )
                }
                None => {
                    // No department keyword: fixed fallback score, urgency bonus dropped.
                    let fallback = self.rules.fallback();
                    let score = clamp_score(u32::from(fallback.escalation_score));
                    (
                        fallback.department,
                        fallback.sub_category.clone(),
                        score,
                        vec![fallback.marker.clone()],
                        scoring::fallback_breakdown(score, markers.len()),
                    )
                }
            };

        let risk_level = RiskLevel::from_score(escalation_score);

        tracing::debug!(
            department = %department,
            sub_category = %sub_category,
            escalation_score,
            risk_level = %risk_level,
            urgency_markers = markers.len(),
            fallback = breakdown.fallback_applied,
            "Complaint classified"
        );

        Ok(Assessment {
            analysis: AnalysisResult {
                department,
                sub_category,
                risk_level,
                escalation_score,
                sentiment_score: scoring::sentiment_proxy(escalation_score),
                matched_keywords,
                summary: summarize(text, self.settings.summary_max_chars),
                suggested_action: risk_level.suggested_action().to_string(),
                estimated_resolution_hours: risk_level.resolution_hours(),
            },
            breakdown,
        })
    }

    /// Department keywords in table order, then urgency markers, deduplicated and capped.
    fn collect_keywords(&self, lowered: &str, markers: &[&str]) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        let candidates = self
            .rules
            .matching(lowered)
            .map(|r| r.keyword.as_str())
            .chain(markers.iter().copied());

        for candidate in candidates {
            if keywords.len() >= self.settings.max_matched_keywords {
                break;
            }
            if !keywords.iter().any(|k| k == candidate) {
                keywords.push(candidate.to_string());
            }
        }
        keywords
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(RuleSet::builtin()), EngineSettings::default())
    }
}
