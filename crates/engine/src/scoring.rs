//! Escalation score composition and the sentiment proxy.

use grievance_common::config::EngineSettings;
use grievance_common::types::{ScoreBreakdown, ScoreComponent};

use crate::urgency::urgency_bonus;

/// Upper bound of the escalation score.
pub const MAX_SCORE: u8 = 100;

/// Intermediate values of the escalation score for one complaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComposedScore {
    /// Highest matched base score, raised to the configured floor.
    pub base: u8,
    pub marker_count: usize,
    pub urgency_bonus: u32,
    /// `base + urgency_bonus`, before clamping.
    pub raw: u32,
    /// `raw` clamped to 0..=100.
    pub escalation_score: u8,
}

/// Combine the strongest rule's base score with the urgency bonus.
pub fn compose(best_base: Option<u8>, marker_count: usize, settings: &EngineSettings) -> ComposedScore {
    let base = best_base.unwrap_or(0).max(settings.base_score_floor);
    let bonus = urgency_bonus(marker_count, settings.urgency_bonus);
    let raw = u32::from(base).saturating_add(bonus);
    ComposedScore {
        base,
        marker_count,
        urgency_bonus: bonus,
        raw,
        escalation_score: clamp_score(raw),
    }
}

pub fn clamp_score(raw: u32) -> u8 {
    raw.min(u32::from(MAX_SCORE)) as u8
}

impl ComposedScore {
    pub fn breakdown(&self, settings: &EngineSettings) -> ScoreBreakdown {
        ScoreBreakdown {
            components: vec![
                ScoreComponent {
                    name: "keyword_severity".into(),
                    raw_value: f64::from(self.base),
                    weight: 1.0,
                    weighted_value: f64::from(self.base),
                },
                ScoreComponent {
                    name: "urgency_markers".into(),
                    raw_value: self.marker_count as f64,
                    weight: f64::from(settings.urgency_bonus),
                    weighted_value: f64::from(self.urgency_bonus),
                },
            ],
            total_before_clamp: self.raw,
            fallback_applied: false,
        }
    }
}

/// Breakdown for the fallback bucket. Urgency markers are listed with zero
/// weight: the fixed fallback score replaces them.
pub fn fallback_breakdown(fallback_score: u8, marker_count: usize) -> ScoreBreakdown {
    ScoreBreakdown {
        components: vec![
            ScoreComponent {
                name: "fallback_default".into(),
                raw_value: f64::from(fallback_score),
                weight: 1.0,
                weighted_value: f64::from(fallback_score),
            },
            ScoreComponent {
                name: "urgency_markers".into(),
                raw_value: marker_count as f64,
                weight: 0.0,
                weighted_value: 0.0,
            },
        ],
        total_before_clamp: u32::from(fallback_score),
        fallback_applied: true,
    }
}

/// Sentiment stand-in: `max(-1, -0.1 - score/100)`, two decimals.
///
/// This is a proxy computed from the escalation score. It does no language
/// analysis; a more urgent complaint simply reads as more negative.
pub fn sentiment_proxy(escalation_score: u8) -> f64 {
    let value = (-0.1 - f64::from(escalation_score) / 100.0).max(-1.0);
    (value * 100.0).round() / 100.0
}
