use serde::{Deserialize, Serialize};

use super::department::Department;
use super::risk::RiskLevel;

/// Structured analysis of a single complaint.
///
/// Created once per submission and embedded verbatim in the stored complaint.
/// Re-analysing edited text produces a new value; this one is never updated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub department: Department,
    pub sub_category: String,
    pub risk_level: RiskLevel,
    /// 0..=100, clamped.
    pub escalation_score: u8,
    /// In [-1, 0]. Derived from the escalation score, not from language analysis.
    pub sentiment_score: f64,
    /// Department keywords first, then urgency markers. At most four entries.
    pub matched_keywords: Vec<String>,
    pub summary: String,
    pub suggested_action: String,
    pub estimated_resolution_hours: u32,
}

/// One weighted input to the escalation score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub name: String,
    pub raw_value: f64,
    pub weight: f64,
    pub weighted_value: f64,
}

/// How the escalation score was reached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    /// Sum of weighted components before clamping to 100.
    pub total_before_clamp: u32,
    /// True when no department keyword matched and the fallback bucket was used.
    pub fallback_applied: bool,
}

/// Analysis plus its score breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub analysis: AnalysisResult,
    pub breakdown: ScoreBreakdown,
}

/// Flat analysis shape still read by older dashboard code and stored records.
///
/// Differs from [`AnalysisResult`] in field names (`category`, `keywords`) and
/// in carrying the department as free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAnalysis {
    pub category: String,
    pub sub_category: String,
    pub risk_level: String,
    pub escalation_score: u8,
    pub sentiment_score: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub summary: String,
    pub suggested_action: String,
    pub estimated_resolution_hours: u32,
}

impl From<&AnalysisResult> for LegacyAnalysis {
    fn from(a: &AnalysisResult) -> Self {
        Self {
            category: a.department.as_str().to_string(),
            sub_category: a.sub_category.clone(),
            risk_level: a.risk_level.as_str().to_string(),
            escalation_score: a.escalation_score,
            sentiment_score: a.sentiment_score,
            keywords: a.matched_keywords.clone(),
            summary: a.summary.clone(),
            suggested_action: a.suggested_action.clone(),
            estimated_resolution_hours: a.estimated_resolution_hours,
        }
    }
}

impl From<LegacyAnalysis> for AnalysisResult {
    /// Unknown categories become `Unassigned`. An unreadable risk label is
    /// re-derived from the escalation score. Stored action and SLA are kept as-is.
    fn from(l: LegacyAnalysis) -> Self {
        let escalation_score = l.escalation_score.min(100);
        let risk_level = RiskLevel::from_label(&l.risk_level)
            .unwrap_or_else(|| RiskLevel::from_score(escalation_score));

        Self {
            department: Department::from_category(&l.category),
            sub_category: l.sub_category,
            risk_level,
            escalation_score,
            sentiment_score: l.sentiment_score.clamp(-1.0, 0.0),
            matched_keywords: l.keywords,
            summary: l.summary,
            suggested_action: l.suggested_action,
            estimated_resolution_hours: l.estimated_resolution_hours,
        }
    }
}
