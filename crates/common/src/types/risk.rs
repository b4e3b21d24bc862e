use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity tier derived from the escalation score.
///
/// Variant order is severity order, so `Ord` sorts Low before Critical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    #[serde(alias = "Medium")]
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Step function over the escalation score. Lower bounds are exclusive:
    /// 25 is Low, 26 is Moderate; 50 is Moderate, 51 is High; 75 is High, 76 is Critical.
    pub fn from_score(score: u8) -> Self {
        match score {
            76.. => Self::Critical,
            51..=75 => Self::High,
            26..=50 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::Critical => "Dispatch emergency response team immediately.",
            Self::High => "Prioritize for inspection today.",
            Self::Moderate => "Schedule standard maintenance.",
            Self::Low => "Standard review within SLA.",
        }
    }

    /// Promised maximum resolution time in hours.
    pub fn resolution_hours(&self) -> u32 {
        match self {
            Self::Critical => 4,
            Self::High => 24,
            Self::Moderate => 48,
            Self::Low => 72,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Lowercase priority label used by storage layers.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Moderate => "medium",
            Self::Low => "low",
        }
    }

    /// Parse a stored or legacy label. "Medium" is the legacy name for Moderate.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" | "medium" => Some(Self::Moderate),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(26), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(51), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(76), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critical);
    }

    #[test]
    fn test_step_function_is_monotonic() {
        let mut previous = RiskLevel::from_score(0);
        for score in 1..=100u8 {
            let level = RiskLevel::from_score(score);
            assert!(level >= previous, "risk level dropped at score {}", score);
            previous = level;
        }
    }

    #[test]
    fn test_action_and_sla_table() {
        assert_eq!(RiskLevel::Critical.resolution_hours(), 4);
        assert_eq!(RiskLevel::High.resolution_hours(), 24);
        assert_eq!(RiskLevel::Moderate.resolution_hours(), 48);
        assert_eq!(RiskLevel::Low.resolution_hours(), 72);
        assert_eq!(
            RiskLevel::High.suggested_action(),
            "Prioritize for inspection today."
        );
    }

    #[test]
    fn test_legacy_labels() {
        assert_eq!(RiskLevel::from_label("Medium"), Some(RiskLevel::Moderate));
        assert_eq!(RiskLevel::from_label("critical"), Some(RiskLevel::Critical));
        assert_eq!(RiskLevel::from_label("severe"), None);
        let level: RiskLevel = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(level, RiskLevel::Moderate);
        assert_eq!(RiskLevel::Moderate.as_db_str(), "medium");
    }
}
