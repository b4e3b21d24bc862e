//! Keyword rule table: lowercase phrase → (department, base score, sub-category).

use grievance_common::config::{ClassifierConfig, FallbackConfig, KeywordRuleConfig};
use grievance_common::types::Department;

/// A single routing rule. Matches when `keyword` occurs anywhere in the
/// lowercased complaint text, including inside longer words.
#[derive(Clone, Debug, PartialEq)]
pub struct KeywordRule {
    pub keyword: String,
    pub department: Department,
    /// 0..=100.
    pub base_score: u8,
    pub sub_category: String,
}

impl From<&KeywordRuleConfig> for KeywordRule {
    fn from(c: &KeywordRuleConfig) -> Self {
        Self {
            keyword: c.keyword.to_lowercase(),
            department: c.department,
            base_score: c.base_score,
            sub_category: c.sub_category.clone(),
        }
    }
}

// ── Built-in table ──────────────────────────────────────────────────

struct BuiltinRule {
    keyword: &'static str,
    department: Department,
    base_score: u8,
    sub_category: &'static str,
}

const fn rule(
    keyword: &'static str,
    department: Department,
    base_score: u8,
    sub_category: &'static str,
) -> BuiltinRule {
    BuiltinRule {
        keyword,
        department,
        base_score,
        sub_category,
    }
}

static BUILTIN_RULES: &[BuiltinRule] = &[
    // Electricity
    rule("live wire", Department::Electricity, 85, "Live Wire Danger"),
    rule("electrocut", Department::Electricity, 90, "Electrocution Hazard"),
    rule("transformer", Department::Electricity, 70, "Transformer Fault"),
    rule("power outage", Department::Electricity, 50, "Power Outage"),
    rule("power cut", Department::Electricity, 50, "Power Outage"),
    rule("no electricity", Department::Electricity, 50, "Power Outage"),
    rule("streetlight", Department::Electricity, 45, "Streetlight Outage"),
    rule("street light", Department::Electricity, 45, "Streetlight Outage"),
    rule("wire", Department::Electricity, 60, "Exposed Wiring"),
    // Water
    rule("contaminated", Department::Water, 85, "Contamination"),
    rule("pipe burst", Department::Water, 70, "Pipeline Burst"),
    rule("burst pipe", Department::Water, 70, "Pipeline Burst"),
    rule("flooding", Department::Water, 65, "Waterlogging"),
    rule("no water", Department::Water, 60, "Supply Disruption"),
    rule("water leak", Department::Water, 55, "Water Leakage"),
    rule("drainage", Department::Water, 45, "Drainage Blockage"),
    rule("low pressure", Department::Water, 30, "Low Pressure"),
    // Roads
    rule("accident", Department::Roads, 70, "Road Accident"),
    rule("traffic signal", Department::Roads, 60, "Signal Failure"),
    rule("fallen tree", Department::Roads, 50, "Obstruction"),
    rule("road damage", Department::Roads, 40, "Road Damage"),
    rule("broken road", Department::Roads, 40, "Road Damage"),
    rule("pothole", Department::Roads, 35, "Pothole"),
    // Sanitation
    rule("sewage", Department::Sanitation, 75, "Sewage Leak"),
    rule("open drain", Department::Sanitation, 50, "Open Drain"),
    rule("dead animal", Department::Sanitation, 45, "Carcass Removal"),
    rule("garbage", Department::Sanitation, 40, "Uncollected Garbage"),
    rule("trash", Department::Sanitation, 40, "Uncollected Garbage"),
    rule("stray dog", Department::Sanitation, 30, "Animal Control"),
    rule("littering", Department::Sanitation, 25, "Littering"),
    // Public safety
    rule("gas leak", Department::PublicSafety, 95, "Gas Leak"),
    rule("fire", Department::PublicSafety, 90, "Fire Hazard"),
    rule("collapse", Department::PublicSafety, 90, "Structural Collapse"),
    rule("harassment", Department::PublicSafety, 70, "Harassment"),
    rule("theft", Department::PublicSafety, 60, "Theft"),
    rule("unsafe", Department::PublicSafety, 55, "Unsafe Area"),
];

static BUILTIN_URGENCY_MARKERS: &[&str] = &[
    "urgent",
    "emergency",
    "immediately",
    "danger",
    "help",
    "asap",
    "hazard",
    "critical",
];

// ── Rule set ────────────────────────────────────────────────────────

/// Read-only routing configuration shared by every classification call.
#[derive(Clone, Debug)]
pub struct RuleSet {
    rules: Vec<KeywordRule>,
    urgency_markers: Vec<String>,
    fallback: FallbackConfig,
}

impl RuleSet {
    /// Build a rule set. Keywords and markers are lowercased; table order is kept.
    pub fn new(
        rules: Vec<KeywordRule>,
        urgency_markers: Vec<String>,
        fallback: FallbackConfig,
    ) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|r| KeywordRule {
                    keyword: r.keyword.to_lowercase(),
                    ..r
                })
                .collect(),
            urgency_markers: urgency_markers
                .into_iter()
                .map(|m| m.to_lowercase())
                .collect(),
            fallback,
        }
    }

    /// The table shipped with the engine.
    pub fn builtin() -> Self {
        Self::new(
            builtin_rules(),
            builtin_urgency_markers(),
            FallbackConfig::default(),
        )
    }

    /// Build from configuration; an empty `rules` or `urgency_markers` list
    /// falls back to the built-in one.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let rules = if config.rules.is_empty() {
            builtin_rules()
        } else {
            config.rules.iter().map(KeywordRule::from).collect()
        };
        let markers = if config.urgency_markers.is_empty() {
            builtin_urgency_markers()
        } else {
            config.urgency_markers.clone()
        };
        Self::new(rules, markers, config.fallback.clone())
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn urgency_markers(&self) -> &[String] {
        &self.urgency_markers
    }

    pub fn fallback(&self) -> &FallbackConfig {
        &self.fallback
    }

    /// Rules whose keyword occurs in `lowered`, in table order.
    /// `lowered` must already be lowercase.
    pub fn matching<'s, 't>(
        &'s self,
        lowered: &'t str,
    ) -> impl Iterator<Item = &'s KeywordRule> + 't
    where
        's: 't,
    {
        self.rules
            .iter()
            .filter(move |r| lowered.contains(r.keyword.as_str()))
    }

    /// The matching rule with the highest base score.
    ///
    /// Only a strictly greater score replaces the current best, so on a tie
    /// the rule listed first in the table wins.
    pub fn strongest_match(&self, lowered: &str) -> Option<&KeywordRule> {
        self.rules
            .iter()
            .filter(|r| lowered.contains(r.keyword.as_str()))
            .fold(None, |best: Option<&KeywordRule>, candidate| match best {
                Some(current) if candidate.base_score <= current.base_score => Some(current),
                _ => Some(candidate),
            })
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_rules() -> Vec<KeywordRule> {
    BUILTIN_RULES
        .iter()
        .map(|r| KeywordRule {
            keyword: r.keyword.to_string(),
            department: r.department,
            base_score: r.base_score,
            sub_category: r.sub_category.to_string(),
        })
        .collect()
}

fn builtin_urgency_markers() -> Vec<String> {
    BUILTIN_URGENCY_MARKERS.iter().map(|m| m.to_string()).collect()
}
