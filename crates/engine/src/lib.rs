//! Grievance classification engine.
//!
//! Routes free-text civic complaints to a department and derives a priority:
//! keyword rules pick the department and base severity, urgency markers add a
//! bonus, and the clamped escalation score selects the risk tier, suggested
//! action and SLA hours.

pub mod circuit_breaker;
pub mod classifier;
pub mod config;
pub mod remote;
pub mod rules;
pub mod scoring;
pub mod summary;
pub mod urgency;

pub use classifier::Classifier;
pub use remote::RemoteAnalyzer;
pub use rules::{KeywordRule, RuleSet};
