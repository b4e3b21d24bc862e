use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::AnalysisResult;
use crate::ids::ComplaintId;

/// Complaint lifecycle as shown to citizens and officers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    /// Map a storage-layer status onto the displayed lifecycle.
    /// Unknown values read as Open.
    pub fn from_db_str(status: &str) -> Self {
        match status {
            "in_progress" | "escalated" => Self::InProgress,
            "resolved" => Self::Resolved,
            _ => Self::Open,
        }
    }

    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Open => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// Where the citizen reported the issue. Always supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A submitted complaint (docket) with its embedded analysis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    /// Short citizen-facing tracking number.
    pub docket_id: String,
    pub citizen_id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: ComplaintStatus,
    pub analysis: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Complaint {
    pub fn new(citizen_id: String, description: String, analysis: AnalysisResult) -> Self {
        let id = ComplaintId::new();
        Self {
            docket_id: id.docket(),
            id,
            citizen_id,
            description,
            location: None,
            photo_url: None,
            created_at: Utc::now(),
            status: ComplaintStatus::Open,
            analysis,
            resolution_notes: None,
            resolved_at: None,
        }
    }

    /// Close the complaint with the officer's notes.
    pub fn resolve(&mut self, notes: String) {
        self.status = ComplaintStatus::Resolved;
        self.resolution_notes = Some(notes);
        self.resolved_at = Some(Utc::now());
    }
}
