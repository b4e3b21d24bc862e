use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{AnalysisResult, Department, GeoPoint};

/// POST /complaints request: citizen submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitComplaintRequest {
    pub citizen_id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// POST /complaints response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitComplaintResponse {
    pub docket_id: String,
    pub analysis: AnalysisResult,
}

/// Queue ordering for GET /complaints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintSort {
    /// Most recent first.
    #[default]
    Newest,
    /// Highest escalation score first, then most recent.
    Priority,
}

/// GET /complaints query parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ComplaintQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizen_id: Option<String>,
    /// Case-insensitive department name; an empty value means no filter.
    #[serde(
        default,
        deserialize_with = "department_param",
        skip_serializing_if = "Option::is_none"
    )]
    pub department: Option<Department>,
    /// `Some(false)` lists the open queue, `Some(true)` the resolved archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    #[serde(default)]
    pub sort: ComplaintSort,
}

fn department_param<'de, D>(deserializer: D) -> Result<Option<Department>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// POST /complaints/{docket}/resolve request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolveComplaintRequest {
    pub notes: String,
}
