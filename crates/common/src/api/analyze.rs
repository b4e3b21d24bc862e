use serde::{Deserialize, Serialize};

/// POST /analyze request. Responses are the bare `AnalysisResult` JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Free-text complaint description. Must not be blank.
    pub complaint: String,
}
