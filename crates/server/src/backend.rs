use grievance_common::types::AnalysisResult;
use grievance_common::Result;
use grievance_engine::{Classifier, RemoteAnalyzer};

/// Where intake gets its analyses from.
pub enum AnalysisBackend {
    /// The engine running in this process.
    Local(Classifier),
    /// Another analysis service reached over HTTP.
    Remote(RemoteAnalyzer),
}

impl AnalysisBackend {
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        match self {
            Self::Local(classifier) => classifier.analyze(text),
            Self::Remote(client) => client.analyze(text).await,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Remote(_) => "remote",
        }
    }
}
