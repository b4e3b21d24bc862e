use thiserror::Error;

/// Top-level error type for grievance classification and intake.
#[derive(Debug, Error)]
pub enum GrievanceError {
    // --- Caller errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // --- Remote analysis backend errors ---
    #[error("Analysis backend unreachable: {0}")]
    UnreachableRemote(String),

    #[error("Analysis backend rejected request ({status}): {detail}")]
    RemoteRejected { status: u16, detail: String },

    #[error("Circuit breaker open for {0}")]
    CircuitOpen(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    // --- Operational errors ---
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl GrievanceError {
    /// Whether the failure is transient and the submission may be retried later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::UnreachableRemote(_) | Self::Timeout(_) | Self::CircuitOpen(_)
        )
    }

    /// Whether the caller sent something the system cannot act on.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound(_))
    }
}

/// Result type alias for grievance operations.
pub type Result<T> = std::result::Result<T, GrievanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(GrievanceError::UnreachableRemote("refused".into()).is_transient());
        assert!(GrievanceError::CircuitOpen("analyzer".into()).is_transient());
        assert!(!GrievanceError::InvalidInput("empty".into()).is_transient());

        assert!(GrievanceError::InvalidInput("empty".into()).is_caller_fault());
        assert!(!GrievanceError::Config("bad".into()).is_caller_fault());
    }

    #[test]
    fn test_remote_rejected_message() {
        let err = GrievanceError::RemoteRejected {
            status: 422,
            detail: "complaint must not be empty".into(),
        };
        assert_eq!(
            err.to_string(),
            "Analysis backend rejected request (422): complaint must not be empty"
        );
    }
}
