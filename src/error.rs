//! Error types for CRM contact operations.
//!
//! Remote calls fail with a [`RemoteFailure`], which carries the transport's
//! message and its implementation-defined code. [`CrmError`] wraps that failure
//! together with the decoding problems that can occur once a record has been
//! fetched successfully.

/// Failure reported by a [`CrmGateway`](crate::gateway::CrmGateway) operation.
///
/// Covers everything the transport can go wrong with: network, authentication,
/// malformed requests or missing records. The code is whatever the transport
/// reports (usually the HTTP status).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct RemoteFailure {
    /// Human readable message from the remote system
    pub message: String,
    /// Implementation-defined failure code
    pub code: i64,
}

impl RemoteFailure {
    /// Create a new remote failure.
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Failure used when the remote system has no record with the given id.
    pub fn not_found(object_type: &str, id: &str) -> Self {
        Self::new(
            format!("Provided external ID field does not exist or is not accessible: {object_type}/{id}"),
            404,
        )
    }
}

/// Main error type for contact reads and record decoding.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    /// The gateway reported a failure
    #[error("Remote failure: {0}")]
    Remote(#[from] RemoteFailure),

    /// A record was returned but does not have the expected shape
    #[error("Malformed {object_type} record: {message}")]
    MalformedRecord {
        object_type: String,
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrmError {
    /// Create a malformed record error.
    pub fn malformed(object_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            object_type: object_type.into(),
            message: message.into(),
        }
    }

    /// The remote error code, when the error came from the gateway.
    pub fn code(&self) -> Option<i64> {
        match self {
            CrmError::Remote(failure) => Some(failure.code),
            _ => None,
        }
    }
}

/// Result type for gateway operations.
pub type RemoteResult<T> = Result<T, RemoteFailure>;

/// Result type for crate operations that decode remote records.
pub type CrmResult<T> = Result<T, CrmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_failure_display() {
        let failure = RemoteFailure::new("Session expired or invalid", 401);
        assert_eq!(failure.to_string(), "Session expired or invalid (code 401)");
    }

    #[test]
    fn test_crm_error_code() {
        let error = CrmError::from(RemoteFailure::not_found("Contact", "003XX"));
        assert_eq!(error.code(), Some(404));
        assert!(error.to_string().starts_with("Remote failure:"));

        let malformed = CrmError::malformed("Contact", "missing Id");
        assert_eq!(malformed.code(), None);
        assert_eq!(malformed.to_string(), "Malformed Contact record: missing Id");
    }
}
