use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by interview operations.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Session '{0}' not found")]
    NotFound(Uuid),
    #[error("Session '{0}' already exists")]
    DuplicateSession(Uuid),
    /// A compare-and-update lost a race with another writer.
    #[error("Session '{0}' was modified concurrently")]
    Conflict(Uuid),
    #[error("Session '{0}' has no question awaiting an answer")]
    NoActiveQuestion(Uuid),
    #[error("Question generation failed: {0}")]
    GenerationFailure(String),
    #[error("Answer evaluation failed: {0}")]
    EvaluationFailure(String),
    #[error("Session '{id}' is corrupt: {reason}")]
    CorruptSession { id: Uuid, reason: String },
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T, E = InterviewError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            InterviewError::NotFound(id).to_string(),
            "Session '550e8400-e29b-41d4-a716-446655440000' not found"
        );
        assert_eq!(
            InterviewError::GenerationFailure("empty response".to_string()).to_string(),
            "Question generation failed: empty response"
        );
        let corrupt = InterviewError::CorruptSession {
            id,
            reason: "question_index 9 exceeds question count 6".to_string(),
        };
        assert!(corrupt.to_string().ends_with("question count 6"));
    }

    #[test]
    fn test_storage_error_from_anyhow() {
        let err: InterviewError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(err, InterviewError::Storage(_)));
        assert_eq!(err.to_string(), "Storage error: connection reset");
    }
}
