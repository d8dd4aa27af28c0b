use thiserror::Error;

/// Errors raised by the scheduler, its stores and the roster parsers
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Invalid schedule config: {0}")]
    InvalidConfig(String),

    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("No saved schedule")]
    ScheduleNotFound,

    /// Raised by callers that refuse to persist an empty generation result
    #[error("Nothing to schedule: {0}")]
    NothingToSchedule(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
