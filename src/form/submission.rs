use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Participant data as entered in the add/edit form or a bulk import line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDraft {
    pub name: String,
    #[serde(default)]
    pub slack_id: Option<String>,
}

impl ParticipantDraft {
    pub fn new(name: impl Into<String>, slack_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            slack_id,
        }
    }
}

/// Bulk import request from frontend: one "name,slack id" per line
#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    pub text: String,
}

/// Generate request from frontend
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Validates a draft and returns it with whitespace trimmed and
/// blank slack ids dropped
pub fn validate_draft(draft: &ParticipantDraft) -> Result<ParticipantDraft> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(SchedulerError::InvalidParticipant("Name is required".to_string()));
    }

    let slack_id = draft
        .slack_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(ParticipantDraft {
        name: name.to_string(),
        slack_id,
    })
}
