use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// A person on the roster who can be assigned to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_id: Option<String>,
}

/// Recurrence settings for a talk series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub start_date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    /// Weeks between sessions
    pub frequency: u32,
    pub presenters_per_session: u32,
}

impl ScheduleConfig {
    /// Rejects values the generator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.day_of_week > 6 {
            return Err(SchedulerError::InvalidConfig(format!(
                "day_of_week must be between 0 (Sunday) and 6 (Saturday), got {}",
                self.day_of_week
            )));
        }
        if self.frequency < 1 {
            return Err(SchedulerError::InvalidConfig(
                "frequency must be at least 1 week".to_string(),
            ));
        }
        if self.presenters_per_session < 1 {
            return Err(SchedulerError::InvalidConfig(
                "presenters_per_session must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    /// Weekly on Mondays starting today, two presenters per session
    fn default() -> Self {
        Self {
            start_date: chrono::Local::now().date_naive(),
            day_of_week: 1,
            frequency: 1,
            presenters_per_session: 2,
        }
    }
}

/// One generated slot: a date and who presents on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSession {
    pub date: NaiveDate,
    pub presenters: Vec<Participant>,
    pub week_number: u32,
}

/// A generation result kept in the schedule store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSchedule {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub config: ScheduleConfig,
    pub sessions: Vec<ScheduleSession>,
}
