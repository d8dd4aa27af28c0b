//! Participant, config and schedule stores.
//!
//! Everything lives in memory behind one mutex. When opened with a file path
//! the whole state is rewritten as a JSON document after every change and
//! loaded again on start-up.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::form::{validate_draft, ParticipantDraft};
use crate::schedule::{Participant, SavedSchedule, ScheduleConfig, ScheduleSession};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct StoreData {
    participants: Vec<Participant>,
    config: Option<ScheduleConfig>,
    schedules: Vec<SavedSchedule>,
    /// Bumped for every issued id, never decremented
    next_sequence: u64,
}

impl StoreData {
    /// Issues an id of the form `{timestamp_ms}-{sequence:04}`
    fn issue_id(&mut self) -> String {
        self.next_sequence += 1;
        format!("{}-{:04}", Utc::now().timestamp_millis(), self.next_sequence)
    }

    fn participant_mut(&mut self, id: &str) -> Result<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| SchedulerError::ParticipantNotFound(id.to_string()))
    }
}

pub struct Store {
    data: Mutex<StoreData>,
    path: Option<PathBuf>,
}

impl Store {
    /// A store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            data: Mutex::new(StoreData::default()),
            path: None,
        }
    }

    /// Opens a file-backed store, starting empty if the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let data: StoreData = serde_json::from_reader(reader)?;
            log::info!(
                "Loaded {} participants and {} saved schedules from {}",
                data.participants.len(),
                data.schedules.len(),
                path.display()
            );
            data
        } else {
            log::info!("No data file at {}, starting empty", path.display());
            StoreData::default()
        };

        Ok(Self {
            data: Mutex::new(data),
            path: Some(path),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreData>> {
        self.data
            .lock()
            .map_err(|e| SchedulerError::Storage(e.to_string()))
    }

    /// Writes a temporary sibling first, then renames it over the data file
    fn persist(&self, data: &StoreData) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        let write = || -> Result<()> {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, data)?;
            writer.flush()?;
            fs::rename(&tmp_path, path)?;
            Ok(())
        };

        write().inspect_err(|e| log::error!("Failed to persist store to {}: {}", path.display(), e))
    }

    /// Applies `change` to a copy of the data and swaps the copy in only once
    /// it has been persisted. A failed change or write leaves the store untouched.
    fn commit<T>(&self, change: impl FnOnce(&mut StoreData) -> Result<T>) -> Result<T> {
        let mut data = self.lock()?;
        let mut next = data.clone();
        let value = change(&mut next)?;
        self.persist(&next)?;
        *data = next;
        Ok(value)
    }

    pub fn list_participants(&self) -> Result<Vec<Participant>> {
        Ok(self.lock()?.participants.clone())
    }

    pub fn participant_count(&self) -> Result<usize> {
        Ok(self.lock()?.participants.len())
    }

    pub fn add_participant(&self, draft: &ParticipantDraft) -> Result<Participant> {
        let draft = validate_draft(draft)?;

        let participant = self.commit(|data| {
            let participant = Participant {
                id: data.issue_id(),
                name: draft.name,
                slack_id: draft.slack_id,
            };
            data.participants.push(participant.clone());
            Ok(participant)
        })?;

        log::info!("Added participant {} ({})", participant.name, participant.id);
        Ok(participant)
    }

    /// Adds every draft or none of them
    pub fn bulk_add_participants(&self, drafts: &[ParticipantDraft]) -> Result<Vec<Participant>> {
        let drafts = drafts
            .iter()
            .map(validate_draft)
            .collect::<Result<Vec<_>>>()?;

        let added = self.commit(|data| {
            let mut added = Vec::with_capacity(drafts.len());
            for draft in drafts {
                let participant = Participant {
                    id: data.issue_id(),
                    name: draft.name,
                    slack_id: draft.slack_id,
                };
                data.participants.push(participant.clone());
                added.push(participant);
            }
            Ok(added)
        })?;

        log::info!("Bulk added {} participants", added.len());
        Ok(added)
    }

    pub fn update_participant(&self, id: &str, draft: &ParticipantDraft) -> Result<Participant> {
        let draft = validate_draft(draft)?;

        let updated = self.commit(|data| {
            let participant = data.participant_mut(id)?;
            participant.name = draft.name;
            participant.slack_id = draft.slack_id;
            Ok(participant.clone())
        })?;

        log::info!("Updated participant {}", id);
        Ok(updated)
    }

    pub fn delete_participant(&self, id: &str) -> Result<()> {
        self.commit(|data| {
            let before = data.participants.len();
            data.participants.retain(|p| p.id != id);
            if data.participants.len() == before {
                return Err(SchedulerError::ParticipantNotFound(id.to_string()));
            }
            Ok(())
        })?;

        log::info!("Deleted participant {}", id);
        Ok(())
    }

    pub fn get_config(&self) -> Result<Option<ScheduleConfig>> {
        Ok(self.lock()?.config.clone())
    }

    pub fn set_config(&self, config: ScheduleConfig) -> Result<ScheduleConfig> {
        config.validate()?;
        self.commit(|data| {
            data.config = Some(config.clone());
            Ok(())
        })?;

        log::info!(
            "Config set: start {}, day {}, every {} week(s), {} presenter(s)",
            config.start_date,
            config.day_of_week,
            config.frequency,
            config.presenters_per_session
        );
        Ok(config)
    }

    pub fn save_schedule(
        &self,
        name: &str,
        config: &ScheduleConfig,
        sessions: Vec<ScheduleSession>,
    ) -> Result<SavedSchedule> {
        let saved = self.commit(|data| {
            let saved = SavedSchedule {
                id: data.issue_id(),
                name: name.to_string(),
                created_at: Utc::now(),
                config: config.clone(),
                sessions,
            };
            data.schedules.push(saved.clone());
            Ok(saved)
        })?;

        log::info!("Saved schedule '{}' with {} sessions", saved.name, saved.sessions.len());
        Ok(saved)
    }

    pub fn get_schedule(&self, id: &str) -> Result<SavedSchedule> {
        self.lock()?
            .schedules
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(SchedulerError::ScheduleNotFound)
    }

    pub fn delete_schedule(&self, id: &str) -> Result<()> {
        self.commit(|data| {
            let before = data.schedules.len();
            data.schedules.retain(|s| s.id != id);
            if data.schedules.len() == before {
                return Err(SchedulerError::ScheduleNotFound);
            }
            Ok(())
        })?;

        log::info!("Deleted schedule {}", id);
        Ok(())
    }

    /// Most recently saved schedule
    pub fn latest_schedule(&self) -> Result<Option<SavedSchedule>> {
        Ok(self.lock()?.schedules.last().cloned())
    }

    /// Saved schedules, newest first
    pub fn list_schedules(&self) -> Result<Vec<SavedSchedule>> {
        Ok(self.lock()?.schedules.iter().rev().cloned().collect())
    }

    /// Drops participants, config and schedules. Issued ids stay retired.
    pub fn clear_all(&self) -> Result<()> {
        self.commit(|data| {
            data.participants.clear();
            data.config = None;
            data.schedules.clear();
            Ok(())
        })?;

        log::info!("Cleared all data");
        Ok(())
    }
}
