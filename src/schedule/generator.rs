use rand::Rng;

use crate::error::{Result, SchedulerError};
use super::dates::{advance_weeks, align_to_weekday};
use super::shuffle::shuffled;
use super::types::{Participant, ScheduleConfig, ScheduleSession};

fn out_of_range(reason: &str) -> SchedulerError {
    SchedulerError::InvalidConfig(format!("{}: frequency or start_date too large", reason))
}

/// Generates a rotation where every participant presents exactly once,
/// shuffling with the thread-local RNG
pub fn generate_schedule(
    participants: &[Participant],
    config: Option<&ScheduleConfig>,
) -> Result<Vec<ScheduleSession>> {
    generate_schedule_with_rng(participants, config, &mut rand::thread_rng())
}

/// Generates a rotation using the given random source for the presenter order.
///
/// Missing config or an empty roster yield an empty schedule. Sessions fall on
/// `config.day_of_week`, the first one on or after `config.start_date`, and are
/// `frequency` weeks apart. The last session may hold fewer presenters than
/// `presenters_per_session`.
pub fn generate_schedule_with_rng<R: Rng + ?Sized>(
    participants: &[Participant],
    config: Option<&ScheduleConfig>,
    rng: &mut R,
) -> Result<Vec<ScheduleSession>> {
    let config = match config {
        Some(config) if !participants.is_empty() => config,
        _ => return Ok(Vec::new()),
    };
    config.validate()?;

    let order = shuffled(participants, rng);

    let session_count = order.len().div_ceil(config.presenters_per_session as usize);
    let mut sessions = Vec::with_capacity(session_count);
    let mut current_date = align_to_weekday(config.start_date, config.day_of_week)
        .ok_or_else(|| out_of_range("start_date cannot be aligned to day_of_week"))?;
    let mut week_number = 1u32;

    for (index, presenters) in order.chunks(config.presenters_per_session as usize).enumerate() {
        if index > 0 {
            current_date = advance_weeks(current_date, config.frequency)
                .ok_or_else(|| out_of_range("session dates run past the supported calendar range"))?;
            week_number = week_number
                .checked_add(config.frequency)
                .ok_or_else(|| out_of_range("week numbers overflow"))?;
        }
        sessions.push(ScheduleSession {
            date: current_date,
            presenters: presenters.to_vec(),
            week_number,
        });
    }

    if let Some(first) = sessions.first() {
        log::debug!(
            "Generated {} sessions for {} participants (first: {}, every {} week(s))",
            sessions.len(),
            participants.len(),
            first.date,
            config.frequency
        );
    }

    Ok(sessions)
}
