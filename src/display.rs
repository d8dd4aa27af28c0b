use crate::form::PRESENTER_SEPARATOR;
use crate::schedule::{Participant, ScheduleConfig, ScheduleSession, WEEKDAY_NAMES};

/// Formats a presenter with their slack handle if known
pub fn format_presenter(participant: &Participant) -> String {
    match participant.slack_id.as_deref() {
        Some(slack_id) => format!("{} ({})", participant.name, slack_id),
        None => participant.name.clone(),
    }
}

/// Joins a session's presenters for a single line of output
pub fn format_presenters(presenters: &[Participant]) -> String {
    presenters
        .iter()
        .map(format_presenter)
        .collect::<Vec<_>>()
        .join(format!(" {} ", PRESENTER_SEPARATOR).as_str())
}

/// Describes the recurrence, e.g. "every 2 weeks on Friday, 3 presenter(s) per session"
pub fn describe_config(config: &ScheduleConfig) -> String {
    let day = WEEKDAY_NAMES
        .get(config.day_of_week as usize)
        .copied()
        .unwrap_or("?");
    let every = if config.frequency == 1 {
        "every week".to_string()
    } else {
        format!("every {} weeks", config.frequency)
    };
    format!(
        "{} on {}, {} presenter(s) per session",
        every, day, config.presenters_per_session
    )
}

/// One line per session: date, weekday, week number, presenters
pub fn format_session(session: &ScheduleSession) -> String {
    format!(
        "{} ({}) week {:>3}: {}",
        session.date.format("%Y-%m-%d"),
        session.date.format("%A"),
        session.week_number,
        format_presenters(&session.presenters)
    )
}

/// Prints a generated schedule in a readable format
pub fn print_schedule(config: &ScheduleConfig, sessions: &[ScheduleSession]) {
    println!("\n=== Lightning Talk Schedule ===");
    println!("Starting {}, {}", config.start_date, describe_config(config));
    println!("Total sessions: {}", sessions.len());

    if sessions.is_empty() {
        println!("Nothing to schedule: add participants first.");
        return;
    }

    println!();
    for session in sessions {
        println!("  {}", format_session(session));
    }
}
