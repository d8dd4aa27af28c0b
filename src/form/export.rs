use std::io::Write;

use chrono::NaiveDate;
use csv::WriterBuilder;

use crate::error::Result;
use crate::schedule::ScheduleSession;

/// Separator used between several presenters in one cell
pub const PRESENTER_SEPARATOR: &str = "・";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes one CSV row per session: date, week number, presenter names, slack ids.
/// The output starts with a UTF-8 BOM.
pub fn write_schedule_csv<W: Write>(mut writer: W, sessions: &[ScheduleSession]) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["date", "week_number", "presenters", "slack_ids"])?;

    for session in sessions {
        let names: Vec<&str> = session.presenters.iter().map(|p| p.name.as_str()).collect();
        let slack_ids: Vec<&str> = session
            .presenters
            .iter()
            .map(|p| p.slack_id.as_deref().unwrap_or(""))
            .collect();

        wtr.write_record([
            session.date.format("%Y-%m-%d").to_string(),
            session.week_number.to_string(),
            names.join(PRESENTER_SEPARATOR),
            slack_ids.join(PRESENTER_SEPARATOR),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Renders the schedule CSV into memory
pub fn schedule_csv_bytes(sessions: &[ScheduleSession]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_schedule_csv(&mut buf, sessions)?;
    Ok(buf)
}

/// Download file name for an export made on `today`
pub fn export_file_name(today: NaiveDate) -> String {
    format!("LT_Schedule_{}.csv", today.format("%Y-%m-%d"))
}
