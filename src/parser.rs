use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::form::ParticipantDraft;

/// Splits a bulk import line on commas or tabs
fn split_line(line: &str) -> Vec<&str> {
    line.split([',', '\t']).map(str::trim).collect()
}

/// Parses pasted bulk import text, one participant per line as
/// `name[,slack id]` (comma or tab separated).
/// Blank lines and lines without a name are skipped.
pub fn parse_bulk_participants(text: &str) -> Vec<ParticipantDraft> {
    text.lines()
        .filter_map(|line| {
            let parts = split_line(line);
            let name = parts.first().copied().unwrap_or("");
            if name.is_empty() {
                return None;
            }
            let slack_id = parts
                .get(1)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());
            Some(ParticipantDraft::new(name, slack_id))
        })
        .collect()
}

/// Reads a roster CSV with a header row.
///
/// The name column is the first header containing "name" (falls back to the
/// first column); the slack column is the first header containing "slack", if any.
/// Rows without a name are skipped and repeated names keep their first row.
pub fn read_participants_csv<R: Read>(reader: R) -> Result<Vec<ParticipantDraft>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers()?;
    let name_col = headers
        .iter()
        .position(|h| h.to_lowercase().contains("name"))
        .unwrap_or(0);
    let slack_col = headers.iter().position(|h| h.to_lowercase().contains("slack"));

    let mut seen = HashSet::new();
    let mut drafts = Vec::new();

    for result in reader.records() {
        let record = result?;

        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.clone()) {
            log::debug!("Skipping duplicate roster entry: {}", name);
            continue;
        }

        let slack_id = slack_col
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        drafts.push(ParticipantDraft { name, slack_id });
    }

    Ok(drafts)
}

/// Loads a roster CSV file from disk
pub fn load_participants_csv<P: AsRef<Path>>(csv_path: P) -> Result<Vec<ParticipantDraft>> {
    let file = std::fs::File::open(csv_path)?;
    read_participants_csv(file)
}
