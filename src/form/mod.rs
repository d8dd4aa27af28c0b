pub mod submission;
pub mod export;

pub use submission::{validate_draft, BulkImportRequest, GenerateRequest, ParticipantDraft};
pub use export::{export_file_name, schedule_csv_bytes, write_schedule_csv, PRESENTER_SEPARATOR};
