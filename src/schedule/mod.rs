pub mod types;
pub mod dates;
pub mod shuffle;
pub mod generator;

pub use types::{Participant, SavedSchedule, ScheduleConfig, ScheduleSession};
pub use dates::WEEKDAY_NAMES;
pub use generator::{generate_schedule, generate_schedule_with_rng};
