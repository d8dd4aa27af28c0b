use chrono::{Datelike, Days, NaiveDate};

/// Weekday names indexed from Sunday, matching `day_of_week`
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Day of week of `date` counted from Sunday (0) to Saturday (6)
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Moves `start` forward (never backward) to the next date on `target_day`.
/// A date already on the target day is returned unchanged.
/// `None` when the aligned date is past the last representable date.
pub fn align_to_weekday(start: NaiveDate, target_day: u8) -> Option<NaiveDate> {
    let current = day_of_week(start) as u64;
    let offset = (target_day as u64 % 7 + 7 - current) % 7;
    start.checked_add_days(Days::new(offset))
}

/// Date of the session following `date` when sessions are `frequency` weeks apart,
/// or `None` when that date is out of range
pub fn advance_weeks(date: NaiveDate, frequency: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(frequency as u64 * 7))
}
