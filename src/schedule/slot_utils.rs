use chrono::{NaiveTime, Weekday};
use super::types::TimeSlot;

/// Clock format used for both input and output, e.g. "09:00 AM"
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Separator between start and end inside a time slot field
pub const SLOT_SEPARATOR: &str = " - ";

/// Two slots conflict when they fall on the same day and their [start, end) ranges overlap.
/// Identical slots always conflict.
pub fn slots_conflict(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.week_day() == b.week_day() && a.start_time() < b.end_time() && b.start_time() < a.end_time()
}

/// Two slots are adjacent when they share a day and one ends exactly when the other starts
pub fn slots_adjacent(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.week_day() == b.week_day() && (a.end_time() == b.start_time() || b.end_time() == a.start_time())
}

/// Full English day name, as written in the input files
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Formats the time range of a slot as "09:00 AM - 10:00 AM"
pub fn format_time_range(slot: &TimeSlot) -> String {
    format!("{}{}{}", format_time(slot.start_time()), SLOT_SEPARATOR, format_time(slot.end_time()))
}
