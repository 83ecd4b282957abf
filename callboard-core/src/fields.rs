//! Fallback-chain field resolution for loosely-shaped backend records.
//!
//! The backend returns JSON whose field names vary between endpoints and
//! deployments (`timeStart` vs `time_start`, `colorHex` vs `color`). Each
//! target field has an ordered candidate table; resolution takes the first
//! present, non-null value and never fails; absence degrades to `None`.

use serde_json::Value;

use crate::dates;

/// Candidate fields that can carry an event's calendar date.
/// Time-start fields are included last because ISO datetimes embed the date.
const EVENT_DATE_FIELDS: &[&str] = &[
    "date",
    "eventDate",
    "startDate",
    "dateStart",
    "timeStart",
    "time_start",
];

const EVENT_TIME_START_FIELDS: &[&str] = &["timeStart", "time_start", "startTime", "start_time"];
const EVENT_TIME_END_FIELDS: &[&str] = &["timeEnd", "time_end", "endTime", "end_time"];
const EVENT_TITLE_FIELDS: &[&str] = &["title", "name"];
const EVENT_COLOR_FIELDS: &[&str] = &["colorHex", "color_hex", "color"];

/// First present, non-null candidate field of a record.
///
/// Returns `None` when the record is not an object or no candidate matched.
pub fn resolve_first<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    resolve_in(record.as_object()?, candidates)
}

/// [`resolve_first`] for records already known to be objects.
pub fn resolve_in<'a>(
    map: &'a serde_json::Map<String, Value>,
    candidates: &[&str],
) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|name| map.get(*name).filter(|value| !value.is_null()))
}

/// String form of a JSON scalar. Objects, arrays and booleans have none.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Resolve an event's `YYYY-MM-DD` date key.
///
/// Any candidate whose first 10 characters parse as a calendar date is
/// sliced to that, which covers both plain dates and ISO datetimes.
pub fn event_date_key(event: &Value) -> Option<String> {
    let map = event.as_object()?;

    for name in EVENT_DATE_FIELDS {
        let Some(Value::String(text)) = map.get(*name) else {
            continue;
        };
        let Some(head) = text.get(0..10) else {
            continue;
        };
        if dates::parse_date_key(head).is_some() {
            return Some(head.to_string());
        }
    }

    None
}

/// Normalize a raw time value to `HH:MM` where possible.
///
/// ISO datetimes yield characters 11..16, short time strings their first
/// five characters; bare numbers are stringified. Slices that would split
/// a character degrade to `None` instead of panicking.
pub fn time_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if text.len() >= 5 => {
            if text.contains('T') {
                text.get(11..16).map(str::to_string)
            } else {
                text.get(0..5).map(str::to_string)
            }
        }
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub fn event_time_start(event: &Value) -> Option<String> {
    resolve_first(event, EVENT_TIME_START_FIELDS).and_then(time_of)
}

pub fn event_time_end(event: &Value) -> Option<String> {
    resolve_first(event, EVENT_TIME_END_FIELDS).and_then(time_of)
}

pub fn event_title(event: &Value) -> Option<String> {
    resolve_first(event, EVENT_TITLE_FIELDS).and_then(scalar_string)
}

/// Raw color specifier as entered by an admin; resolved lazily at render
/// time by [`crate::color::to_display_color`].
pub fn event_color(event: &Value) -> Option<String> {
    resolve_first(event, EVENT_COLOR_FIELDS).and_then(scalar_string)
}

pub fn event_id(event: &Value) -> Option<String> {
    resolve_first(event, &["id"]).and_then(scalar_string)
}
