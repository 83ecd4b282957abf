//! The date→stage→events index that every calendar view reads from.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::fields;
use crate::stage;

/// Title used when an event has no resolvable name.
pub const UNTITLED_EVENT_LABEL: &str = "Без названия";

/// An event normalized for rendering. `raw` keeps the original backend
/// record for fields the view-model does not promote (participants,
/// status, production).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEvent {
    /// Unique within its (date, stage) bucket; synthesized from position
    /// when the backend sends no id.
    pub id: String,
    pub title: String,
    /// `HH:MM`, when a start time could be resolved.
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    /// Raw color specifier; resolved at render time.
    pub color: Option<String>,
    /// `YYYY-MM-DD`.
    pub date_key: String,
    pub stage_key: String,
    pub raw: Value,
}

/// Two-level mapping: date key → stage key → events ordered by start time.
///
/// BTreeMap keys make iteration deterministic and put dates in calendar
/// order, which is exactly how views consume the index.
pub type DateStageIndex = BTreeMap<String, BTreeMap<String, Vec<ScheduleEvent>>>;

/// Index raw events by date and stage.
///
/// Events whose date or stage cannot be resolved are dropped without
/// error: an event the calendar cannot place is an event the calendar
/// cannot show. Buckets are sorted ascending by `time_start`; the zero-
/// padded `HH:MM` format makes lexicographic comparison correct, and a
/// missing time compares as the empty string, sorting first.
pub fn build_events_index(events: &[Value]) -> DateStageIndex {
    let mut index = DateStageIndex::new();

    for event in events {
        let Some(date_key) = fields::event_date_key(event) else {
            continue;
        };
        let Some(stage_key) = stage::event_stage_key(event) else {
            continue;
        };

        let bucket = index
            .entry(date_key.clone())
            .or_default()
            .entry(stage_key.clone())
            .or_default();

        let id = fields::event_id(event)
            .unwrap_or_else(|| format!("{date_key}-{stage_key}-{}", bucket.len()));

        bucket.push(ScheduleEvent {
            id,
            title: fields::event_title(event)
                .unwrap_or_else(|| UNTITLED_EVENT_LABEL.to_string()),
            time_start: fields::event_time_start(event),
            time_end: fields::event_time_end(event),
            color: fields::event_color(event),
            date_key,
            stage_key,
            raw: event.clone(),
        });
    }

    for stages in index.values_mut() {
        for bucket in stages.values_mut() {
            // sort_by is stable, so equal times keep insertion order.
            bucket.sort_by(|a, b| {
                let left = a.time_start.as_deref().unwrap_or("");
                let right = b.time_start.as_deref().unwrap_or("");
                left.cmp(right)
            });
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bucket<'a>(
        index: &'a DateStageIndex,
        date: &str,
        stage: &str,
    ) -> &'a Vec<ScheduleEvent> {
        &index[date][stage]
    }

    #[test]
    fn test_buckets_sorted_by_time_start() {
        let events = vec![
            json!({ "date": "2024-05-10", "stageId": 3, "timeStart": "12:00", "timeEnd": "13:00", "title": "A" }),
            json!({ "date": "2024-05-10", "stageId": 3, "timeStart": "09:00", "timeEnd": "10:00", "title": "B" }),
        ];

        let index = build_events_index(&events);
        let bucket = bucket(&index, "2024-05-10", "3");
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket[0].title, "B");
        assert_eq!(bucket[0].time_start.as_deref(), Some("09:00"));
        assert_eq!(bucket[1].title, "A");
        assert_eq!(bucket[1].time_start.as_deref(), Some("12:00"));
    }

    #[test]
    fn test_events_without_start_time_sort_first() {
        let events = vec![
            json!({ "date": "2024-05-10", "stageId": 1, "timeStart": "08:00", "title": "timed" }),
            json!({ "date": "2024-05-10", "stageId": 1, "title": "all-day" }),
        ];

        let index = build_events_index(&events);
        let bucket = bucket(&index, "2024-05-10", "1");
        assert_eq!(bucket[0].title, "all-day");
        assert_eq!(bucket[0].time_start, None);
        assert_eq!(bucket[1].title, "timed");
    }

    #[test]
    fn test_unplaceable_events_dropped_silently() {
        let events = vec![
            json!({ "stageId": 1, "title": "no date" }),
            json!({ "date": "2024-05-10", "title": "no stage" }),
            json!({ "date": "2024-05-10", "stageId": 1, "title": "kept" }),
        ];

        let index = build_events_index(&events);
        let kept: usize = index
            .values()
            .flat_map(|stages| stages.values())
            .map(Vec::len)
            .sum();
        assert_eq!(kept, 1);
        assert_eq!(bucket(&index, "2024-05-10", "1")[0].title, "kept");
    }

    #[test]
    fn test_every_indexed_event_has_date_and_stage_keys() {
        let events = vec![
            json!({ "date": "2024-05-10", "stageId": 1, "title": "a" }),
            json!({ "timeStart": "2024-05-11T10:00:00", "stage": { "id": 2 } }),
            json!({ "title": "dropped" }),
        ];

        for (date_key, stages) in build_events_index(&events) {
            for (stage_key, bucket) in stages {
                for event in bucket {
                    assert_eq!(event.date_key, date_key);
                    assert_eq!(event.stage_key, stage_key);
                    assert!(!event.date_key.is_empty());
                    assert!(!event.stage_key.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_synthetic_ids_are_positional_and_unique() {
        let events = vec![
            json!({ "date": "2024-05-10", "stageId": 1, "timeStart": "10:00" }),
            json!({ "date": "2024-05-10", "stageId": 1, "timeStart": "09:00" }),
        ];

        let index = build_events_index(&events);
        let ids: Vec<&str> = bucket(&index, "2024-05-10", "1")
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        // Ids are assigned at insertion, before the sort reorders.
        assert!(ids.contains(&"2024-05-10-1-0"));
        assert!(ids.contains(&"2024-05-10-1-1"));
    }

    #[test]
    fn test_untitled_fallback_and_raw_retention() {
        let events = vec![json!({
            "date": "2024-05-10",
            "stageId": 1,
            "status": "planned",
            "participants": [{ "userLogin": "ivanova" }],
        })];

        let index = build_events_index(&events);
        let event = &bucket(&index, "2024-05-10", "1")[0];
        assert_eq!(event.title, UNTITLED_EVENT_LABEL);
        assert_eq!(event.raw["status"], "planned");
        assert_eq!(event.raw["participants"][0]["userLogin"], "ivanova");
    }

    #[test]
    fn test_index_is_deterministic() {
        let events = vec![
            json!({ "date": "2024-05-12", "stageId": 2, "timeStart": "10:00", "title": "x" }),
            json!({ "date": "2024-05-10", "stageId": 1, "timeStart": "10:00", "title": "y" }),
            json!({ "date": "2024-05-10", "stageId": 1, "timeStart": "10:00", "title": "z" }),
        ];

        assert_eq!(build_events_index(&events), build_events_index(&events));
    }

    #[test]
    fn test_iso_datetime_event_lands_on_its_date() {
        let events = vec![json!({
            "timeStart": "2024-05-10T18:30:00Z",
            "timeEnd": "2024-05-10T21:00:00Z",
            "stage": { "id": 5, "name": "Основная сцена" },
            "title": "Чайка",
        })];

        let index = build_events_index(&events);
        let event = &bucket(&index, "2024-05-10", "5")[0];
        assert_eq!(event.time_start.as_deref(), Some("18:30"));
        assert_eq!(event.time_end.as_deref(), Some("21:00"));
    }
}
