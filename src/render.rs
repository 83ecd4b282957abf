//! Terminal rendering for schedule snapshots.
//!
//! The CLI stands in for the Month/Week/Day views: it reads a snapshot
//! and looks events up as `events_by_date[date][stage.key]`, exactly the
//! contract the engine exposes.

use callboard_core::color::parse_hex_rgb;
use callboard_core::{ScheduleEvent, Stage, dates};
use owo_colors::OwoColorize;

use crate::coordinator::ScheduleSnapshot;

pub fn render_snapshot(snapshot: &ScheduleSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(error) = &snapshot.error {
        lines.push(format!("{}", error.red()));
    }

    if snapshot.events_by_date.is_empty() {
        lines.push(format!("{}", "Нет событий".dimmed()));
        return lines;
    }

    for (date_key, by_stage) in &snapshot.events_by_date {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("{}", date_heading(date_key).bold()));

        // Stages in list order, the way the views group columns.
        for stage in &snapshot.stages {
            let Some(bucket) = by_stage.get(&stage.key) else {
                continue;
            };
            lines.push(format!("  {}", render_stage(stage)));
            for event in bucket {
                lines.push(format!("    {}", render_event(event)));
            }
        }
    }

    lines
}

fn date_heading(date_key: &str) -> String {
    let display = dates::format_display_date(date_key);
    match dates::parse_date_key(date_key) {
        Some(date) => format!("{}, {}", display, dates::weekday_long(date)),
        None => display,
    }
}

fn render_stage(stage: &Stage) -> String {
    if stage.synthesized {
        format!("{}", stage.label.dimmed())
    } else {
        stage.label.clone()
    }
}

fn render_event(event: &ScheduleEvent) -> String {
    let time = match (&event.time_start, &event.time_end) {
        (Some(start), Some(end)) => format!("{start}–{end}"),
        (Some(start), None) => start.clone(),
        _ => "     ".to_string(),
    };

    let title = match event.color.as_deref().and_then(parse_hex_rgb) {
        Some((r, g, b)) => format!("{}", event.title.truecolor(r, g, b)),
        None => event.title.clone(),
    };

    format!("{} {} {}", time.dimmed(), title, format!("[{}]", event.id).dimmed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use callboard_core::build_events_index;
    use serde_json::json;

    #[test]
    fn test_render_groups_by_date_then_stage_order() {
        let events = vec![
            json!({ "date": "2024-05-10", "stageId": 2, "timeStart": "19:00", "title": "Б" }),
            json!({ "date": "2024-05-10", "stageId": 1, "timeStart": "10:00", "title": "А" }),
        ];
        let snapshot = ScheduleSnapshot {
            stages: vec![
                Stage {
                    key: "2".to_string(),
                    label: "Малая".to_string(),
                    synthesized: false,
                },
                Stage {
                    key: "1".to_string(),
                    label: "Основная".to_string(),
                    synthesized: false,
                },
            ],
            events_by_date: build_events_index(&events),
            is_loading: false,
            error: None,
        };

        let lines = render_snapshot(&snapshot);
        let malaya = lines.iter().position(|l| l.contains("Малая")).unwrap();
        let osnovnaya = lines.iter().position(|l| l.contains("Основная")).unwrap();
        // Stage list order wins over index key order.
        assert!(malaya < osnovnaya);
        assert!(lines[0].contains("10.05.2024"));
        assert!(lines[0].contains("Пятница"));
    }

    #[test]
    fn test_render_empty_snapshot() {
        let snapshot = ScheduleSnapshot {
            stages: Vec::new(),
            events_by_date: Default::default(),
            is_loading: false,
            error: None,
        };
        let lines = render_snapshot(&snapshot);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Нет событий"));
    }

    #[test]
    fn test_render_error_banner_first() {
        let snapshot = ScheduleSnapshot {
            stages: Vec::new(),
            events_by_date: Default::default(),
            is_loading: false,
            error: Some("Не удалось загрузить расписание".to_string()),
        };
        let lines = render_snapshot(&snapshot);
        assert!(lines[0].contains("Не удалось загрузить расписание"));
    }
}
