//! Normalization and view-projection engine for theatre schedule data.
//!
//! The backend is the source of record and returns loosely-shaped JSON;
//! this crate turns it into the canonical model the calendar views read:
//! a stage list plus a date→stage→event-list index. Normalization never
//! errors: missing fields degrade to defaults, unplaceable events are
//! dropped, unknown stage references get synthesized placeholders.

pub mod color;
pub mod dates;
pub mod fields;
pub mod index;
pub mod stage;

pub use color::{DEFAULT_EVENT_ALPHA, event_background, to_display_color};
pub use dates::{ScheduleRange, format_date_key, format_display_date, parse_date_key};
pub use index::{DateStageIndex, ScheduleEvent, build_events_index};
pub use stage::{
    Stage, SyntheticKeys, merge_stages_with_events, normalize_stage, synthesize_stage,
};
