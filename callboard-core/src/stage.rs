//! Stage normalization.
//!
//! Stage records arrive in whatever shape the backend happens to return:
//! full objects, bare ids, or nothing at all. Everything funnels through
//! [`StageRef`] so "what is this value's stage key" is answered in exactly
//! one place. Events can reference stages the `/stages` endpoint never
//! returned; those get a synthesized placeholder so they stay visible and
//! groupable in the calendar.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::{resolve_first, resolve_in, scalar_string};

/// Display label used when a stage has no resolvable name.
pub const GENERIC_STAGE_LABEL: &str = "Сцена";

const STAGE_KEY_FIELDS: &[&str] = &["stageKey", "id", "stageId", "slug", "code", "name", "title"];
const STAGE_LABEL_FIELDS: &[&str] = &["label", "name", "title", "displayName", "slug"];
const EVENT_STAGE_REF_FIELDS: &[&str] = &["stageId", "stageSlug", "stageCode", "stageName"];
const EVENT_STAGE_LABEL_FIELDS: &[&str] = &["stageName", "stage_title", "stageLabel"];

/// A physical performance space, normalized for the calendar views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Unique within a session, stable across requests for backend-keyed
    /// stages. Never persisted by the UI.
    pub key: String,
    pub label: String,
    /// True when the stage was inferred from an event reference rather
    /// than returned by the stage endpoint.
    pub synthesized: bool,
}

/// Anything that can become a stage key: a bare string/number, or a record.
#[derive(Debug, Clone, Copy)]
pub enum StageRef<'a> {
    Primitive(&'a Value),
    Record(&'a Map<String, Value>),
}

impl<'a> StageRef<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(_) | Value::Number(_) => Some(StageRef::Primitive(value)),
            Value::Object(map) => Some(StageRef::Record(map)),
            _ => None,
        }
    }

    /// Deterministic key, if the value carries any identifying field.
    pub fn key(&self) -> Option<String> {
        match self {
            StageRef::Primitive(value) => scalar_string(value),
            StageRef::Record(map) => resolve_in(map, STAGE_KEY_FIELDS).and_then(scalar_string),
        }
    }

    /// Display label; numeric references have no name to offer.
    pub fn label(&self) -> String {
        match self {
            StageRef::Primitive(value) => value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_STAGE_LABEL.to_string()),
            StageRef::Record(map) => resolve_in(map, STAGE_LABEL_FIELDS)
                .and_then(scalar_string)
                .unwrap_or_else(|| GENERIC_STAGE_LABEL.to_string()),
        }
    }
}

/// Session-scoped generator for keys of stages that carry no identifying
/// field. Owned by the coordinator instance so concurrent coordinators
/// never share a counter.
#[derive(Debug, Default)]
pub struct SyntheticKeys {
    next: u64,
}

impl SyntheticKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_stage_key(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("stage-{n}")
    }
}

/// Normalize a raw stage record into a [`Stage`].
///
/// Anonymous stages fall back to a counter-derived key, which keeps keys
/// unique within the session at the cost of stability across reloads.
pub fn normalize_stage(raw: &Value, keys: &mut SyntheticKeys) -> Stage {
    let stage_ref = StageRef::from_value(raw);
    let key = stage_ref
        .and_then(|r| r.key())
        .unwrap_or_else(|| keys.next_stage_key());
    let label = stage_ref
        .map(|r| r.label())
        .unwrap_or_else(|| GENERIC_STAGE_LABEL.to_string());

    Stage {
        key,
        label,
        synthesized: false,
    }
}

/// Build a placeholder stage for an event whose stage reference has no
/// match in the known stage list.
pub fn synthesize_stage(label: impl Into<String>, key: impl Into<String>) -> Stage {
    Stage {
        key: key.into(),
        label: label.into(),
        synthesized: true,
    }
}

/// Stage key referenced by an event: the nested `stage` value first, then
/// flat reference fields on the event itself.
pub fn event_stage_key(event: &Value) -> Option<String> {
    if let Some(nested) = event.get("stage")
        && let Some(stage_ref) = StageRef::from_value(nested)
        && let Some(key) = stage_ref.key()
    {
        return Some(key);
    }

    resolve_first(event, EVENT_STAGE_REF_FIELDS).and_then(scalar_string)
}

/// Best label an event can offer for its stage.
pub fn event_stage_label(event: &Value) -> String {
    if let Some(Value::Object(stage)) = event.get("stage")
        && let Some(name) = stage.get("name").and_then(scalar_string)
    {
        return name;
    }

    resolve_first(event, EVENT_STAGE_LABEL_FIELDS)
        .and_then(scalar_string)
        .unwrap_or_else(|| GENERIC_STAGE_LABEL.to_string())
}

/// Append one synthesized stage per distinct unmatched stage key found in
/// `events`, preserving known stages and their order. Idempotent: running
/// it twice over the same inputs yields the same list.
pub fn merge_stages_with_events(known: &[Stage], events: &[Value]) -> Vec<Stage> {
    let mut merged: Vec<Stage> = known.to_vec();
    let mut seen: std::collections::HashSet<String> =
        known.iter().map(|stage| stage.key.clone()).collect();

    for event in events {
        let Some(key) = event_stage_key(event) else {
            continue;
        };
        if !seen.insert(key.clone()) {
            continue;
        }
        merged.push(synthesize_stage(event_stage_label(event), key));
    }

    merged
}
