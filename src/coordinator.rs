//! Schedule data coordination.
//!
//! One coordinator instance backs one calendar view. It fetches the stage
//! list once, fetches events per date range, and merges the two into the
//! snapshot consumers render from. The stage and event tracks run
//! independently: a view can show events before stage metadata settles,
//! since events synthesize their own stages.
//!
//! Overlapping event fetches are serialized by a cycle counter: every
//! fetch captures a cycle number at start, and a resolution is applied
//! only if its cycle is still the latest. A superseded cycle's result is
//! discarded entirely, loading and error writes included, so a slow stale
//! response can never overwrite fresher state. In-flight requests are not
//! aborted at the transport level; their results are simply ignored.

use std::sync::{Arc, Mutex};

use callboard_core::{
    DateStageIndex, ScheduleRange, Stage, SyntheticKeys, build_events_index,
    merge_stages_with_events, normalize_stage,
};

use crate::api::{EventQuery, ScheduleSource};

/// What a consumer reads. Rebuilt from scratch on every successful fetch;
/// consumers only ever see snapshots, never shared mutable state.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    pub stages: Vec<Stage>,
    pub events_by_date: DateStageIndex,
    pub is_loading: bool,
    /// First of the stage-fetch or event-fetch error, stage error first.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct CoordinatorState {
    stages: Vec<Stage>,
    events_by_date: DateStageIndex,
    is_loading: bool,
    stages_error: Option<String>,
    events_error: Option<String>,
    keys: SyntheticKeys,
    range: Option<ScheduleRange>,
    refresh_token: u64,
    stages_started: bool,
    events_cycle: u64,
}

/// Fetch orchestration for one mounted calendar view.
pub struct ScheduleCoordinator<S> {
    source: S,
    state: Arc<Mutex<CoordinatorState>>,
}

impl<S: ScheduleSource> ScheduleCoordinator<S> {
    pub fn new(source: S) -> Self {
        ScheduleCoordinator {
            source,
            state: Arc::new(Mutex::new(CoordinatorState::default())),
        }
    }

    /// Set the date range the next event fetch will cover.
    pub fn set_range(&self, range: ScheduleRange) {
        self.state.lock().unwrap().range = Some(range);
    }

    /// Bump the refresh token. Callers do this after a successful mutation
    /// and then await [`Self::load_events`] to observe the new truth; the
    /// backend stays the single source of record.
    pub fn bump_refresh(&self) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.refresh_token += 1;
        state.refresh_token
    }

    pub fn refresh_token(&self) -> u64 {
        self.state.lock().unwrap().refresh_token
    }

    /// Fetch and normalize the stage list. Runs at most once per
    /// coordinator instance; later calls are no-ops, matching the
    /// once-per-mount lifetime of the stage track.
    pub async fn load_stages(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.stages_started {
                return;
            }
            state.stages_started = true;
            state.stages_error = None;
        }

        match self.source.fetch_stages().await {
            Ok(raw) => {
                let mut state = self.state.lock().unwrap();
                let normalized: Vec<Stage> = raw
                    .iter()
                    .map(|record| normalize_stage(record, &mut state.keys))
                    .collect();
                state.stages = normalized;
            }
            Err(err) => {
                self.state.lock().unwrap().stages_error = Some(err.to_string());
            }
        }
    }

    /// Fetch events for the current range and rebuild the index. A no-op
    /// when no range has been set.
    pub async fn load_events(&self) {
        let (cycle, query) = {
            let mut state = self.state.lock().unwrap();
            let Some(range) = state.range else {
                return;
            };
            state.events_cycle += 1;
            state.is_loading = true;
            state.events_error = None;
            (state.events_cycle, EventQuery::range(range))
        };

        let outcome = self.source.fetch_events(&query).await;

        let mut state = self.state.lock().unwrap();
        if state.events_cycle != cycle {
            // Superseded while in flight; this cycle's result is obsolete.
            return;
        }

        match outcome {
            Ok(raw) => {
                state.events_by_date = build_events_index(&raw);
                // Orphan events stay groupable even when the stage
                // endpoint is incomplete or stale relative to events.
                let merged = merge_stages_with_events(&state.stages, &raw);
                state.stages = merged;

                let indexed: usize = state
                    .events_by_date
                    .values()
                    .flat_map(|stages| stages.values())
                    .map(Vec::len)
                    .sum();
                if indexed < raw.len() {
                    log::debug!(
                        "dropped {} of {} events with no resolvable date or stage",
                        raw.len() - indexed,
                        raw.len()
                    );
                }
            }
            Err(err) => {
                state.events_error = Some(err.to_string());
            }
        }
        state.is_loading = false;
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        let state = self.state.lock().unwrap();
        ScheduleSnapshot {
            stages: state.stages.clone(),
            events_by_date: state.events_by_date.clone(),
            is_loading: state.is_loading,
            error: state
                .stages_error
                .clone()
                .or_else(|| state.events_error.clone()),
        }
    }
}
