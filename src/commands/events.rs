use anyhow::Result;
use callboard_core::{ScheduleRange, build_events_index, merge_stages_with_events};

use crate::api::{Api, EventQuery};
use crate::coordinator::{ScheduleCoordinator, ScheduleSnapshot};
use crate::render;

pub async fn run(api: Api, range: ScheduleRange, participant: Option<String>) -> Result<()> {
    let snapshot = if let Some(login) = participant {
        // One-shot filtered view; the coordinator's refresh machinery
        // buys nothing for a single filtered query.
        let query = EventQuery {
            range,
            participant_login: Some(login),
        };
        let raw = api.get_schedule_events(&query).await?;
        ScheduleSnapshot {
            stages: merge_stages_with_events(&[], &raw),
            events_by_date: build_events_index(&raw),
            is_loading: false,
            error: None,
        }
    } else {
        let coordinator = ScheduleCoordinator::new(api);
        coordinator.set_range(range);
        // The stage and event tracks are independent and run concurrently.
        tokio::join!(coordinator.load_stages(), coordinator.load_events());
        coordinator.snapshot()
    };

    for line in render::render_snapshot(&snapshot) {
        println!("{line}");
    }

    Ok(())
}
