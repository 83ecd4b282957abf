use anyhow::{Result, bail};
use callboard_core::parse_date_key;

use crate::api::{Api, NewEventRequest};

#[derive(clap::Args)]
pub struct NewEventArgs {
    pub title: String,

    /// Stage id or key
    #[arg(long)]
    pub stage: String,

    /// Event date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Start time (HH:MM)
    #[arg(long = "from")]
    pub time_start: String,

    /// End time (HH:MM)
    #[arg(long = "to")]
    pub time_end: String,

    /// performance, rehearsal or meeting
    #[arg(long, default_value = "performance")]
    pub event_type: String,

    #[arg(long, default_value = "planned")]
    pub status: String,

    /// Display color (hex, e.g. "#cfd6f6")
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub artist: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Login recorded as the event's creator
    #[arg(long = "by")]
    pub created_by: String,
}

pub async fn run(api: Api, args: NewEventArgs) -> Result<()> {
    // The same checks the admin form makes; everything else is the
    // backend's call.
    if parse_date_key(&args.date).is_none() {
        bail!("Invalid date format '{}'. Expected YYYY-MM-DD", args.date);
    }
    if args.time_end <= args.time_start {
        bail!("Время окончания должно быть позже времени начала");
    }

    let created = api
        .create_event(&NewEventRequest {
            stage_id: args.stage,
            production_id: None,
            title: args.title,
            event_type: args.event_type,
            date: args.date,
            time_start: args.time_start,
            time_end: args.time_end,
            color_hex: args.color,
            status: args.status,
            artist_login: args.artist,
            notes: args.notes,
            created_by_login: args.created_by,
        })
        .await?;

    match callboard_core::fields::event_id(&created) {
        Some(id) => println!("Событие создано: {id}"),
        None => println!("Событие создано"),
    }
    Ok(())
}
