use anyhow::Result;
use callboard_core::ScheduleRange;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use callboard::api::Api;
use callboard::commands;
use callboard::config::Config;

#[derive(Parser)]
#[command(name = "callboard")]
#[command(about = "View and manage the theatre venue schedule")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the venue's stages
    Stages,
    /// Show the schedule for a date range
    Events {
        /// Range start (YYYY-MM-DD, requires --to)
        #[arg(long)]
        from: Option<String>,

        /// Range end (YYYY-MM-DD, requires --from)
        #[arg(long)]
        to: Option<String>,

        /// Show a single day
        #[arg(long)]
        day: Option<String>,

        /// Show the week containing this date
        #[arg(long)]
        week: Option<String>,

        /// Show the month containing this date
        #[arg(long)]
        month: Option<String>,

        /// Only events this login participates in
        #[arg(long)]
        participant: Option<String>,
    },
    /// Create an event
    New(commands::new::NewEventArgs),
    /// Delete an event by id
    Delete { event_id: String },
    /// Assign a participant to an event
    Assign(commands::assign::AssignArgs),
    /// Staff roster
    Users {
        #[command(subcommand)]
        command: commands::users::UsersCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let api = Api::new(&config);

    match cli.command {
        Commands::Stages => commands::stages::run(api).await,
        Commands::Events {
            from,
            to,
            day,
            week,
            month,
            participant,
        } => {
            let range = resolve_range(from, to, day, week, month)?;
            commands::events::run(api, range, participant).await
        }
        Commands::New(args) => commands::new::run(api, args).await,
        Commands::Delete { event_id } => commands::delete::run(api, &event_id).await,
        Commands::Assign(args) => commands::assign::run(api, args).await,
        Commands::Users { command } => commands::users::run(api, command).await,
    }
}

/// Turn the events flags into a range; defaults to the current month.
fn resolve_range(
    from: Option<String>,
    to: Option<String>,
    day: Option<String>,
    week: Option<String>,
    month: Option<String>,
) -> Result<ScheduleRange> {
    match (from, to) {
        (Some(from), Some(to)) => {
            return ScheduleRange::from_args(&from, &to).map_err(|e| anyhow::anyhow!(e));
        }
        (None, None) => {}
        _ => anyhow::bail!("--from and --to must be given together"),
    }

    if let Some(day) = day {
        return Ok(ScheduleRange::day_of(parse_cli_date(&day)?));
    }
    if let Some(week) = week {
        return Ok(ScheduleRange::week_of(parse_cli_date(&week)?));
    }
    if let Some(month) = month {
        return Ok(ScheduleRange::month_of(parse_cli_date(&month)?));
    }

    Ok(ScheduleRange::month_of(chrono::Local::now().date_naive()))
}

fn parse_cli_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format '{}'. Expected YYYY-MM-DD", value))
}
