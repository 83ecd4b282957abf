use anyhow::Result;

use crate::api::{AddParticipantRequest, Api};

#[derive(clap::Args)]
pub struct AssignArgs {
    pub event_id: String,

    /// Login of the user to assign
    pub login: String,

    #[arg(long, default_value = "participant")]
    pub responsibility: String,

    #[arg(long)]
    pub notes: Option<String>,
}

pub async fn run(api: Api, args: AssignArgs) -> Result<()> {
    let request = AddParticipantRequest {
        event_id: args.event_id,
        user_login: args.login,
        responsibility: args.responsibility,
        notes: args.notes,
    };
    api.add_participant(&request).await?;
    println!(
        "Участник {} назначен на событие {}",
        request.user_login, request.event_id
    );
    Ok(())
}
