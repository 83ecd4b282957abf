use anyhow::Result;

use crate::api::Api;

pub async fn run(api: Api, event_id: &str) -> Result<()> {
    api.delete_event(event_id).await?;
    println!("Событие {event_id} удалено");
    Ok(())
}
