use anyhow::Result;
use callboard_core::{SyntheticKeys, normalize_stage};
use owo_colors::OwoColorize;

use crate::api::Api;

pub async fn run(api: Api) -> Result<()> {
    let raw = api.get_stages().await?;
    if raw.is_empty() {
        println!("{}", "Нет сцен".dimmed());
        return Ok(());
    }

    let mut keys = SyntheticKeys::new();
    for record in &raw {
        let stage = normalize_stage(record, &mut keys);
        println!("{}  {}", stage.key.bold(), stage.label);
    }

    Ok(())
}
