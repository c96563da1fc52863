use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use vows_core::SiteConfig;
use vows_core::event::EventInput;
use vows_core::ics::{ParsedEvent, parse_events};

use super::open_database;

pub async fn run(config: &SiteConfig, file: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let events = parse_events(&content);
    if events.is_empty() {
        anyhow::bail!("No events found in {}", file.display());
    }

    let db = open_database(config).await?;
    for parsed in &events {
        let event = db.upsert_event(&parsed.uid, &to_input(parsed)).await?;
        println!(
            "{} {} {}",
            "Imported".green(),
            event.title,
            format!("({})", event.id).dimmed()
        );
    }

    Ok(())
}

/// Calendar LOCATION is a single line, so it becomes the venue name.
fn to_input(parsed: &ParsedEvent) -> EventInput {
    EventInput {
        title: parsed.summary.clone(),
        description: parsed.description.clone(),
        start: parsed.start,
        end: Some(parsed.end),
        location_name: parsed
            .location
            .clone()
            .unwrap_or_else(|| "TBA".to_string()),
        address: None,
        map_url: parsed.url.clone(),
    }
}
