use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use vows_core::SiteConfig;
use vows_core::rsvp::export_csv;

use super::open_database;

pub async fn run(config: &SiteConfig, output: Option<&Path>) -> Result<()> {
    let db = open_database(config).await?;
    let rsvps = db.list_rsvps().await?;
    let csv = export_csv(&rsvps);

    match output {
        Some(path) => {
            tokio::fs::write(path, csv)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {} RSVPs to {}",
                "Exported".green(),
                rsvps.len(),
                path.display()
            );
        }
        None => print!("{csv}"),
    }

    Ok(())
}
