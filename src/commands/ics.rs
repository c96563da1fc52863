use anyhow::Result;
use vows_core::SiteConfig;
use vows_core::ics::generate_ics;

use super::open_database;

pub async fn run(config: &SiteConfig, event_id: &str) -> Result<()> {
    let db = open_database(config).await?;
    let event = db.event(event_id).await?;
    print!("{}", generate_ics(&event)?);
    Ok(())
}
