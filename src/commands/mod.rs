pub mod export;
pub mod ics;
pub mod import;
pub mod init;
pub mod seed;

use anyhow::Result;
use vows_core::{Database, SiteConfig};

async fn open_database(config: &SiteConfig) -> Result<Database> {
    Ok(Database::connect(&config.database_url).await?)
}
