use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use vows_core::SiteConfig;

pub fn run(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => SiteConfig::config_path()?,
    };

    if path.exists() {
        anyhow::bail!("Config file already exists at {}", path.display());
    }

    SiteConfig::create_default_config(&path)?;
    println!("{} {}", "Created".green(), path.display());
    println!("Edit it, then run `vows seed` to create the database.");

    Ok(())
}
