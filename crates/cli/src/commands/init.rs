use std::path::Path;

use anyhow::{Context, Result};
use solflow::config::{Config, CONFIG_FILE_NAME};

pub fn run() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() {
        eprintln!("Config file already exists: {}", path.display());
        return Ok(());
    }
    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}
