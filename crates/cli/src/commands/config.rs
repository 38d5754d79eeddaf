use anyhow::{Context, Result};
use dedupe_core::config::{settings_path, settings_template};
use std::fs;
use std::path::PathBuf;

fn require_settings_path() -> Result<PathBuf> {
    settings_path().context("Could not determine home directory")
}

/// Print the settings file location and the effective settings
pub fn show() -> Result<()> {
    let path = require_settings_path()?;
    let settings = dedupe_core::load_settings()
        .with_context(|| format!("Failed to load {}", path.display()))?;

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!(
        "{}",
        settings
            .to_toml()
            .context("Failed to serialize settings")?
    );
    Ok(())
}

/// Write the commented default settings file
pub fn init(force: bool) -> Result<()> {
    let path = require_settings_path()?;
    if path.exists() && !force {
        anyhow::bail!(
            "Settings already exist at {}\nUse --force to overwrite",
            path.display()
        );
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(&path, settings_template()).context("Failed to write settings file")?;

    println!("✓ Settings written to {}", path.display());
    Ok(())
}
