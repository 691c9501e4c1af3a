use crate::config::Config;
use anyhow::{Context, Result};

pub fn run(init: bool) -> Result<()> {
    let path = Config::path().context("No configuration directory available on this platform")?;
    let config = Config::load();

    if init {
        config
            .save()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    } else {
        println!("# {}", path.display());
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
