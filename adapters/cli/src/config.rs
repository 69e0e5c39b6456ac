use std::{fs, path::Path};

use anyhow::{Context, Result};
use sanity_maze_core::GameConfig;

/// Loads the tuning file at `path`, or the defaults when no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("failed to load config file {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    Ok(config)
}

fn parse(contents: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(contents).context("config is not valid toml")?;
    config.validate().context("config holds an invalid value")?;
    Ok(config)
}
