//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod log;
pub mod parse;

use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::debug;

use fuelog_core::FuelogConfig;

/// Load configuration from `--config`, then the default location, then defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FuelogConfig> {
    let config = if let Some(path) = config_path {
        FuelogConfig::from_file(Path::new(path))?
    } else {
        let default_path = config::default_config_path();
        if default_path.exists() {
            debug!("Loading configuration from {}", default_path.display());
            FuelogConfig::from_file(&default_path)?
        } else {
            FuelogConfig::default()
        }
    };

    config.validate()?;
    Ok(config)
}

/// Read receipt text from a file, or from stdin when `input` is `-`.
pub async fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    let path = Path::new(input);
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    Ok(tokio::fs::read_to_string(path).await?)
}
