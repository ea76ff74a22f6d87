mod cli;
mod display;
mod error;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, RunCommand};
use error::MacrodashCliResult;
use log::debug;
use macrodash::config::Config;

const DEFAULT_LOGGING_LEVEL: &str = "warn";

#[tokio::main]
async fn main() -> Result<()> {
    // Set RUST_LOG to `DEFAULT_LOGGING_LEVEL` if not set
    let _ =
        std::env::var("RUST_LOG").map_err(|_| std::env::set_var("RUST_LOG", DEFAULT_LOGGING_LEVEL));
    pretty_env_logger::init_timed();
    let args = Cli::parse();
    debug!("args: {args:?}");
    let config = read_config_from_toml()?;
    debug!("config: {config:?}");

    if let Some(command) = args.command {
        command.run(config).await?;
    }
    Ok(())
}

fn read_config_from_toml() -> Result<Config> {
    // Linux: ~/.config/macrodash/config.toml
    // macOS: ~/Library/Application Support/macrodash/config.toml
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    let file_path = config_dir.join("macrodash").join("config.toml");
    read_config(&file_path)
        .with_context(|| format!("Error reading config file {}", file_path.display()))
}

fn read_config(file_path: &Path) -> MacrodashCliResult<Config> {
    match std::fs::read_to_string(file_path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use macrodash::config::DataSource;
    use tempfile::{tempdir, NamedTempFile};

    use super::*;

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = read_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "cache_path = \"/tmp/unemployment.csv\"\n\n[dashboard]\nsource = \"cached\"\nwindow_years = 10"
        )
        .unwrap();
        let config = read_config(file.path()).unwrap();
        assert_eq!(config.cache_path, "/tmp/unemployment.csv");
        assert_eq!(config.dashboard.source, DataSource::Cached);
        assert_eq!(config.dashboard.window_years, 10);
        assert!(config.dashboard.compute_comparison);
        assert_eq!(config.per_page, 1000);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "per_page = \"many\"").unwrap();
        assert!(read_config(file.path()).is_err());
    }
}
