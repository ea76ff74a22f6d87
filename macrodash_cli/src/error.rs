use macrodash::error::MacrodashError;

#[derive(thiserror::Error, Debug)]
pub enum MacrodashCliError {
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
    #[error("macrodash error: {0}")]
    MacrodashError(#[from] MacrodashError),
    #[error("TOML error in config file: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("std IO error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type MacrodashCliResult<T> = Result<T, MacrodashCliError>;
