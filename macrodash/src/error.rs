//! Error types.

#[derive(thiserror::Error, Debug)]
pub enum MacrodashError {
    #[error("Wrapped anyhow error: {0}")]
    AnyhowError(#[from] anyhow::Error),
    #[error("Request to data source failed: {0}")]
    FailedConnection(#[from] reqwest::Error),
    #[error("Data source returned an error: {0}")]
    SourceError(String),
    #[error("Malformed response from data source: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Unknown country: {0}")]
    UnknownEntity(String),
    #[error("Cache file not found: {0}")]
    MissingCache(String),
    #[error("Wrapped polars error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type MacrodashResult<T> = Result<T, MacrodashError>;

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_anyhow() {
        let anyhow_error = anyhow!("An anyhow error");
        let macrodash_error: MacrodashError = anyhow_error.into();
        assert_eq!(
            macrodash_error.to_string(),
            "Wrapped anyhow error: An anyhow error"
        );
    }

    #[test]
    fn unknown_entity_names_the_selection() {
        let err = MacrodashError::UnknownEntity("Atlantis".into());
        assert_eq!(err.to_string(), "Unknown country: Atlantis");
    }
}
