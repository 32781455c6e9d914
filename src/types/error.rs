use thiserror::Error;

/// seasoncost error types
#[derive(Error, Debug)]
pub enum SeasoncostError {
    /// Malformed input that cannot be recovered row-by-row
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader failure
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Summary or config JSON failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for seasoncost
pub type Result<T> = std::result::Result<T, SeasoncostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SeasoncostError::Parse("missing header".into());
        assert_eq!(err.to_string(), "parse error: missing header");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SeasoncostError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SeasoncostError = json_err.into();
        assert!(err.to_string().starts_with("json error"));
    }
}
