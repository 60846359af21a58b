use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Invalid date format pattern: {0}")]
    InvalidFormat(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),

    #[error("No number found in: {0}")]
    NoNumber(String),

    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("Network error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err)
        } else {
            Error::Http(err)
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::MalformedDataset(format!("CSV error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(format!("YAML error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoNumber("abc".to_string());
        assert_eq!(err.to_string(), "No number found in: abc");

        let err = Error::HttpStatus { status: 503, body: "busy".to_string() };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("busy"));

        let err = Error::MalformedDataset("scalar".to_string());
        assert!(err.to_string().starts_with("Malformed dataset"));
    }

    #[test]
    fn test_chrono_error_converts() {
        let parse_err = chrono::NaiveDate::parse_from_str("nope", "%Y-%m-%d").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::DateParse(_)));
    }
}
