use thiserror::Error;

/// Unified application error type to simplify bubbling errors through async flows.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),
    #[error("Errored while handling a file. {0}")]
    Io(#[from] std::io::Error),
    #[error("Error accessing the GitHub API. {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid header value. {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Error serializing json. {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Error communicating with the AI. {0}")]
    AIClient(#[from] async_openai::error::OpenAIError),
    #[error("Error while writing information to a string. {0}")]
    BufferWrite(#[from] std::fmt::Error),
    #[error("Error formatting a date. {0}")]
    TimeFormat(#[from] time::error::Format),
    #[error("Unable to parse string. {0}")]
    Utf8Parse(#[from] std::string::FromUtf8Error),
    #[error("Duration value overflowed. {0}")]
    DurationOverflow(#[from] time::error::ConversionRange),
    #[cfg(test)]
    #[error("{0}")]
    Other(String),
}

/// Convenience alias for results that bubble `AppError`.
pub type AppResult<T> = Result<T, AppError>;
