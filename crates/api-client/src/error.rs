use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Invalid ticker symbol: '{0}'")]
    InvalidSymbol(String),

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Timeout while fetching {0} data")]
    Timeout(String),

    #[error("Failed to send the HTTP request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The {endpoint} request returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("The API request returned an error: {0}")]
    Provider(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Errors that abort a whole snapshot no matter which endpoint raised them.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::RateLimited | ApiError::Timeout(_))
    }
}
