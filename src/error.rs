use thiserror::Error as ThisError;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Custom error type for prompt generation
/// Implements Clone so the last attempt error can ride
/// inside `ProviderExhausted`
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error
{   /// Inbound request failed validation
    #[error("{0}")]
    InvalidRequest(String)
  , /// Credential pool is empty
    #[error("Missing API key for: {0}")]
    MissingApiKey(String)
  , /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(String)
  , /// API returned a non-success status
    #[error("API error ({status}): {message}")]
    ApiError
    {   status: u16
      , message: String
    }
  , /// Failed to parse API response envelope
    #[error("Parse error: {0}")]
    ParseError(String)
  , /// Envelope carried no generated text
    #[error("API response contained no generated text")]
    EmptyResponse
  , /// Attempt exceeded its timeout
    #[error("Request timed out")]
    Timeout
  , /// Every credential in the pool failed
    #[error("All {attempts} API credentials failed: {last}")]
    ProviderExhausted
    {   attempts: usize
      , last: Box<Error>
    }
  , /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String)
}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   return Error::Timeout;
        }
        // strip the URL; it may carry query material
        Error::HttpError(e.without_url().to_string())
    }
}
