//! Configuration for the relay server and the Gemini upstream

use std::time::Duration;
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default Gemini REST base
pub const DEFAULT_GEMINI_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model identifier
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Environment entries holding API keys, in trial priority order
pub const CREDENTIAL_ENV_VARS: [&str; 2]
  = ["GEMINI_API_KEY", "GEMINI_API_KEY_2"];

/// Upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig
{   /// API base URL
    pub api_base: String
  , /// Model name
    pub model: String
  , /// Per-attempt timeout in seconds
    pub attempt_timeout_secs: u64
}

impl GeminiConfig
{   pub fn attempt_timeout(&self) -> Duration
    {   Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Reject values no request could succeed with
    pub fn validate(&self) -> crate::Result<()>
    {   if !self.api_base.starts_with("http://")
          && !self.api_base.starts_with("https://")
        {   return Err(Error::InvalidConfiguration(
              format!("API base must be an http(s) URL: {}", self.api_base)
            ));
        }
        if self.model.trim().is_empty()
        {   return Err(Error::InvalidConfiguration(
              "model name is empty".to_string()
            ));
        }
        if self.attempt_timeout_secs == 0
        {   return Err(Error::InvalidConfiguration(
              "attempt timeout must be at least 1s".to_string()
            ));
        }
        Ok(())
    }
}

impl Default for GeminiConfig
{   fn default() -> Self
    {   GeminiConfig
        {   api_base: DEFAULT_GEMINI_API_BASE.to_string()
          , model: DEFAULT_GEMINI_MODEL.to_string()
          , attempt_timeout_secs: 30
        }
    }
}

/// Process configuration, parsed once at start-up
#[derive(Debug, Clone, Parser)]
#[command(name = "promptwiz", version, about)]
pub struct ServerConfig
{   /// Address to bind
    #[arg(long, env = "PROMPTWIZ_HOST", default_value = "127.0.0.1")]
    pub host: String
  , /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8888)]
    pub port: u16
  , /// Gemini REST base URL
    #[arg(long, env = "GEMINI_API_BASE"
         , default_value = DEFAULT_GEMINI_API_BASE)]
    pub gemini_api_base: String
  , /// Gemini model
    #[arg(long, env = "GEMINI_MODEL"
         , default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String
  , /// Timeout for a single upstream attempt
    #[arg(long, env = "GEMINI_ATTEMPT_TIMEOUT_SECS", default_value_t = 30
         , value_parser = clap::value_parser!(u64).range(1..))]
    pub attempt_timeout_secs: u64
}

impl ServerConfig
{   pub fn bind_address(&self) -> String
    {   format!("{}:{}", self.host, self.port)
    }

    pub fn gemini(&self) -> GeminiConfig
    {   GeminiConfig
        {   api_base: self.gemini_api_base
              .trim_end_matches('/')
              .to_string()
          , model: self.gemini_model.clone()
          , attempt_timeout_secs: self.attempt_timeout_secs
        }
    }
}
