//! Wire types for the generate endpoint

use serde::{Deserialize, Serialize};

/// Mode used when the caller does not send one
pub const DEFAULT_MODE: &str = "creation";

/// Inbound body of `POST generate`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest
{   /// Free text from the user; required and non-blank
    #[serde(default)]
    pub user_message: Option<String>
  , /// Optional mode tag
    #[serde(default)]
    pub mode: Option<String>
}

impl GenerationRequest
{   pub fn new(user_message: impl Into<String>) -> Self
    {   GenerationRequest
        {   user_message: Some(user_message.into())
          , mode: None
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self
    {   self.mode = Some(mode.into());
        self
    }

    /// Returns the user message if present and non-blank
    pub fn validated_message(&self) -> crate::Result<&str>
    {   match self.user_message.as_deref()
        {   Some(msg) if !msg.trim().is_empty() => Ok(msg)
          , _ => Err(crate::error::Error::InvalidRequest(
              "User message is required".to_string()
            ))
        }
    }

    /// Mode tag, falling back to [`DEFAULT_MODE`]
    pub fn mode_or_default(&self) -> &str
    {   match self.mode.as_deref()
        {   Some(mode) if !mode.trim().is_empty() => mode
          , _ => DEFAULT_MODE
        }
    }
}

/// One generated prompt alternative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptVariant
{   #[serde(default)]
    pub title: String
  , #[serde(default)]
    pub description: String
  , pub prompt: String
}

/// Canonical success body: `{ "prompts": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPromptSet
{   pub prompts: Vec<PromptVariant>
}

impl NormalizedPromptSet
{   /// At least one variant and no empty `prompt` field
    pub fn is_well_formed(&self) -> bool
    {   !self.prompts.is_empty()
          && self.prompts.iter().all(|v| !v.prompt.trim().is_empty())
    }
}

/// Error body returned to the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse
{   pub error: String
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>
}

impl ErrorResponse
{   pub fn new(error: impl Into<String>) -> Self
    {   ErrorResponse
        {   error: error.into()
          , message: None
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self
    {   self.message = Some(message.into());
        self
    }
}
