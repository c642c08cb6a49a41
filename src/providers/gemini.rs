use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

use crate::config::GeminiConfig;
use crate::error::Error;
use crate::failover::Credential;

/// Sampling temperature
pub const TEMPERATURE: f32 = 0.9;
/// Top-k sampling cut
pub const TOP_K: u32 = 40;
/// Nucleus sampling mass
pub const TOP_P: f32 = 0.95;
/// Output length cap in tokens
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

// ===== Request Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part
{   #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content
{   #[serde(default)]
    pub parts: Vec<Part>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig
{   pub temperature: f32
  , pub top_k: u32
  , pub top_p: f32
  , pub max_output_tokens: u32
}

impl Default for GenerationConfig
{   fn default() -> Self
    {   GenerationConfig
        {   temperature: TEMPERATURE
          , top_k: TOP_K
          , top_p: TOP_P
          , max_output_tokens: MAX_OUTPUT_TOKENS
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , pub generation_config: GenerationConfig
}

impl GenerateContentRequest
{   pub fn from_instruction(instruction: &str) -> Self
    {   GenerateContentRequest
        {   contents: vec![
              Content
              {   parts: vec![Part
                  {   text: Some(instruction.to_string())
                  }]
                , role: None
              }
            ]
          , generation_config: GenerationConfig::default()
        }
    }
}

// ===== Response Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

/// Raw `generateContent` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

impl ProviderResponse
{   /// Build an envelope holding a single text part
    pub fn from_text(text: impl Into<String>) -> Self
    {   ProviderResponse
        {   candidates: vec![Candidate
            {   content: Some(Content
                {   parts: vec![Part { text: Some(text.into()) }]
                  , role: Some("model".to_string())
                })
              , finish_reason: Some("STOP".to_string())
            }]
        }
    }

    /// `candidates[0].content.parts[0].text`, if present
    pub fn text(&self) -> Option<&str>
    {   self.candidates.first()?
          .content.as_ref()?
          .parts.first()?
          .text.as_deref()
    }
}

// ===== Gemini Client =====

/// Client for the Gemini `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient
{   config: GeminiConfig
  , http_client: reqwest::Client
}

impl GeminiClient
{   pub fn new(config: GeminiConfig) -> Self
    {   debug!("Creating GeminiClient for model: {}", config.model);
        GeminiClient
        {   config
          , http_client: reqwest::Client::new()
        }
    }

    fn endpoint(&self) -> String
    {   format!(
          "{}/models/{}:generateContent",
          self.config.api_base, self.config.model
        )
    }
}

#[async_trait]
impl crate::providers::PromptProvider for GeminiClient
{   async fn generate(
      &self
    , instruction: &str
    , credential: &Credential
    ) -> crate::Result<ProviderResponse>
    {   let request = GenerateContentRequest::from_instruction(instruction);
        trace!("Gemini request: {:?}", request.generation_config);

        let response = self.http_client
          .post(self.endpoint())
          .header("x-goog-api-key", credential.expose())
          .timeout(self.config.attempt_timeout())
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            let err = Error::from(e);
            error!("HTTP error with key {}: {}", credential.hint(), err);
            err
          })?;

        let status = response.status();
        trace!("Gemini response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Gemini API error {}: {}", status, error_text);
            return Err(Error::ApiError
            {   status: status.as_u16()
              , message: error_text
            });
        }

        let envelope: ProviderResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            Error::ParseError(e.without_url().to_string())
          })?;

        match envelope.text()
        {   Some(text) if !text.trim().is_empty() => Ok(envelope)
          , _ => {
              error!("No generated text in response");
              Err(Error::EmptyResponse)
            }
        }
    }
}
