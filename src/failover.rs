//! Credential pool and the sequential failover loop

use std::fmt;
use log::{debug, warn, error};

use crate::error::Error;
use crate::providers::gemini::ProviderResponse;
use crate::providers::PromptProvider;

/// Characters of a key that may appear in diagnostics
const HINT_LEN: usize = 10;

/// One opaque API key
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential
{   pub fn new(secret: impl Into<String>) -> Self
    {   Credential(secret.into())
    }

    /// Raw secret, for the transport layer only
    pub fn expose(&self) -> &str
    {   &self.0
    }

    /// Truncated identifier safe for logs
    pub fn hint(&self) -> String
    {   let prefix: String = self.0.chars().take(HINT_LEN).collect();
        format!("{}...", prefix)
    }
}

impl fmt::Debug for Credential
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "Credential({})", self.hint())
    }
}

/// Ordered, immutable sequence of credentials.
///
/// Order is trial priority. Built once at start-up.
#[derive(Debug, Clone, Default)]
pub struct CredentialPool
{   credentials: Vec<Credential>
}

impl CredentialPool
{   /// Build from candidate values, skipping unset and blank ones
    pub fn from_sources<I, S>(sources: I) -> Self
    where
      I: IntoIterator<Item = Option<S>>,
      S: Into<String>,
    {   let credentials: Vec<Credential> = sources
          .into_iter()
          .flatten()
          .map(Into::into)
          .map(|s: String| s.trim().to_string())
          .filter(|s| !s.is_empty())
          .map(Credential)
          .collect();
        debug!(
          "Creating credential pool with {} credentials",
          credentials.len()
        );
        CredentialPool { credentials }
    }

    /// Read the named environment entries in order
    pub fn from_env(names: &[&str]) -> Self
    {   CredentialPool::from_sources(
          names.iter().map(|name| std::env::var(name).ok())
        )
    }

    pub fn len(&self) -> usize
    {   self.credentials.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.credentials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential>
    {   self.credentials.iter()
    }
}

/// Result of a successful dispatch
#[derive(Debug, Clone)]
pub struct Dispatched
{   pub response: ProviderResponse
  , /// Pool index of the credential that succeeded
    pub credential_index: usize
  , /// Truncated identifier of that credential
    pub credential_hint: String
}

/// Try each credential in order until one returns a usable response.
///
/// Strictly sequential; stops at the first success. An empty pool
/// fails with `MissingApiKey` without calling the provider.
pub async fn dispatch<P>(
  provider: &P
, pool: &CredentialPool
, instruction: &str
) -> crate::Result<Dispatched>
where
  P: PromptProvider + ?Sized,
{   if pool.is_empty()
    {   error!("Credential pool is empty");
        return Err(Error::MissingApiKey("Gemini".to_string()));
    }

    let mut last_error = None;
    for (index, credential) in pool.iter().enumerate()
    {   debug!(
          "Attempt {}/{} with key {}",
          index + 1, pool.len(), credential.hint()
        );
        match provider.generate(instruction, credential).await
        {   Ok(response) => {
              debug!("Key {} succeeded", credential.hint());
              return Ok(Dispatched
              {   response
                , credential_index: index
                , credential_hint: credential.hint()
              });
            }
          , Err(e) => {
              warn!("Key {} failed: {}", credential.hint(), e);
              last_error = Some(e);
            }
        }
    }

    error!("All {} credentials failed", pool.len());
    Err(Error::ProviderExhausted
    {   attempts: pool.len()
      , last: Box::new(last_error.unwrap_or(Error::EmptyResponse))
    })
}
