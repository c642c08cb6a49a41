//! Turns upstream text into the canonical prompt set
//!
//! Never fails: text that does not parse as `{ "prompts": [...] }`
//! is wrapped into a single variant instead of being discarded.

use log::{debug, warn};

use crate::providers::gemini::ProviderResponse;
use crate::request::{NormalizedPromptSet, PromptVariant};

const FENCE: &str = "```";

/// Title used when the upstream text had no usable structure
pub const FALLBACK_TITLE: &str = "생성된 프롬프트";
/// Description used when the upstream text had no usable structure
pub const FALLBACK_DESCRIPTION: &str = "구조화되지 않은 AI 응답입니다";

/// Interior of the first fenced block, or the input unchanged.
///
/// The opening fence may carry a language tag (`json`), on its own
/// line or followed by the body on the same line. A fence without a
/// closing marker is not a block.
pub fn strip_code_fence(text: &str) -> &str
{   let Some(open) = text.find(FENCE) else
    {   return text;
    };
    let after_open = &text[open + FENCE.len()..];
    let body = match after_open.find('\n')
    {   // bare tag line
        Some(nl) if after_open[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
          &after_open[nl + 1..]
        }
      , _ => strip_json_tag(after_open)
    };
    match body.find(FENCE)
    {   Some(close) => body[..close].trim()
      , None => text
    }
}

/// Drop a leading `json` tag followed by whitespace or the body itself
fn strip_json_tag(text: &str) -> &str
{   match text.get(..4)
    {   Some(tag) if tag.eq_ignore_ascii_case("json") => {
          let rest = &text[4..];
          if rest.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '[')
          {   rest.trim_start()
          } else
          {   text
          }
        }
      , _ => text
    }
}

/// Parse already-extracted text, falling back to a single variant.
///
/// Only the fenced interior is parsed; the fallback keeps the whole
/// text so prose around the fence survives.
pub fn normalize_text(text: &str) -> NormalizedPromptSet
{   let candidate = strip_code_fence(text);
    match serde_json::from_str::<NormalizedPromptSet>(candidate)
    {   Ok(set) if set.is_well_formed() => {
          debug!("Parsed {} prompt variants", set.prompts.len());
          set
        }
      , Ok(_) => {
          warn!("Upstream JSON had no usable prompts, wrapping raw text");
          fallback(text)
        }
      , Err(e) => {
          warn!("Upstream text is not prompt JSON ({}), wrapping raw text", e);
          fallback(text)
        }
    }
}

/// Extract the generated text from the envelope and normalize it
pub fn normalize(response: &ProviderResponse) -> NormalizedPromptSet
{   normalize_text(response.text().unwrap_or_default())
}

fn fallback(text: &str) -> NormalizedPromptSet
{   NormalizedPromptSet
    {   prompts: vec![PromptVariant
        {   title: FALLBACK_TITLE.to_string()
          , description: FALLBACK_DESCRIPTION.to_string()
          , prompt: text.to_string()
        }]
    }
}
