//! Best-effort adapters from vendor response usage blocks to [`Usage`].
//!
//! Each supported provider has one adapter struct with a fixed field list.
//! Vendor response shapes change without notice, so these are a convenience
//! and not part of the ingest contract: callers can always build [`Usage`]
//! directly.
//!
//! The cache rule is uniform across providers. Cache fields equal to zero are
//! omitted, and the cache object is omitted entirely when every field is zero.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::{AnthropicCache, Cache, GoogleCache, OpenAiCache, Provider, Usage};

/// A vendor usage block that maps onto [`Usage`].
pub trait UsageAdapter {
    /// Provider whose response this adapter reads.
    fn provider(&self) -> Provider;

    /// Convert to a [`Usage`].
    fn to_usage(&self) -> Usage;
}

/// Anthropic `response.usage`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AnthropicUsage {
    /// Prompt tokens.
    pub input_tokens: u64,
    /// Completion tokens.
    pub output_tokens: u64,
    /// Tokens read from the prompt cache.
    #[serde(default)]
    pub cache_read_input_tokens: Option<u64>,
    /// Tokens written to the prompt cache.
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u64>,
}

impl UsageAdapter for AnthropicUsage {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn to_usage(&self) -> Usage {
        let cache = AnthropicCache {
            cache_creation_input_tokens: nonzero(self.cache_creation_input_tokens),
            cache_read_input_tokens: nonzero(self.cache_read_input_tokens),
        };
        let usage = Usage::new(self.input_tokens, self.output_tokens);
        if cache == AnthropicCache::default() {
            usage
        } else {
            usage.with_cache(Cache::anthropic(cache))
        }
    }
}

/// `OpenAI` `response.usage`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt tokens.
    pub prompt_tokens: u64,
    /// Completion tokens.
    pub completion_tokens: u64,
    /// Prompt tokens served from the cache.
    #[serde(default)]
    pub input_cached_tokens: Option<u64>,
}

impl UsageAdapter for OpenAiUsage {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn to_usage(&self) -> Usage {
        let usage = Usage::new(self.prompt_tokens, self.completion_tokens);
        match nonzero(self.input_cached_tokens) {
            Some(cached) => usage.with_cache(Cache::openai(OpenAiCache {
                input_cached_tokens: Some(cached),
            })),
            None => usage,
        }
    }
}

/// Google `response.usage_metadata`.
///
/// Accepts both the SDK's snake_case names and the REST API's camelCase ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct GoogleUsageMetadata {
    /// Prompt tokens.
    #[serde(alias = "promptTokenCount")]
    pub prompt_token_count: u64,
    /// Candidate (output) tokens.
    #[serde(alias = "candidatesTokenCount")]
    pub candidates_token_count: u64,
    /// Tokens served from cached content.
    #[serde(default, alias = "cachedContentTokenCount")]
    pub cached_content_token_count: Option<u64>,
    /// Thinking tokens.
    #[serde(default, alias = "thoughtsTokenCount")]
    pub thoughts_token_count: Option<u64>,
}

impl UsageAdapter for GoogleUsageMetadata {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn to_usage(&self) -> Usage {
        let cache = GoogleCache {
            cached_content_token_count: nonzero(self.cached_content_token_count),
            thoughts_token_count: nonzero(self.thoughts_token_count),
        };
        let usage = Usage::new(self.prompt_token_count, self.candidates_token_count);
        if cache == GoogleCache::default() {
            usage
        } else {
            usage.with_cache(Cache::google(cache))
        }
    }
}

/// Extract [`Usage`] from a vendor response serialized as JSON.
///
/// Reads `usage` for Anthropic and `OpenAI`, and `usage_metadata` (or
/// `usageMetadata`) for Google.
///
/// # Errors
///
/// Returns [`ValidationError::UnsupportedProvider`] for providers without an
/// adapter, [`ValidationError::MissingField`] when the usage block is absent,
/// and [`ValidationError::Malformed`] when it does not match the adapter.
pub fn extract_usage(provider: &Provider, response: &Value) -> Result<Usage> {
    match provider {
        Provider::Anthropic => parse::<AnthropicUsage>(response, &["usage"]),
        Provider::OpenAi => parse::<OpenAiUsage>(response, &["usage"]),
        Provider::Google => {
            parse::<GoogleUsageMetadata>(response, &["usage_metadata", "usageMetadata"])
        }
        Provider::Custom(name) => Err(ValidationError::UnsupportedProvider(name.clone())),
    }
}

fn parse<A>(response: &Value, keys: &[&str]) -> Result<Usage>
where
    A: UsageAdapter + for<'de> Deserialize<'de>,
{
    let block = keys
        .iter()
        .find_map(|key| response.get(key).filter(|v| !v.is_null()))
        .ok_or_else(|| ValidationError::missing(keys[0]))?;
    let adapter = A::deserialize(block)?;
    Ok(adapter.to_usage())
}

fn nonzero(count: Option<u64>) -> Option<u64> {
    count.filter(|&n| n > 0)
}
