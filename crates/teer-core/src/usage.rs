//! Token usage types.
//!
//! A [`Usage`] describes the tokens consumed by a single LLM call, with an
//! optional [`Cache`] breakdown whose shape depends on the provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// LLM provider that served the call.
///
/// Unknown provider names are carried through as [`Provider::Custom`] so newer
/// providers can be reported before this crate learns about them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    /// Anthropic (Claude models).
    Anthropic,

    /// `OpenAI` (GPT models).
    OpenAi,

    /// Google (Gemini models).
    Google,

    /// Any other provider, passed through verbatim.
    Custom(String),
}

impl Provider {
    /// Get the provider name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::Custom(name) => name,
        }
    }

    /// Whether this is one of the providers with a known cache shape.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl From<String> for Provider {
    fn from(name: String) -> Self {
        match name.as_str() {
            "anthropic" => Self::Anthropic,
            "openai" => Self::OpenAi,
            "google" => Self::Google,
            _ => Self::Custom(name),
        }
    }
}

impl From<&str> for Provider {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token usage for one LLM call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of input (prompt) tokens.
    pub input: u64,

    /// Number of output (completion) tokens.
    pub output: u64,

    /// Provider-specific cache token counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<Cache>,
}

impl Usage {
    /// Create usage with input and output counts and no cache breakdown.
    #[must_use]
    pub fn new(input: u64, output: u64) -> Self {
        Self {
            input,
            output,
            cache: None,
        }
    }

    /// Attach a cache breakdown. An empty cache is dropped.
    #[must_use]
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = (!cache.is_empty()).then_some(cache);
        self
    }

    /// Input plus output tokens.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input.saturating_add(self.output)
    }
}

/// Cache token counts keyed by provider.
///
/// Keys other than `anthropic`, `openai` and `google` are kept opaquely in
/// [`Cache::other`] and serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cache {
    /// Anthropic prompt-cache counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<AnthropicCache>,

    /// `OpenAI` prompt-cache counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAiCache>,

    /// Google context-cache and thinking counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<GoogleCache>,

    /// Cache records for providers this crate does not model.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Cache {
    /// Cache holding only an Anthropic record.
    #[must_use]
    pub fn anthropic(cache: AnthropicCache) -> Self {
        Self {
            anthropic: Some(cache),
            ..Self::default()
        }
    }

    /// Cache holding only an `OpenAI` record.
    #[must_use]
    pub fn openai(cache: OpenAiCache) -> Self {
        Self {
            openai: Some(cache),
            ..Self::default()
        }
    }

    /// Cache holding only a Google record.
    #[must_use]
    pub fn google(cache: GoogleCache) -> Self {
        Self {
            google: Some(cache),
            ..Self::default()
        }
    }

    /// True when no provider record is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anthropic.is_none()
            && self.openai.is_none()
            && self.google.is_none()
            && self.other.is_empty()
    }
}

/// Anthropic cache counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicCache {
    /// Tokens written to create the cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u64>,

    /// Tokens read from the cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u64>,
}

/// `OpenAI` cache counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiCache {
    /// Input tokens served from the cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cached_tokens: Option<u64>,
}

/// Google cache counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleCache {
    /// Tokens served from cached content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_content_token_count: Option<u64>,

    /// Tokens spent on thinking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thoughts_token_count: Option<u64>,
}
