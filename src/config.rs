use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::provider::openai::DEFAULT_MODERATION_URL;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file is
/// loaded automatically at startup via dotenvy.
pub struct Config {
    /// Directory holding the lexicon and safe-phrase files.
    pub lexicon_dir: PathBuf,
    /// Persona name used for pronoun-swapped safe-phrase variants.
    pub subject: String,
    /// API key for the external moderation endpoint.
    pub moderation_api_key: String,
    /// Moderations endpoint URL (defaults to the OpenAI endpoint).
    pub moderation_url: String,
    /// Optional model override passed to the moderation endpoint.
    pub moderation_model: Option<String>,
}

impl Config {
    /// Load configuration from environment variables. Everything has a
    /// default except the API key, which is only required for fused
    /// decisions (`palisade decide`).
    pub fn load() -> Result<Self> {
        Ok(Self {
            lexicon_dir: env::var("PALISADE_LEXICON_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./lexicons")),
            subject: env::var("PALISADE_SUBJECT").unwrap_or_else(|_| "jack".to_string()),
            moderation_api_key: env::var("MODERATION_API_KEY").unwrap_or_default(),
            moderation_url: env::var("PALISADE_MODERATION_URL")
                .unwrap_or_else(|_| DEFAULT_MODERATION_URL.to_string()),
            moderation_model: env::var("PALISADE_MODERATION_MODEL").ok(),
        })
    }

    /// Check that the moderation API key is configured.
    /// Call this before any operation that needs the external classifier.
    pub fn require_provider(&self) -> Result<()> {
        if self.moderation_api_key.is_empty() {
            anyhow::bail!(
                "MODERATION_API_KEY not set. Add it to your .env file,\n\
                 or use `palisade check` for a local-only verdict."
            );
        }
        Ok(())
    }
}
