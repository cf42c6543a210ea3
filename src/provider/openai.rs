// OpenAI moderations-endpoint provider.
//
// Calls a moderations-style HTTP API and maps its category scores onto the
// closed label set. The endpoint URL is configurable so any API-compatible
// service works.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::traits::ModerationProvider;
use crate::fusion::{normalize_label, ModerationDecision, ModerationLabel};

pub const DEFAULT_MODERATION_URL: &str = "https://api.openai.com/v1/moderations";

/// Provider backed by an OpenAI-compatible moderations endpoint.
pub struct OpenAiModerationProvider {
    client: Client,
    api_key: String,
    url: String,
    model: Option<String>,
}

impl OpenAiModerationProvider {
    pub fn new(api_key: String, url: String, model: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            url,
            model,
        }
    }
}

#[async_trait]
impl ModerationProvider for OpenAiModerationProvider {
    async fn moderate(&self, text: &str) -> Result<ModerationDecision> {
        let request = ModerationRequest {
            input: text.to_string(),
            model: self.model.clone(),
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call moderation API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Moderation API returned {}: {}", status, body);
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse moderation API response")?;
        let parsed: ModerationResponse = serde_json::from_value(raw.clone())
            .context("Unexpected moderation API response shape")?;

        let result = parsed
            .results
            .into_iter()
            .next()
            .context("Moderation API returned no results")?;

        let (label, confidence) = map_result(&result);

        debug!(
            label = %label,
            confidence = ?confidence,
            flagged = result.flagged,
            "External moderation verdict"
        );

        Ok(ModerationDecision {
            label,
            confidence,
            model: parsed.model,
            finish_reason: None,
            reason: top_category(&result).map(|(name, _)| name),
            raw: Some(raw),
        })
    }
}

/// Map one API result onto a label and confidence. Unflagged text is safe
/// with confidence complementary to the worst category score; flagged text
/// takes the highest-scoring flagged category's label and score.
fn map_result(result: &ApiResult) -> (ModerationLabel, Option<f64>) {
    if !result.flagged {
        let worst = result
            .category_scores
            .values()
            .copied()
            .fold(0.0f64, f64::max);
        return (ModerationLabel::Safe, Some((1.0 - worst).clamp(0.0, 1.0)));
    }
    match top_category(result) {
        Some((name, score)) => (normalize_label(&name), Some(score)),
        None => (ModerationLabel::OtherUnsafe, None),
    }
}

/// The highest-scoring category among those the API flagged.
fn top_category(result: &ApiResult) -> Option<(String, f64)> {
    result
        .categories
        .iter()
        .filter(|(_, flagged)| **flagged)
        .filter_map(|(name, _)| {
            result
                .category_scores
                .get(name)
                .map(|score| (name.clone(), *score))
        })
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

// --- Moderation API request/response types ---

#[derive(Serialize)]
struct ModerationRequest {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

#[derive(Deserialize)]
struct ModerationResponse {
    #[serde(default)]
    model: Option<String>,
    results: Vec<ApiResult>,
}

#[derive(Deserialize)]
struct ApiResult {
    flagged: bool,
    #[serde(default)]
    categories: HashMap<String, bool>,
    #[serde(default)]
    category_scores: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_result(flagged: bool, entries: &[(&str, bool, f64)]) -> ApiResult {
        ApiResult {
            flagged,
            categories: entries
                .iter()
                .map(|(n, f, _)| (n.to_string(), *f))
                .collect(),
            category_scores: entries
                .iter()
                .map(|(n, _, s)| (n.to_string(), *s))
                .collect(),
        }
    }

    #[test]
    fn unflagged_maps_to_safe_with_complementary_confidence() {
        let result = api_result(false, &[("harassment", false, 0.2), ("sexual", false, 0.1)]);
        let (label, confidence) = map_result(&result);
        assert_eq!(label, ModerationLabel::Safe);
        assert!((confidence.unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn flagged_takes_highest_scoring_category() {
        let result = api_result(
            true,
            &[("harassment", true, 0.9), ("sexual", true, 0.4)],
        );
        let (label, confidence) = map_result(&result);
        assert_eq!(label, ModerationLabel::HarassmentOrTrolling);
        assert!((confidence.unwrap() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn self_harm_category_maps_to_self_harm_label() {
        let result = api_result(true, &[("self-harm", true, 0.8)]);
        let (label, _) = map_result(&result);
        assert_eq!(label, ModerationLabel::SelfHarmOrViolence);
    }

    #[test]
    fn unknown_category_maps_to_other_unsafe() {
        let result = api_result(true, &[("hate", true, 0.7)]);
        let (label, _) = map_result(&result);
        assert_eq!(label, ModerationLabel::OtherUnsafe);
    }
}
