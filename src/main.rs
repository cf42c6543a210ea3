use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::warn;

use palisade::classify::{LocalClassifier, LocalModerationResult};
use palisade::config::Config;
use palisade::fusion::{fuse, ModerationDecision, ModerationOutcome};
use palisade::lexicon::LexiconStore;
use palisade::output::terminal;
use palisade::provider::{ModerationProvider, OpenAiModerationProvider};

/// Palisade: local content moderation for a personal-site assistant.
///
/// Decides whether an inbound chat message is safe to answer, must be
/// blocked, or can be downgraded from an ambiguous unsafe verdict based on
/// contextual signals.
#[derive(Parser)]
#[command(name = "palisade", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the local rule engine only (no external API call)
    Check {
        /// The message text to classify
        text: String,

        /// Emit the verdict as JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Classify, obtain an external verdict, and fuse into a final decision
    Decide {
        /// The message text to moderate
        text: String,

        /// Emit the decision as JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },
}

/// Combined artifact emitted by `decide --json`.
#[derive(Serialize)]
struct DecisionReport {
    local: LocalModerationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<ModerationDecision>,
    outcome: ModerationOutcome,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("palisade=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { text, json } => {
            let config = Config::load()?;
            let classifier = build_classifier(&config)?;
            let result = classifier.classify(&text);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                terminal::display_local_result(&result);
            }
        }

        Commands::Decide { text, json } => {
            let config = Config::load()?;
            config.require_provider()?;

            let classifier = build_classifier(&config)?;
            let local = classifier.classify(&text);

            let provider = OpenAiModerationProvider::new(
                config.moderation_api_key.clone(),
                config.moderation_url.clone(),
                config.moderation_model.clone(),
            );

            // A failed external call is treated as an absent verdict, which
            // fusion turns into a forced block.
            let decision = match provider.moderate(&text).await {
                Ok(decision) => Some(decision),
                Err(error) => {
                    warn!(%error, "External moderation failed, failing closed");
                    None
                }
            };

            let outcome = fuse(
                decision.as_ref(),
                local.tech_intent,
                &local.reasons,
                local.suspicion_score,
            );

            if json {
                let report = DecisionReport {
                    local,
                    decision,
                    outcome,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_local_result(&local);
                terminal::display_outcome(&outcome, decision.as_ref());
            }
        }
    }

    Ok(())
}

fn build_classifier(config: &Config) -> Result<LocalClassifier> {
    let store = Arc::new(LexiconStore::new(config.lexicon_dir.clone()));
    LocalClassifier::new(store, &config.subject)
}
