// Colored terminal output for verdicts and outcomes.
//
// This module handles all terminal-specific formatting; main.rs delegates
// here so display stays out of the decision path.

use colored::Colorize;

use crate::classify::LocalModerationResult;
use crate::fusion::{ModerationDecision, ModerationOutcome};

/// Display the local classifier's verdict for one message.
pub fn display_local_result(result: &LocalModerationResult) {
    println!("\n{}", "=== Local verdict ===".bold());

    let flag_str = if result.flagged {
        "flagged".red().bold().to_string()
    } else {
        "clean".green().to_string()
    };
    println!("  Verdict: {flag_str}");
    println!("  Suspicion: {:.2}", result.suspicion_score);

    if !result.reasons.is_empty() {
        let reasons: Vec<&str> = result.reasons.iter().map(|r| r.as_str()).collect();
        println!("  Reasons: {}", reasons.join(", ").yellow());
    }
    if !result.lexicon_matches.is_empty() {
        println!(
            "  Lexicon matches: {}",
            result.lexicon_matches.join(", ").red()
        );
    }

    let languages: Vec<&str> = result.languages.iter().map(|l| l.as_str()).collect();
    println!("  Languages: {}", languages.join(", "));
    println!(
        "  Professional intent: {}  |  Tech intent: {}",
        yes_no(result.professional_intent),
        yes_no(result.tech_intent)
    );
    println!(
        "  Normalized: {}",
        truncate_chars(&result.normalized, 80).dimmed()
    );
}

/// Display the fused outcome, with the external verdict when present.
pub fn display_outcome(outcome: &ModerationOutcome, decision: Option<&ModerationDecision>) {
    println!("\n{}", "=== Moderation outcome ===".bold());

    let action = if outcome.should_block {
        "BLOCK".red().bold().to_string()
    } else {
        "ALLOW".green().bold().to_string()
    };
    println!("  Action: {action}");
    println!("  Effective label: {}", outcome.effective_label);

    if outcome.downgraded {
        println!(
            "  {} ambiguous unsafe verdict downgraded on tech intent",
            "~".yellow()
        );
    }
    if let Some(decision) = decision {
        let confidence = decision
            .confidence
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  External: {} (confidence {})",
            decision.label, confidence
        );
        if let Some(model) = &decision.model {
            println!("  Model: {model}");
        }
    } else {
        println!(
            "  External: {} (failed closed)",
            "unavailable".red()
        );
    }
}

/// Truncate a string to at most `max` characters, appending "..." when
/// anything was cut. Operates on chars, not bytes, so multi-byte text is
/// never split mid-character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max).collect();
        format!("{truncated}...")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
