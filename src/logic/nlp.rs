//! Report NLP - keyword/sentiment annotation
//!
//! Lightweight, deterministic: substring matching on the lowercased text.

use super::reports::{NlpAnalysis, Sentiment};

pub const FLOOD_KEYWORDS: &[&str] = &["flood", "water", "rain", "rising", "overflow"];
pub const URGENT_TERMS: &[&str] = &["severe", "dangerous", "urgent"];

/// Summary length in characters before truncation
pub const SUMMARY_CHARS: usize = 60;

pub fn analyze_description(description: &str) -> NlpAnalysis {
    let lowered = description.to_lowercase();

    let keywords = FLOOD_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();

    let sentiment = if URGENT_TERMS.iter().any(|t| lowered.contains(t)) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    NlpAnalysis {
        keywords,
        sentiment,
        summary: summarize(description),
    }
}

fn summarize(description: &str) -> String {
    if description.chars().count() > SUMMARY_CHARS {
        let head: String = description.chars().take(SUMMARY_CHARS).collect();
        format!("{}...", head)
    } else {
        description.to_string()
    }
}
