use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum length of a submitted text, in characters.
pub const MIN_TEXT_LEN: usize = 10;

/// Gottman's communication styles ("The Four Horsemen"), plus the
/// classifier's fallback labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    Criticism,
    Contempt,
    Defensiveness,
    Stonewalling,
    Neutral,
    Unclear,
    /// Chunks the classifier could not place in any category.
    Other,
}

impl CommunicationStyle {
    /// Parses a label emitted by the classifier. Unknown labels map to
    /// `Unclear` rather than failing the whole pipeline.
    pub fn parse_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "criticism" => Self::Criticism,
            "contempt" => Self::Contempt,
            "defensiveness" => Self::Defensiveness,
            "stonewalling" => Self::Stonewalling,
            "neutral" => Self::Neutral,
            "other" => Self::Other,
            _ => Self::Unclear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Criticism => "criticism",
            Self::Contempt => "contempt",
            Self::Defensiveness => "defensiveness",
            Self::Stonewalling => "stonewalling",
            Self::Neutral => "neutral",
            Self::Unclear => "unclear",
            Self::Other => "other",
        }
    }
}

/// A stored transformation record.
///
/// Invariant: `splitted_text` and `communication_style` always have the
/// same length — one style label per classified chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub original_text: String,
    /// The final rewrite prompt sent to the LLM.
    pub prompt: String,
    /// Raw output of the classifier call, kept for inspection.
    pub raw_output: String,
    pub splitted_text: Vec<String>,
    pub communication_style: Vec<CommunicationStyle>,
    pub transformed_text: String,
    /// Token usage summed across both LLM calls.
    pub total_tokens: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub original_text: String,
}

/// Partial update — only present fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMessageRequest {
    pub original_text: Option<String>,
    pub prompt: Option<String>,
    pub raw_output: Option<String>,
    pub splitted_text: Option<Vec<String>>,
    pub communication_style: Option<Vec<CommunicationStyle>>,
    pub transformed_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_known_categories() {
        assert_eq!(
            CommunicationStyle::parse_label("criticism"),
            CommunicationStyle::Criticism
        );
        assert_eq!(
            CommunicationStyle::parse_label(" Contempt "),
            CommunicationStyle::Contempt
        );
        assert_eq!(
            CommunicationStyle::parse_label("STONEWALLING"),
            CommunicationStyle::Stonewalling
        );
    }

    #[test]
    fn test_parse_label_unknown_falls_back_to_unclear() {
        assert_eq!(
            CommunicationStyle::parse_label("sarcasm"),
            CommunicationStyle::Unclear
        );
        assert_eq!(
            CommunicationStyle::parse_label(""),
            CommunicationStyle::Unclear
        );
    }

    #[test]
    fn test_style_serializes_lowercase() {
        let json = serde_json::to_string(&CommunicationStyle::Defensiveness).unwrap();
        assert_eq!(json, "\"defensiveness\"");
    }

    #[test]
    fn test_parse_label_round_trips_as_str() {
        for style in [
            CommunicationStyle::Criticism,
            CommunicationStyle::Contempt,
            CommunicationStyle::Defensiveness,
            CommunicationStyle::Stonewalling,
            CommunicationStyle::Neutral,
            CommunicationStyle::Unclear,
            CommunicationStyle::Other,
        ] {
            assert_eq!(CommunicationStyle::parse_label(style.as_str()), style);
        }
    }
}
