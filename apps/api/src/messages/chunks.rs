//! Parsing of the classifier's block output.
//!
//! The split-and-classify call instructs the model to emit:
//!
//! ```text
//! Category: criticism
//! Text: Why would I do that to you?
//!
//! Category: neutral
//! Text: I understand your feelings.
//! ```
//!
//! Parsing is lenient: unknown category names map to `unclear`, blocks
//! without text are skipped, and text may wrap over several lines.

use tracing::warn;

use crate::messages::models::CommunicationStyle;

/// One classified chunk of the submitted text.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub style: CommunicationStyle,
    pub text: String,
}

/// Parses `Category:` / `Text:` blocks out of raw classifier output.
/// Returns an empty vec if nothing parseable is found.
pub fn parse_chunks(raw: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current_style: Option<CommunicationStyle> = None;
    let mut current_text: Option<String> = None;

    let mut flush = |style: &mut Option<CommunicationStyle>, text: &mut Option<String>| {
        if let (Some(s), Some(t)) = (style.take(), text.take()) {
            if !t.is_empty() {
                chunks.push(Chunk { style: s, text: t });
            }
        }
    };

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(label) = strip_prefix_ci(line, "category:") {
            flush(&mut current_style, &mut current_text);
            current_style = Some(CommunicationStyle::parse_label(label));
        } else if let Some(text) = strip_prefix_ci(line, "text:") {
            current_text = Some(text.trim().to_string());
        } else if let Some(text) = current_text.as_mut() {
            // Continuation of a wrapped text line.
            text.push(' ');
            text.push_str(line);
        }
    }

    flush(&mut current_style, &mut current_text);
    chunks
}

/// Parses classifier output, degrading to a single `unclear` chunk holding
/// the original text when no block is parseable. The pipeline never fails a
/// request because the classifier ignored the output format.
pub fn parse_chunks_or_fallback(raw: &str, original_text: &str) -> Vec<Chunk> {
    let chunks = parse_chunks(raw);
    if chunks.is_empty() {
        warn!("Classifier output had no parseable blocks, treating text as one chunk");
        return vec![Chunk {
            style: CommunicationStyle::Unclear,
            text: original_text.to_string(),
        }];
    }
    chunks
}

/// Renders chunks back into the block format for the rewrite prompt.
pub fn render_chunks(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        out.push_str("Category: ");
        out.push_str(chunk.style.as_str());
        out.push_str("\nText: ");
        out.push_str(&chunk.text);
        out.push_str("\n\n");
    }
    out
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_blocks() {
        let raw = "Category: criticism\n\
                   Text: Why would I do that to you?\n\
                   \n\
                   Category: neutral\n\
                   Text: I understand your feelings.\n";
        let chunks = parse_chunks(raw);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].style, CommunicationStyle::Criticism);
        assert_eq!(chunks[0].text, "Why would I do that to you?");
        assert_eq!(chunks[1].style, CommunicationStyle::Neutral);
    }

    #[test]
    fn test_parse_wrapped_text_line() {
        let raw = "Category: contempt\n\
                   Text: You always do this\n\
                   and you know it.\n";
        let chunks = parse_chunks(raw);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "You always do this and you know it.");
    }

    #[test]
    fn test_parse_unknown_category_maps_to_unclear() {
        let raw = "Category: passive-aggression\nText: Fine, whatever you say.";
        let chunks = parse_chunks(raw);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].style, CommunicationStyle::Unclear);
    }

    #[test]
    fn test_parse_case_insensitive_prefixes() {
        let raw = "CATEGORY: neutral\ntext: All good here.";
        let chunks = parse_chunks(raw);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].style, CommunicationStyle::Neutral);
        assert_eq!(chunks[0].text, "All good here.");
    }

    #[test]
    fn test_parse_block_without_text_is_skipped() {
        let raw = "Category: criticism\nCategory: neutral\nText: Kept.";
        let chunks = parse_chunks(raw);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Kept.");
    }

    #[test]
    fn test_parse_garbage_returns_empty() {
        assert!(parse_chunks("The model rambled with no structure at all.").is_empty());
        assert!(parse_chunks("").is_empty());
    }

    #[test]
    fn test_fallback_on_unparseable_output_is_one_unclear_chunk() {
        let chunks =
            parse_chunks_or_fallback("The model rambled freely.", "You never listen to me!");
        assert_eq!(
            chunks,
            vec![Chunk {
                style: CommunicationStyle::Unclear,
                text: "You never listen to me!".to_string(),
            }]
        );
    }

    #[test]
    fn test_fallback_passes_parseable_output_through() {
        let raw = "Category: neutral\nText: Dinner is at eight.";
        let chunks = parse_chunks_or_fallback(raw, "ignored original");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].style, CommunicationStyle::Neutral);
        assert_eq!(chunks[0].text, "Dinner is at eight.");
    }

    #[test]
    fn test_render_round_trips_through_parse() {
        let chunks = vec![
            Chunk {
                style: CommunicationStyle::Criticism,
                text: "You never help.".to_string(),
            },
            Chunk {
                style: CommunicationStyle::Neutral,
                text: "Dinner is at eight.".to_string(),
            },
        ];
        let rendered = render_chunks(&chunks);
        assert_eq!(parse_chunks(&rendered), chunks);
    }
}
