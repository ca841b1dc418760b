//! Prompt builders for the transform pipeline.
//!
//! Two prompts per request: one to split and classify the submitted text,
//! one to rewrite the classified chunks into functional language with the
//! selected few-shot examples spliced in.

use crate::fewshot::ScoredExample;

/// Builds the split-and-classify prompt for the first LLM call.
pub fn build_split_classify_prompt(user_text: &str) -> String {
    format!(
        "Objective: Split the provided text into chunks based on the following categories: \
'criticism', 'contempt', 'defensiveness', 'stonewalling', 'neutral'. \
If a text chunk does not belong to any specified category, classify it as 'other'.

Categories Defined:

1. 'criticism': Ad hominem attacks on a partner's character rather than addressing \
specific issues, distinguishing it from a complaint, which targets a specific behavior.
2. 'contempt': An extreme form of criticism, characterized by treating a partner with \
disrespect, sarcasm, and mockery, making them feel despised and worthless.
3. 'defensiveness': A response to criticism where one attempts to excuse their behavior \
and avoid taking responsibility, often resulting in blame-shifting.
4. 'stonewalling': One partner withdraws from the interaction, shutting down \
communication in response to contempt.
5. 'neutral': Text that does not exhibit negative communication patterns. Use this for \
communication that is understanding, supportive, factual without emotional charge, or \
otherwise not indicative of conflict.
6. 'unclear': Use this category if the text does not clearly fit into any of the above \
categories or if it is ambiguous.

Instructions:

1. Read the text thoroughly.
2. Identify and extract chunks of text that belong to the specified categories.
3. Label each chunk with the corresponding category name.
4. If a text chunk does not fit any of the specified categories, label it as 'other'.
5. Present the categorized text chunks in exactly this format, repeated per chunk:

Category: [Category Name]
Text: [Extracted Text Chunk]

Please proceed with categorizing the following text:

{user_text}"
    )
}

/// Builds the few-shot rewrite prompt for the second LLM call.
///
/// `classified_chunks` is the block-rendered classifier output; `examples`
/// are the nearest stored rewrites, most similar first.
pub fn build_rewrite_prompt(classified_chunks: &str, examples: &[ScoredExample<'_>]) -> String {
    let mut example_section = String::new();
    for scored in examples {
        example_section.push_str("Original: ");
        example_section.push_str(&scored.example.original);
        example_section.push_str("\nFunctional: ");
        example_section.push_str(&scored.example.functional);
        example_section.push_str("\n\n");
    }

    format!(
        "Objective: Transform the following categorized text chunks into a single, cohesive \
paragraph using functional language. Make each part of the text actionable or practical, \
while maintaining a natural, conversational tone.

Instructions:

1. Review the text chunks provided below.
2. Convert each chunk into functional, everyday language, focusing on making the content \
actionable or practical.
3. Do not reformulate chunks in the 'neutral' category.
4. Merge all converted text into one continuous paragraph, ensuring a smooth flow that \
naturally transitions from one idea to the next.
5. Avoid mentioning the original categories and do not separate the text into distinct \
sections.
6. Aim for a conversational tone, as if explaining to a friend.

Here are examples of rewrites in the expected style:

{example_section}\
Please proceed with transforming the following text chunks into functional language:

{classified_chunks}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fewshot::FewShotExample;

    fn scored(example: &FewShotExample) -> ScoredExample<'_> {
        ScoredExample {
            example,
            similarity: 0.9,
        }
    }

    #[test]
    fn test_classify_prompt_contains_text_and_categories() {
        let prompt = build_split_classify_prompt("You never listen to me!");
        assert!(prompt.contains("You never listen to me!"));
        for category in [
            "'criticism'",
            "'contempt'",
            "'defensiveness'",
            "'stonewalling'",
            "'neutral'",
        ] {
            assert!(prompt.contains(category), "missing {category}");
        }
        assert!(prompt.contains("Category: [Category Name]"));
    }

    #[test]
    fn test_rewrite_prompt_splices_examples_and_chunks() {
        let example = FewShotExample {
            original: "You always ruin everything.".to_string(),
            functional: "I would like us to plan this together.".to_string(),
            embedding: vec![0.0],
        };
        let chunks = "Category: criticism\nText: You always ruin everything.\n\n";
        let prompt = build_rewrite_prompt(chunks, &[scored(&example)]);

        assert!(prompt.contains("Original: You always ruin everything."));
        assert!(prompt.contains("Functional: I would like us to plan this together."));
        assert!(prompt.contains(chunks.trim_end()));
        assert!(prompt.contains("single, cohesive"));
    }

    #[test]
    fn test_rewrite_prompt_without_examples_still_valid() {
        let prompt = build_rewrite_prompt("Category: neutral\nText: Hello.\n", &[]);
        assert!(prompt.contains("Category: neutral"));
        assert!(!prompt.contains("Original: "));
    }
}
