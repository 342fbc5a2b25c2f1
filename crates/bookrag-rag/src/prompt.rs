//! Prompt assembly and answer scoring

use bookrag_core::{ChatMessage, Citation, RetrievedPassage, truncate_chars};

/// Instruction frame sent as the system message
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions about a book. \
Answer only from the context provided with the question. \
If the context does not contain enough information to answer, say so plainly. \
Refer to the documents you used by their number, e.g. [Document 1].";

/// Returned when the model produces no text
pub const FALLBACK_ANSWER: &str = "I couldn't generate a response based on the provided context.";

/// Placeholder used when no passage met the similarity threshold
pub const NO_CONTEXT: &str = "No relevant passages were found.";

/// Maximum characters of a passage placed in the prompt
pub const PASSAGE_CHARS: usize = 1000;

/// Build the chat messages for a query.
///
/// Passages must already be ordered by descending score.
pub fn build_messages(
    query: &str,
    selected_text: Option<&str>,
    passages: &[RetrievedPassage],
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(query, selected_text, passages)),
    ]
}

fn build_user_prompt(
    query: &str,
    selected_text: Option<&str>,
    passages: &[RetrievedPassage],
) -> String {
    let mut prompt = String::new();

    if let Some(selected) = selected_text {
        prompt.push_str(&format!("User selected this text:\n{}\n\n", selected));
    }

    prompt.push_str("Context:\n");
    if passages.is_empty() {
        prompt.push_str(NO_CONTEXT);
        prompt.push_str("\n\n");
    }

    for (i, passage) in passages.iter().enumerate() {
        match &passage.source.title {
            Some(title) => prompt.push_str(&format!("[Document {}] {}\n", i + 1, title)),
            None => prompt.push_str(&format!("[Document {}]\n", i + 1)),
        }
        prompt.push_str(truncate_chars(&passage.text, PASSAGE_CHARS));
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!("Question: {}", query));
    prompt
}

/// Mean of the passages' scores, each clamped to [0, 1]; zero without passages
pub fn confidence(passages: &[RetrievedPassage]) -> f32 {
    if passages.is_empty() {
        return 0.0;
    }

    let total: f32 = passages.iter().map(|p| p.score.clamp(0.0, 1.0)).sum();
    (total / passages.len() as f32).clamp(0.0, 1.0)
}

/// One citation per passage, in prompt order
pub fn citations(passages: &[RetrievedPassage]) -> Vec<Citation> {
    passages.iter().map(Citation::from_passage).collect()
}
