//! Context and prompt construction.

use crate::result::SearchResult;

/// Separator placed between notes in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// First `limit` characters of `text`. Never splits a character.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Join retrieved notes into the context block, in retrieval order.
///
/// Each note contributes its title and at most `content_chars` characters
/// of its content.
pub fn build_context(results: &[SearchResult], content_chars: usize) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "Note: {}\n\nContent: {}",
                r.title,
                truncate_chars(&r.content, content_chars)
            )
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Build the grounded prompt sent to the generative model.
pub fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "Based on the following query: \"{query}\"\n\
         \n\
         Here are the most relevant notes I found:\n\
         \n\
         {context}\n\
         \n\
         Please provide a comprehensive answer to the query using ONLY the information from these notes.\n\
         If the notes don't contain relevant information to answer the query, please state that clearly.\n\
         Format your response in a clear and concise way, citing specific notes by title when relevant.\n"
    )
}
