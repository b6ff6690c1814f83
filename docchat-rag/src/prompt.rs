//! Prompt assembly.
//!
//! [`PromptAssembler::build`] is a pure function of its inputs: identical
//! arguments always produce a byte-identical prompt.

use std::fmt::Write;

use docchat_core::{Mode, is_search_sentinel};

const KNOWLEDGE_BASE_HEADING: &str = "## Relevant Information from Knowledge Base:";
const WEB_SEARCH_HEADING: &str = "## Live Web Search Results:";

/// Fixed per-mode instruction appended to every prompt.
pub fn mode_instruction(mode: Mode) -> &'static str {
    match mode {
        Mode::Concise => "Provide a concise answer. Keep it brief and under 50 words.",
        Mode::Detailed => "Provide a detailed answer with examples and explanations.",
    }
}

/// Merges retrieved chunks, web snippets and the question into one prompt.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_core::Mode;
/// use docchat_rag::PromptAssembler;
///
/// let prompt = PromptAssembler.build(
///     "What is the capital of France?",
///     &["Paris is the capital of France.".to_string()],
///     &[],
///     Mode::Concise,
/// );
/// assert!(prompt.contains("1. Paris is the capital of France."));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    /// Build the generation prompt.
    ///
    /// Blank entries are skipped. The web-search section is also skipped when
    /// `web_snippets` is a search sentinel. Without any context section the
    /// prompt is just the question and the mode instruction.
    pub fn build(
        &self,
        query: &str,
        retrieved_chunks: &[String],
        web_snippets: &[String],
        mode: Mode,
    ) -> String {
        let mut context = String::new();

        push_section(&mut context, KNOWLEDGE_BASE_HEADING, retrieved_chunks);
        if !is_search_sentinel(web_snippets) {
            push_section(&mut context, WEB_SEARCH_HEADING, web_snippets);
        }

        let instruction = mode_instruction(mode);
        if context.is_empty() {
            format!("Answer the following question: {query}\n\n{instruction}")
        } else {
            format!(
                "Based on the following information:\n\n{context}\
                 Please answer this question: {query}\n\n{instruction}"
            )
        }
    }
}

fn push_section(out: &mut String, heading: &str, entries: &[String]) {
    let mut entries = entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty()).peekable();
    if entries.peek().is_none() {
        return;
    }

    out.push_str(heading);
    out.push('\n');
    for (number, entry) in entries.enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}. {entry}", number + 1);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_prompt_layout() {
        let prompt = PromptAssembler.build(
            "Where is the tower?",
            &strings(&["The Eiffel Tower is in Paris."]),
            &strings(&["It was completed in 1889."]),
            Mode::Detailed,
        );

        let expected = "Based on the following information:\n\n\
            ## Relevant Information from Knowledge Base:\n\
            1. The Eiffel Tower is in Paris.\n\n\
            ## Live Web Search Results:\n\
            1. It was completed in 1889.\n\n\
            Please answer this question: Where is the tower?\n\n\
            Provide a detailed answer with examples and explanations.";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn bare_question_without_context() {
        let prompt = PromptAssembler.build("Why?", &[], &strings(&["  "]), Mode::Concise);
        assert_eq!(
            prompt,
            "Answer the following question: Why?\n\n\
             Provide a concise answer. Keep it brief and under 50 words."
        );
        assert!(!prompt.contains("Based on the following information"));
    }

    #[test]
    fn numbering_skips_blank_entries() {
        let prompt =
            PromptAssembler.build("q", &strings(&["first", "", "second"]), &[], Mode::Concise);
        assert!(prompt.contains("1. first\n2. second\n"));
    }
}
