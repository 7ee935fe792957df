//! Prompt templates for answer synthesis and summarization

use crate::retrieval::ScoredPassage;

/// Prompt builder for grounded generation
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build numbered context from retrieved passages
    pub fn build_context(passages: &[ScoredPassage]) -> String {
        let mut context = String::new();

        for (i, scored) in passages.iter().enumerate() {
            let p = &scored.passage;
            let pages = if p.page_start == p.page_end {
                format!("page {}", p.page_start)
            } else {
                format!("pages {}-{}", p.page_start, p.page_end)
            };

            context.push_str(&format!(
                "[{}] ({})\n{}\n\n---\n\n",
                i + 1,
                pages,
                p.text.trim()
            ));
        }

        context
    }

    /// Build the question-answering prompt
    pub fn build_answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are an assistant that answers questions about a single document.

INSTRUCTIONS:
1. Answer using ONLY the numbered passages below
2. Reference passages by number, e.g. "as passage [2] states"
3. If the passages do not contain the answer, say "The document does not contain enough information to answer this question"
4. Do not invent facts that are not in the passages

PASSAGES:
{context}

QUESTION: {question}

Answer:"#,
            context = context,
            question = question
        )
    }

    /// Build a single-pass summary prompt
    pub fn build_summary_prompt(text: &str) -> String {
        format!(
            r#"Summarize the following document. Structure the summary as:
- one opening sentence stating what the document is about
- key points as a short bullet list
- one closing sentence on conclusions, if any

DOCUMENT:
{text}

Summary:"#,
            text = text
        )
    }

    /// Build the reduce prompt combining first-pass section summaries
    pub fn build_reduce_prompt(section_summaries: &[String]) -> String {
        let sections = section_summaries
            .iter()
            .enumerate()
            .map(|(i, s)| format!("Section {}:\n{}", i + 1, s.trim()))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"The following are summaries of consecutive sections of one document.
Combine them into a single coherent summary. Structure it as:
- one opening sentence stating what the document is about
- key points as a short bullet list
- one closing sentence on conclusions, if any

{sections}

Combined summary:"#,
            sections = sections
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Passage;

    fn scored(seq: u32, page_start: u32, page_end: u32, text: &str) -> ScoredPassage {
        ScoredPassage {
            passage: Passage {
                seq,
                start: 0,
                end: text.len(),
                page_start,
                page_end,
                text: text.to_string(),
            },
            score: 0.5,
        }
    }

    #[test]
    fn context_numbers_passages_with_pages() {
        let context = PromptBuilder::build_context(&[
            scored(0, 1, 1, "first passage"),
            scored(1, 2, 3, "second passage"),
        ]);

        assert!(context.contains("[1] (page 1)"));
        assert!(context.contains("[2] (pages 2-3)"));
        assert!(context.contains("first passage"));
    }

    #[test]
    fn answer_prompt_embeds_question_and_context() {
        let prompt = PromptBuilder::build_answer_prompt("what rise?", "[1] (page 1)\n2% rise");
        assert!(prompt.contains("QUESTION: what rise?"));
        assert!(prompt.contains("2% rise"));
    }

    #[test]
    fn reduce_prompt_numbers_sections() {
        let prompt =
            PromptBuilder::build_reduce_prompt(&["intro part".into(), "methods part".into()]);
        assert!(prompt.contains("Section 1:"));
        assert!(prompt.contains("Section 2:"));
        assert!(prompt.contains("methods part"));
    }
}
