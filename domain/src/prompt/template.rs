//! Prompt templates for the ranking pipeline

use crate::core::Candidate;
use crate::scoring::{INNOVATION_MAX, PRACTICAL_MAX, TECHNICAL_MAX};
use crate::util::truncate_str;

/// Longest abstract fragment embedded in a prompt, in bytes
const MAX_ABSTRACT_BYTES: usize = 2000;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for batch scoring
    pub fn scoring_system() -> &'static str {
        r#"You are an experienced reviewer for a top-tier machine learning venue.
You score research papers from their title and abstract on three dimensions:
- innovation: novelty of the problem or approach (0-40)
- technical: technical quality and rigor (0-30)
- practical: practical value of the results (0-30)

Judge each paper on its own merits. Respond with a single JSON object and
nothing else. Do not add totals; they are computed from your subscores."#
    }

    /// User prompt scoring every candidate in a batch.
    ///
    /// Candidates are enumerated with a stable zero-based index; the
    /// response must refer back to papers by that index.
    pub fn scoring_batch(candidates: &[Candidate]) -> String {
        let mut prompt = format!(
            "Score the following {} papers.\n\nPapers:\n",
            candidates.len()
        );

        for (index, candidate) in candidates.iter().enumerate() {
            prompt.push_str(&format!(
                "\n[{}] {}\nAbstract: {}\n",
                index,
                candidate.title,
                truncate_str(&candidate.abstract_text, MAX_ABSTRACT_BYTES)
            ));
        }

        prompt.push_str(&format!(
            r#"
Reply with exactly one JSON object of this shape, one entry per paper:

{{"scores": [{{"index": 0, "innovation": 0-{INNOVATION_MAX}, "technical": 0-{TECHNICAL_MAX}, "practical": 0-{PRACTICAL_MAX}}}]}}

Every paper above must appear exactly once, identified by its index."#
        ));

        prompt
    }

    /// System prompt for the stage-2 deep dive
    pub fn analysis_system() -> &'static str {
        r#"You are an experienced reviewer writing a short assessment of a single
research paper for a broad technical audience. Ground every claim in the
title and abstract you are given. Respond with a single JSON object and
nothing else."#
    }

    /// User prompt requesting the deep dive for one candidate
    pub fn analysis_request(candidate: &Candidate) -> String {
        format!(
            r#"Analyze the following paper.

Title: {}
Abstract: {}

Reply with exactly one JSON object of this shape:

{{"tags": ["topic", "..."], "evaluation": "strengths and weaknesses", "summary": "2-3 sentence plain-language summary"}}"#,
            candidate.title,
            truncate_str(&candidate.abstract_text, MAX_ABSTRACT_BYTES)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, title: &str) -> Candidate {
        Candidate::new(id, title, format!("Abstract of {title}"))
    }

    #[test]
    fn test_scoring_batch_enumerates_with_stable_indices() {
        let batch = vec![paper("a", "Paper Alpha"), paper("b", "Paper Beta")];
        let prompt = PromptTemplate::scoring_batch(&batch);
        assert!(prompt.contains("[0] Paper Alpha"));
        assert!(prompt.contains("[1] Paper Beta"));
        assert!(prompt.contains("\"innovation\": 0-40"));
        assert!(prompt.contains("one entry per paper"));
    }

    #[test]
    fn test_scoring_batch_truncates_long_abstracts() {
        let long = Candidate::new("x", "Long", "y".repeat(10_000));
        let prompt = PromptTemplate::scoring_batch(std::slice::from_ref(&long));
        assert!(prompt.len() < 5_000);
    }

    #[test]
    fn test_analysis_request_includes_paper() {
        let c = paper("a", "Paper Alpha");
        let prompt = PromptTemplate::analysis_request(&c);
        assert!(prompt.contains("Paper Alpha"));
        assert!(prompt.contains("\"tags\""));
    }
}
