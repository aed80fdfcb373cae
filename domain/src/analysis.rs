//! Detailed analysis entities (stage 2)

use serde::{Deserialize, Serialize};

/// The deep dive produced for one top-ranked candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    /// Id of the analyzed candidate
    pub candidate_id: String,
    /// Topic tags assigned by the oracle
    pub tags: Vec<String>,
    /// Critical evaluation of strengths and weaknesses
    pub evaluation: String,
    /// Short accessible summary
    pub summary: String,
}

impl DetailedAnalysis {
    pub fn new(
        candidate_id: impl Into<String>,
        tags: Vec<String>,
        evaluation: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            tags,
            evaluation: evaluation.into(),
            summary: summary.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_serializes_all_fields() {
        let analysis = DetailedAnalysis::new(
            "2401.1234",
            vec!["nlp".to_string()],
            "Thorough ablations.",
            "A new attention variant.",
        );
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"candidate_id\":\"2401.1234\""));
        assert!(json.contains("\"tags\":[\"nlp\"]"));
    }
}
