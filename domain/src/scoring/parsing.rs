//! Oracle response parsing
//!
//! Oracles reply with free-form text expected to embed a JSON object, often
//! wrapped in commentary or code fences. These helpers locate the first
//! balanced `{...}` span and decode it against a strict schema.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while decoding an oracle response
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No JSON object found in oracle response")]
    NoJson,

    #[error("Malformed oracle JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Locate the first balanced `{...}` span in `text`.
///
/// Tracks double-quoted strings and backslash escapes so braces inside
/// string values never unbalance the scan. Returns `None` when no complete
/// object is present.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Wire schema of a batch scoring response
#[derive(Debug, Clone, Deserialize)]
pub struct BatchScoresResponse {
    pub scores: Vec<RawScoreEntry>,
}

/// One scored entry as reported by the oracle.
///
/// `index` refers to the prompt-local candidate numbering. Subscores arrive
/// as raw integers and are range-checked later; any total the oracle volunteers
/// is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScoreEntry {
    pub index: usize,
    pub innovation: i64,
    pub technical: i64,
    pub practical: i64,
}

/// Wire schema of a detailed analysis response
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub tags: Vec<String>,
    pub evaluation: String,
    pub summary: String,
}

/// Extract and decode the batch scoring payload from raw oracle text
pub fn parse_batch_scores(text: &str) -> Result<BatchScoresResponse, ParseError> {
    let span = first_json_object(text).ok_or(ParseError::NoJson)?;
    Ok(serde_json::from_str(span)?)
}

/// Extract and decode a detailed analysis payload from raw oracle text
pub fn parse_analysis(text: &str) -> Result<AnalysisResponse, ParseError> {
    let span = first_json_object(text).ok_or(ParseError::NoJson)?;
    Ok(serde_json::from_str(span)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let parsed = parse_batch_scores(
            r#"{"scores":[{"index":0,"innovation":30,"technical":25,"practical":20}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.scores.len(), 1);
        assert_eq!(parsed.scores[0].index, 0);
        assert_eq!(parsed.scores[0].innovation, 30);
    }

    #[test]
    fn test_commentary_around_json() {
        let text = r#"Sure! Here are the scores you asked for:

```json
{"scores": [{"index": 1, "innovation": 10, "technical": 9, "practical": 8}]}
```

Let me know if you need anything else."#;
        let parsed = parse_batch_scores(text).unwrap();
        assert_eq!(parsed.scores[0].index, 1);
    }

    #[test]
    fn test_braces_inside_strings_do_not_unbalance() {
        let text = r#"note: {"evaluation": "uses {braces} and \"quotes\"", "summary": "ok", "tags": []} trailing"#;
        let span = first_json_object(text).unwrap();
        assert!(span.ends_with('}'));
        let parsed = parse_analysis(text).unwrap();
        assert_eq!(parsed.evaluation, r#"uses {braces} and "quotes""#);
    }

    #[test]
    fn test_first_object_wins() {
        let text = r#"{"scores":[]} {"scores":[{"index":0,"innovation":1,"technical":1,"practical":1}]}"#;
        let parsed = parse_batch_scores(text).unwrap();
        assert!(parsed.scores.is_empty());
    }

    #[test]
    fn test_nested_objects_balance() {
        let text = r#"{"scores":[{"index":0,"innovation":5,"technical":5,"practical":5}],"meta":{"model":"x"}}"#;
        assert_eq!(first_json_object(text), Some(text));
    }

    #[test]
    fn test_no_json_found() {
        assert!(matches!(
            parse_batch_scores("no object here"),
            Err(ParseError::NoJson)
        ));
        assert!(matches!(
            parse_batch_scores("{\"unterminated\": "),
            Err(ParseError::NoJson)
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_batch_scores(r#"{"scores": [{"index": 0}]}"#),
            Err(ParseError::Json(_))
        ));
        assert!(matches!(
            parse_batch_scores(r#"{"results": []}"#),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_analysis_tags_default_empty() {
        let parsed =
            parse_analysis(r#"{"evaluation":"solid work","summary":"a solid paper"}"#).unwrap();
        assert!(parsed.tags.is_empty());
        assert_eq!(parsed.summary, "a solid paper");
    }
}
