use crate::score::{CriterionScore, ScoreVerdict};

const STOPWORDS: &[&str] = &[
    "this", "that", "with", "from", "have", "has", "had", "were", "was", "are", "the", "and",
    "for", "not", "but", "which", "their", "into", "can", "will", "would", "should", "could",
    "about", "there", "also", "than", "then", "when", "what", "where", "does", "doing", "done",
    "been", "being", "only", "such", "some", "each", "more", "most", "very", "just", "over",
];

const FAILURE_INDICATORS: &[&str] = &["error", "fail", "failed", "failing", "broken", "exception", "crash", "denied", "rejected", "timeout"];

const PROXIMITY_WINDOW: usize = 50;

fn content_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 4)
        .map(|w| w.to_lowercase())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Term-presence scoring: fraction of the criterion's content words (≥ 4
/// chars, minus stopwords) that appear in the transcript. A strong
/// failure indicator within ±50 chars of any matched term overrides the
/// ratio-based verdict to `Failed`.
pub fn score(criterion_text: &str, transcript: &str) -> CriterionScore {
    let words = content_words(criterion_text);
    if words.is_empty() {
        return CriterionScore::new(ScoreVerdict::NeedsHuman, "semantic", None);
    }

    let lower_transcript = transcript.to_lowercase();
    let mut matched = 0usize;
    let mut failure_nearby = false;
    let mut first_match_snippet = None;

    for word in &words {
        if let Some(idx) = lower_transcript.find(word.as_str()) {
            matched += 1;
            if first_match_snippet.is_none() {
                first_match_snippet = Some(snippet(transcript, idx));
            }
            if failure_indicator_nearby(&lower_transcript, idx, word.len()) {
                failure_nearby = true;
            }
        }
    }

    let ratio = matched as f64 / words.len() as f64;

    if failure_nearby {
        return CriterionScore::new(ScoreVerdict::Failed, "semantic", first_match_snippet);
    }

    let verdict = if ratio >= 0.6 {
        ScoreVerdict::Satisfied
    } else if ratio >= 0.3 {
        ScoreVerdict::Partial
    } else {
        ScoreVerdict::NeedsHuman
    };

    CriterionScore::new(verdict, "semantic", first_match_snippet)
}

/// Walks backward from `idx` (clamped to `s.len()`) to the nearest char
/// boundary, so the result is always a valid slice index.
fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Walks forward from `idx` (clamped to `s.len()`) to the nearest char
/// boundary, so the result is always a valid slice index.
fn ceil_char_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

fn failure_indicator_nearby(lower_transcript: &str, match_idx: usize, match_len: usize) -> bool {
    let start = floor_char_boundary(lower_transcript, match_idx.saturating_sub(PROXIMITY_WINDOW));
    let end = ceil_char_boundary(lower_transcript, (match_idx + match_len + PROXIMITY_WINDOW).min(lower_transcript.len()));
    let window = &lower_transcript[start..end];
    FAILURE_INDICATORS.iter().any(|ind| window.contains(ind))
}

fn snippet(transcript: &str, byte_index: usize) -> String {
    let start = floor_char_boundary(transcript, byte_index.saturating_sub(30));
    let end = ceil_char_boundary(transcript, (byte_index + 30).min(transcript.len()));
    transcript[start..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_term_presence_satisfies() {
        let score = score(
            "rate limiter correctly throttles bursty consumers",
            "verified the rate limiter throttles bursty consumers without dropping requests",
        );
        assert_eq!(score.verdict, ScoreVerdict::Satisfied);
    }

    #[test]
    fn partial_term_presence_is_partial() {
        let score = score(
            "rate limiter correctly throttles bursty malicious consumers",
            "the rate limiter and its consumers seem fine",
        );
        assert_eq!(score.verdict, ScoreVerdict::Partial);
    }

    #[test]
    fn low_term_presence_needs_human() {
        let score = score("rate limiter correctly throttles bursty consumers", "unrelated transcript content here");
        assert_eq!(score.verdict, ScoreVerdict::NeedsHuman);
    }

    #[test]
    fn failure_indicator_near_match_overrides_to_failed() {
        let score = score(
            "rate limiter throttles consumers",
            "the rate limiter crashed with an exception while throttling consumers",
        );
        assert_eq!(score.verdict, ScoreVerdict::Failed);
    }

    #[test]
    fn multibyte_characters_near_a_match_do_not_panic() {
        let transcript = "rate limiter \u{1F680}\u{1F680}\u{1F680} throttles consumers crashed \u{00e9}\u{00e9}\u{00e9} with an exception";
        let score = score("rate limiter throttles consumers", transcript);
        assert_eq!(score.verdict, ScoreVerdict::Failed);
    }

    #[test]
    fn distant_failure_indicator_does_not_override() {
        let long_gap = "x".repeat(200);
        let transcript = format!("rate limiter throttles consumers just fine{long_gap}unrelated error elsewhere");
        let score = score("rate limiter throttles consumers", &transcript);
        assert_ne!(score.verdict, ScoreVerdict::Failed);
    }
}
