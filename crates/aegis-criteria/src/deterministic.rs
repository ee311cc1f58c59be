use regex::Regex;
use std::sync::OnceLock;

use crate::classify::Family;
use crate::score::{CriterionScore, ScoreVerdict};

struct FamilyMarkers {
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

fn file_exists_markers() -> FamilyMarkers {
    FamilyMarkers {
        positive: &["file exists", "path exists", "found the file"],
        negative: &["no such file or directory", "file not found", "does not exist", "path does not exist"],
    }
}

fn tests_pass_markers() -> FamilyMarkers {
    FamilyMarkers {
        positive: &["all tests passed", "tests passed", "0 failed", "test suite passed"],
        negative: &["tests failed", "test failed", "failures:", "FAILED"],
    }
}

/// Scan the transcript for this family's confirmed positive or negative
/// signal. Positive and negative markers are checked independently —
/// a transcript that contains both (e.g. a failing run followed by a
/// fix and a passing rerun) resolves to whichever signal appears later,
/// since that's the more recent ground truth.
fn check_markers(transcript: &str, markers: &FamilyMarkers) -> CriterionScore {
    let lower = transcript.to_lowercase();
    let last_positive = markers.positive.iter().filter_map(|m| lower.rfind(&m.to_lowercase())).max();
    let last_negative = markers.negative.iter().filter_map(|m| lower.rfind(&m.to_lowercase())).max();

    match (last_positive, last_negative) {
        (Some(p), Some(n)) if p > n => {
            CriterionScore::new(ScoreVerdict::Satisfied, "deterministic", Some(snippet(transcript, p)))
        }
        (Some(_), Some(n)) => CriterionScore::new(ScoreVerdict::Failed, "deterministic", Some(snippet(transcript, n))),
        (Some(p), None) => CriterionScore::new(ScoreVerdict::Satisfied, "deterministic", Some(snippet(transcript, p))),
        (None, Some(n)) => CriterionScore::new(ScoreVerdict::Failed, "deterministic", Some(snippet(transcript, n))),
        (None, None) => CriterionScore::new(ScoreVerdict::NeedsHuman, "deterministic", None),
    }
}

fn snippet(transcript: &str, byte_index: usize) -> String {
    let start = byte_index.saturating_sub(30);
    let end = (byte_index + 30).min(transcript.len());
    transcript[start..end].trim().to_string()
}

fn status_code(criterion_text: &str) -> Option<u16> {
    static CODE: OnceLock<Regex> = OnceLock::new();
    let re = CODE.get_or_init(|| Regex::new(r"(\d{3})").unwrap());
    re.captures(criterion_text)?.get(1)?.as_str().parse().ok()
}

fn check_status_code(criterion_text: &str, transcript: &str) -> CriterionScore {
    let Some(code) = status_code(criterion_text) else {
        return CriterionScore::new(ScoreVerdict::NeedsHuman, "deterministic", None);
    };
    let marker = code.to_string();
    match transcript.find(&marker) {
        Some(idx) => CriterionScore::new(ScoreVerdict::Satisfied, "deterministic", Some(snippet(transcript, idx))),
        None => CriterionScore::new(ScoreVerdict::NeedsHuman, "deterministic", None),
    }
}

fn quoted_text(criterion_text: &str) -> Option<String> {
    static QUOTED: OnceLock<Regex> = OnceLock::new();
    let re = QUOTED.get_or_init(|| Regex::new(r#"["“]([^"”]+)["”]"#).unwrap());
    re.captures(criterion_text).map(|c| c[1].to_string())
}

fn check_contains(criterion_text: &str, transcript: &str) -> CriterionScore {
    let Some(needle) = quoted_text(criterion_text) else {
        return CriterionScore::new(ScoreVerdict::NeedsHuman, "deterministic", None);
    };
    match transcript.find(&needle) {
        Some(idx) => CriterionScore::new(ScoreVerdict::Satisfied, "deterministic", Some(snippet(transcript, idx))),
        None => CriterionScore::new(ScoreVerdict::Failed, "deterministic", None),
    }
}

pub fn check(family: Family, criterion_text: &str, transcript: &str) -> CriterionScore {
    match family {
        Family::FileExists => check_markers(transcript, &file_exists_markers()),
        Family::TestsPass => check_markers(transcript, &tests_pass_markers()),
        Family::StatusCode => check_status_code(criterion_text, transcript),
        Family::ContainsText => check_contains(criterion_text, transcript),
    }
}
