use regex::RegexBuilder;

/// Case-insensitive regex match against `text`, falling back to a literal
/// case-insensitive substring match if `pattern` fails to compile as a
/// regex. A malformed rule degrades gracefully rather than panicking or
/// being silently dropped.
pub fn matches(pattern: &str, text: &str) -> bool {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(text),
        Err(_) => text.to_lowercase().contains(&pattern.to_lowercase()),
    }
}

/// Returns the first pattern in `rules` that matches `text`, if any.
pub fn first_match<'a>(rules: &'a [String], text: &str) -> Option<&'a str> {
    rules.iter().find(|p| matches(p, text)).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_regex_matches_case_insensitively() {
        assert!(matches(r"^rm\s+-rf", "RM -RF /tmp"));
    }

    #[test]
    fn malformed_regex_falls_back_to_literal_substring() {
        assert!(matches("rm -rf [", "found rm -rf [ in here"));
        assert!(!matches("rm -rf [", "nothing dangerous here"));
    }

    #[test]
    fn first_match_returns_first_hit_in_list_order() {
        let rules = vec!["alpha".to_string(), "beta".to_string()];
        assert_eq!(first_match(&rules, "this has beta in it"), Some("beta"));
    }
}
