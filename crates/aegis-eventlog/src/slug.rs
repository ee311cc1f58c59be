/// Lowercased, alphanumeric, 1-5-word summary of `text` suitable for use in
/// a filename. Words are separated by `-`; anything that isn't
/// alphanumeric is treated as a word boundary and dropped.
pub fn slugify(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .take(5)
        .collect();

    if words.is_empty() {
        "event".to_string()
    } else {
        words.join("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_at_five_words() {
        let slug = slugify("one two three four five six seven");
        assert_eq!(slug, "one-two-three-four-five");
    }

    #[test]
    fn strips_punctuation_and_lowercases() {
        let slug = slugify("Dual-Confirmed Critical Injection!!");
        assert_eq!(slug, "dual-confirmed-critical-injection");
    }

    #[test]
    fn empty_text_falls_back_to_event() {
        assert_eq!(slugify(""), "event");
        assert_eq!(slugify("!!!"), "event");
    }
}
