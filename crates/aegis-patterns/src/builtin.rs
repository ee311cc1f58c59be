use crate::rule::{Pattern, Rule};

/// Keyword rules for the classic instruction-override / role-hijack
/// injection families. Weighted by how unambiguous the phrasing is: a
/// bare "ignore previous instructions" is weight 3 (high) on its own, and
/// only escalates to critical alongside a second signal (another rule
/// firing, or a semantic confirmation upstream).
pub fn injection_keyword_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "builtin-instruction-override",
            "Instruction Override",
            "injection",
            3,
            vec![
                Pattern::keyword("ignore previous instructions"),
                Pattern::keyword("ignore all previous instructions"),
                Pattern::keyword("disregard your instructions"),
                Pattern::keyword("forget everything above"),
            ],
        ),
        Rule::new(
            "builtin-role-override",
            "Role Override",
            "injection",
            3,
            vec![
                Pattern::keyword("you are now"),
                Pattern::keyword("new system prompt"),
                Pattern::keyword("act as if you have no restrictions"),
                Pattern::keyword("developer mode"),
            ],
        ),
        Rule::new(
            "builtin-exfiltration-request",
            "Exfiltration Request",
            "injection",
            4,
            vec![
                Pattern::keyword("reveal your system prompt"),
                Pattern::keyword("print your instructions"),
                Pattern::keyword("send this to"),
            ],
        ),
    ]
}

/// Unicode tag characters (U+E0001..U+E007F) and zero-width characters
/// (U+200B-U+200D, U+2060, U+FEFF) are always weight-4 rules: both are
/// classic prompt-injection smuggling vectors with no legitimate use in
/// plain-text agent input.
pub fn hidden_unicode_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "builtin-unicode-tag-chars",
            "Unicode Tag Characters",
            "encoding-evasion",
            4,
            vec![Pattern::regex(r"[\u{E0001}\u{E0020}-\u{E007F}]")],
        ),
        Rule::new(
            "builtin-zero-width-chars",
            "Zero-Width Characters",
            "encoding-evasion",
            4,
            vec![Pattern::regex(
                r"[\u{200B}\u{200C}\u{200D}\u{2060}\u{FEFF}]",
            )],
        ),
    ]
}
