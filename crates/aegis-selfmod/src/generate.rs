use aegis_patterns::RuleSet;
use aegis_trust::Category;
use chrono::{DateTime, Utc};

use crate::extract::ExtractedInsight;
use crate::proposal::{proposal_id, today, Proposal, ProposedAction};
use crate::validate::ValidationRecord;

/// Safety-validation failure for a would-be proposal. Neither case should
/// ever reach a human as a mystery — both name exactly what failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerateRejection {
    ForbiddenPattern,
    TargetOutsideAllowList,
}

/// Picks a category from an insight's techniques/topic. Not spec-defined
/// — generate must assign *some* category and spec.md is silent on how,
/// so this is a small keyword heuristic rather than a hard classifier;
/// it defaults to `SkillEnhancement` when nothing more specific matches.
pub fn classify_category(insight: &ExtractedInsight) -> Category {
    let haystack = format!("{} {}", insight.topic, insight.techniques.join(" ")).to_lowercase();

    if haystack.contains("security") || haystack.contains("vuln") || haystack.contains("injection") {
        Category::Security
    } else if haystack.contains("infra") || haystack.contains("deploy") || haystack.contains("pipeline") {
        Category::Infrastructure
    } else if haystack.contains("new skill") || haystack.contains("new capability") {
        Category::NewSkill
    } else if haystack.contains("config") {
        Category::ConfigChange
    } else if haystack.contains("test") {
        Category::TestAddition
    } else if haystack.contains("doc") || haystack.contains("readme") {
        Category::Documentation
    } else {
        Category::SkillEnhancement
    }
}

fn target_path_for(insight: &ExtractedInsight, category: Category) -> String {
    let slug: String = insight
        .topic
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    match category {
        Category::Documentation => format!("docs/{slug}.md"),
        Category::TestAddition => format!("tests/{slug}.rs"),
        Category::SkillEnhancement | Category::NewSkill => format!("skills/{slug}.md"),
        Category::ConfigChange => format!("config/{slug}.toml"),
        Category::Infrastructure => format!("infra/{slug}.toml"),
        Category::Security => format!("security/{slug}.md"),
    }
}

/// Form a `Proposal` from a passed insight, after checking its target
/// path against the configured allow-list and re-scanning for forbidden
/// patterns (extract already rejected the raw artifact, but the
/// generated description/target are new text this safety check also
/// covers).
pub fn generate(
    insight: &ExtractedInsight,
    validation: ValidationRecord,
    forbidden: &RuleSet,
    allowed_target_prefixes: &[String],
    now: DateTime<Utc>,
    seq: u32,
) -> Result<Proposal, GenerateRejection> {
    let category = classify_category(insight);
    let target_path = target_path_for(insight, category);
    let description = format!("Learned from: {}", insight.topic);

    if forbidden.scan(&description).detected() {
        return Err(GenerateRejection::ForbiddenPattern);
    }

    if !allowed_target_prefixes.iter().any(|prefix| target_path.starts_with(prefix.as_str())) {
        return Err(GenerateRejection::TargetOutsideAllowList);
    }

    let id = proposal_id(today(now), seq);
    let action = ProposedAction { target_path, description };
    Ok(Proposal::new(id, category, action, validation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::forbidden_ruleset;
    use crate::validate::Decision;
    use chrono::TimeZone;

    fn insight(topic: &str, techniques: &[&str]) -> ExtractedInsight {
        ExtractedInsight {
            source_hash: "deadbeef".into(),
            topic: topic.to_string(),
            claims: vec![],
            techniques: techniques.iter().map(|s| s.to_string()).collect(),
            code_blocks: vec![],
        }
    }

    fn passed_validation() -> ValidationRecord {
        ValidationRecord { scores: vec![], overall: 0.9, injection_score: 0.95, decision: Decision::Passed }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 28, 0, 0, 0).unwrap()
    }

    #[test]
    fn security_keyword_classifies_as_security_category() {
        assert_eq!(classify_category(&insight("sql injection defenses", &[])), Category::Security);
    }

    #[test]
    fn documentation_keyword_classifies_as_documentation() {
        assert_eq!(classify_category(&insight("updated README notes", &[])), Category::Documentation);
    }

    #[test]
    fn nothing_specific_defaults_to_skill_enhancement() {
        assert_eq!(classify_category(&insight("general improvement", &[])), Category::SkillEnhancement);
    }

    #[test]
    fn target_outside_allow_list_is_rejected() {
        let forbidden = forbidden_ruleset(&[]);
        let err = generate(&insight("readme updates", &[]), passed_validation(), &forbidden, &["skills/".to_string()], now(), 1)
            .unwrap_err();
        assert_eq!(err, GenerateRejection::TargetOutsideAllowList);
    }

    #[test]
    fn target_within_allow_list_generates_proposal() {
        let forbidden = forbidden_ruleset(&[]);
        let proposal = generate(&insight("readme updates", &[]), passed_validation(), &forbidden, &["docs/".to_string()], now(), 1).unwrap();
        assert!(proposal.action.target_path.starts_with("docs/"));
        assert_eq!(proposal.id, "autolearn-2026-07-28-001");
    }

    #[test]
    fn forbidden_pattern_in_description_is_rejected() {
        let forbidden = forbidden_ruleset(&["malicious".to_string()]);
        let err = generate(&insight("malicious behavior notes", &[]), passed_validation(), &forbidden, &["docs/".to_string()], now(), 1)
            .unwrap_err();
        assert_eq!(err, GenerateRejection::ForbiddenPattern);
    }
}
