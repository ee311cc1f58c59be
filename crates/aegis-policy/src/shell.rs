use regex::Regex;
use std::sync::OnceLock;

use aegis_config::PolicyConfig;

use crate::decision::RuleOutcome;
use crate::matcher::first_match;
use crate::safe_commands::is_known_safe_command;

/// Strips zero or more leading `NAME=value ` environment-variable
/// assignments (standard shell form, quoted or unquoted) before rule
/// matching.
pub fn normalize_command(raw: &str) -> String {
    static ASSIGNMENT: OnceLock<Regex> = OnceLock::new();
    let re = ASSIGNMENT.get_or_init(|| {
        Regex::new(r#"^[A-Za-z_][A-Za-z0-9_]*=(?:'[^']*'|"[^"]*"|\S*)\s+"#).expect("static regex")
    });

    let mut command = raw.trim_start().to_string();
    while let Some(m) = re.find(&command) {
        command = command[m.end()..].trim_start().to_string();
    }
    command
}

/// Validate a raw shell command string against the policy's blocked,
/// confirm, and alert rule lists, in that priority order. A command on
/// the known-safe allowlist short-circuits to allow before any rule list
/// is consulted.
pub fn validate_shell(config: &PolicyConfig, raw_command: &str) -> RuleOutcome {
    let normalized = normalize_command(raw_command);

    if is_known_safe_command(&normalized) {
        return RuleOutcome::allow();
    }

    if let Some(rule) = first_match(&config.bash.blocked, &normalized) {
        return RuleOutcome::block(rule, "matched blocked shell rule");
    }
    if let Some(rule) = first_match(&config.bash.confirm, &normalized) {
        return RuleOutcome::confirm(rule, "matched confirm shell rule");
    }
    if let Some(rule) = first_match(&config.bash.alert, &normalized) {
        return RuleOutcome::alert(rule, "matched alert shell rule");
    }

    RuleOutcome::allow()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Decision;
    use aegis_config::Cascade;

    #[test]
    fn strips_single_env_assignment() {
        assert_eq!(normalize_command("FOO=bar rm -rf /tmp/x"), "rm -rf /tmp/x");
    }

    #[test]
    fn strips_multiple_quoted_env_assignments() {
        assert_eq!(
            normalize_command(r#"FOO='a b' BAR="c d" echo hi"#),
            "echo hi"
        );
    }

    #[test]
    fn no_assignment_is_a_no_op() {
        assert_eq!(normalize_command("echo hi"), "echo hi");
    }

    #[test]
    fn fallback_policy_blocks_rm_rf_root() {
        let config = PolicyConfig::fallback();
        let outcome = validate_shell(&config, "rm -rf /");
        assert_eq!(outcome.decision, Decision::Block);
    }

    #[test]
    fn env_assignment_does_not_hide_a_blocked_command() {
        let config = PolicyConfig::fallback();
        let outcome = validate_shell(&config, "FOO=bar rm -rf /");
        assert_eq!(outcome.decision, Decision::Block);
    }

    #[test]
    fn known_safe_command_allows_even_under_strict_policy() {
        let mut config = PolicyConfig::fallback();
        config.bash.blocked.push(".*".to_string());
        let outcome = validate_shell(&config, "ls -la");
        assert_eq!(outcome.decision, Decision::Allow);
    }

    #[test]
    fn first_matching_list_wins_blocked_over_confirm() {
        let mut config = PolicyConfig::fallback();
        config.bash.confirm.push("deploy".to_string());
        config.bash.blocked.push("deploy".to_string());
        let outcome = validate_shell(&config, "deploy prod");
        assert_eq!(outcome.decision, Decision::Block);
    }
}
