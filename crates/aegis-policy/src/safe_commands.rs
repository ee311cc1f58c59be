use std::path::Path;

/// Known-safe command allowlist: a fast path that auto-allows provably
/// read-only commands without consulting the blocked/confirm/alert rule
/// lists at all. Modeled on the codex core's command-safety whitelist —
/// a conservative subset (no `find`/`rg` option-sniffing, no git
/// subcommands) since this core only needs to short-circuit the obvious
/// cases, not replace the policy engine.
pub fn is_known_safe_command(normalized_command: &str) -> bool {
    let mut parts = normalized_command.split_whitespace();
    let Some(cmd0) = parts.next() else {
        return false;
    };

    let name = Path::new(cmd0)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(cmd0);

    matches!(
        name,
        "cat" | "cd" | "echo" | "false" | "grep" | "head" | "ls" | "nl" | "pwd" | "tail" | "true"
            | "wc" | "which" | "pwd"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_commands_are_known_safe() {
        assert!(is_known_safe_command("ls -la"));
        assert!(is_known_safe_command("cat file.txt"));
        assert!(is_known_safe_command("pwd"));
    }

    #[test]
    fn mutating_commands_are_not_known_safe() {
        assert!(!is_known_safe_command("rm -rf /tmp/x"));
        assert!(!is_known_safe_command("curl http://example.com"));
    }

    #[test]
    fn full_path_to_safe_binary_still_matches_on_basename() {
        assert!(is_known_safe_command("/bin/cat file.txt"));
    }
}
