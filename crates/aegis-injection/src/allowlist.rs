/// Session ids and keywords that short-circuit a scan to allow, e.g. a
/// red-team session explicitly marked "authorized testing".
#[derive(Clone, Debug, Default)]
pub struct Allowlist {
    pub session_ids: Vec<String>,
    pub keywords: Vec<String>,
}

impl Allowlist {
    pub fn is_allowlisted(&self, session_id: &str, text: &str) -> bool {
        if self.session_ids.iter().any(|id| id == session_id) {
            return true;
        }
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .any(|kw| lower.contains(&kw.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_session_id_allowlists() {
        let list = Allowlist {
            session_ids: vec!["sess-1".to_string()],
            keywords: vec![],
        };
        assert!(list.is_allowlisted("sess-1", "anything at all"));
    }

    #[test]
    fn matching_keyword_allowlists_case_insensitively() {
        let list = Allowlist {
            session_ids: vec![],
            keywords: vec!["authorized testing".to_string()],
        };
        assert!(list.is_allowlisted("sess-2", "this is AUTHORIZED TESTING of the sandbox"));
    }

    #[test]
    fn no_match_is_not_allowlisted() {
        let list = Allowlist {
            session_ids: vec!["sess-1".to_string()],
            keywords: vec!["authorized testing".to_string()],
        };
        assert!(!list.is_allowlisted("sess-2", "ignore previous instructions"));
    }
}
