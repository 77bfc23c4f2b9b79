//! Owner reply interpreter
//!
//! Pure text parsing, no I/O. The owner approves with `YES`, optionally
//! followed by a delivery estimate, and rejects with anything else.

/// Quoted when the owner approves without naming an estimate
pub const DEFAULT_ETA: &str = "30-45 minutes";

/// Parsed owner decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerDecision {
    pub approved: bool,
    /// Delivery estimate, only present on approval
    pub eta: Option<String>,
}

/// Interpret an owner reply.
///
/// Case-insensitive: the text is trimmed and uppercased before matching,
/// so a parsed estimate comes back uppercased ("20 MINS"). The estimate
/// only counts when whitespace separates it from `YES`; "YES!" approves
/// with the default. Replies that do not start with `YES` are rejections;
/// an explicit `NO` and an unrecognized reply read the same.
pub fn parse_owner_reply(text: &str) -> OwnerDecision {
    let normalized = text.trim().to_uppercase();
    match normalized.strip_prefix("YES") {
        Some(rest) => {
            let eta = rest
                .strip_prefix(char::is_whitespace)
                .map(str::trim)
                .filter(|tail| !tail.is_empty())
                .unwrap_or(DEFAULT_ETA);
            OwnerDecision {
                approved: true,
                eta: Some(eta.to_string()),
            }
        }
        None => OwnerDecision {
            approved: false,
            eta: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_with_eta() {
        let decision = parse_owner_reply("yes 30 mins");
        assert!(decision.approved);
        assert_eq!(decision.eta.as_deref(), Some("30 MINS"));
    }

    #[test]
    fn approval_without_eta_uses_default() {
        let decision = parse_owner_reply("YES");
        assert!(decision.approved);
        assert_eq!(decision.eta.as_deref(), Some(DEFAULT_ETA));
    }

    #[test]
    fn approval_survives_whitespace() {
        let decision = parse_owner_reply("  yes   tomorrow morning ");
        assert!(decision.approved);
        assert_eq!(decision.eta.as_deref(), Some("TOMORROW MORNING"));
    }

    #[test]
    fn approval_needs_whitespace_before_eta() {
        for text in ["YES!", "yes!!", "YESSIR"] {
            let decision = parse_owner_reply(text);
            assert!(decision.approved, "{text:?} should approve");
            assert_eq!(decision.eta.as_deref(), Some(DEFAULT_ETA), "{text:?}");
        }
    }

    #[test]
    fn rejection_variants() {
        for text in ["no", "No thanks", "NO"] {
            let decision = parse_owner_reply(text);
            assert!(!decision.approved, "{text:?} should reject");
            assert!(decision.eta.is_none());
        }
    }

    #[test]
    fn unrecognized_reply_rejects() {
        for text in ["maybe later", "ok", "", "   "] {
            let decision = parse_owner_reply(text);
            assert!(!decision.approved, "{text:?} should reject");
            assert!(decision.eta.is_none());
        }
    }
}
