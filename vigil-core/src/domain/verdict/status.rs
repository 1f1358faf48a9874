// vigil-core/src/domain/verdict/status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// Discriminants ascend with readiness: Blocked < Partial < Ready.
// "Worst wins" is therefore a plain `min` over the total order.

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    Blocked, // 0
    Partial, // 1
    #[default]
    Ready, // 2
}

impl GateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocked => "BLOCKED",
            Self::Partial => "PARTIAL",
            Self::Ready => "READY",
        }
    }

    /// Combines two outcomes, keeping the most severe.
    pub fn worst(self, other: GateStatus) -> GateStatus {
        self.min(other)
    }

    /// Whether the report pipeline may proceed. PARTIAL is allowed unless `strict`.
    pub fn allows_generation(&self, strict: bool) -> bool {
        match self {
            Self::Ready => true,
            Self::Partial => !strict,
            Self::Blocked => false,
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(GateStatus::Blocked < GateStatus::Partial);
        assert!(GateStatus::Partial < GateStatus::Ready);
    }

    #[test]
    fn test_worst_wins() {
        assert_eq!(
            GateStatus::Ready.worst(GateStatus::Partial),
            GateStatus::Partial
        );
        assert_eq!(
            GateStatus::Partial.worst(GateStatus::Blocked),
            GateStatus::Blocked
        );
        assert_eq!(
            [GateStatus::Partial, GateStatus::Ready, GateStatus::Blocked]
                .into_iter()
                .fold(GateStatus::Ready, GateStatus::worst),
            GateStatus::Blocked
        );
    }

    #[test]
    fn test_display_matches_serde() -> anyhow::Result<()> {
        assert_eq!(GateStatus::Partial.to_string(), "PARTIAL");
        assert_eq!(serde_json::to_string(&GateStatus::Blocked)?, "\"BLOCKED\"");
        Ok(())
    }

    #[test]
    fn test_allows_generation() {
        assert!(GateStatus::Partial.allows_generation(false));
        assert!(!GateStatus::Partial.allows_generation(true));
        assert!(!GateStatus::Blocked.allows_generation(false));
    }
}
