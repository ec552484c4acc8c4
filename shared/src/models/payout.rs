//! Payout Model

use serde::{Deserialize, Serialize};

/// Payout request lifecycle
///
/// Strictly forward-only:
/// `requested → approved → paid` or `requested → rejected`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PayoutStatus {
    Requested,
    Approved,
    Rejected,
    Paid,
}

impl PayoutStatus {
    /// Legal state-machine moves; everything else is an invalid transition
    pub fn can_transition(self, next: PayoutStatus) -> bool {
        matches!(
            (self, next),
            (PayoutStatus::Requested, PayoutStatus::Approved)
                | (PayoutStatus::Requested, PayoutStatus::Rejected)
                | (PayoutStatus::Approved, PayoutStatus::Paid)
        )
    }
}

/// Affiliate withdrawal request
///
/// `amount` is validated against the available commission balance at
/// request time; the balance itself is only debited when the payout is
/// marked paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payout {
    pub id: i64,
    pub affiliate_id: i64,
    pub amount: i64,
    pub status: PayoutStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_only_transitions() {
        assert!(PayoutStatus::Requested.can_transition(PayoutStatus::Approved));
        assert!(PayoutStatus::Requested.can_transition(PayoutStatus::Rejected));
        assert!(PayoutStatus::Approved.can_transition(PayoutStatus::Paid));
    }

    #[test]
    fn test_no_jump_to_paid() {
        assert!(!PayoutStatus::Requested.can_transition(PayoutStatus::Paid));
    }

    #[test]
    fn test_terminal_states_locked() {
        for next in [
            PayoutStatus::Requested,
            PayoutStatus::Approved,
            PayoutStatus::Rejected,
            PayoutStatus::Paid,
        ] {
            assert!(!PayoutStatus::Paid.can_transition(next));
            assert!(!PayoutStatus::Rejected.can_transition(next));
        }
    }
}
