//! Submission lifecycle state.

use serde::{Deserialize, Serialize};

/// The status of a single submission.
///
/// Transitions only move forward: `Pending → Verified → Redeemed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Claimed by the participant, awaiting a trusted verifier.
    Pending,
    /// Confirmed by a trusted verifier; counts toward `total_verified`.
    Verified,
    /// The owning account redeemed at least once since verification.
    Redeemed,
}

impl SubmissionStatus {
    /// Whether this submission's quantity counts as verified.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified | Self::Redeemed)
    }

    /// Whether `next` is a legal forward transition from this status.
    pub fn can_advance_to(&self, next: SubmissionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Verified) | (Self::Verified, Self::Redeemed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Redeemed => "redeemed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_are_forward_only() {
        use SubmissionStatus::*;
        assert!(Pending.can_advance_to(Verified));
        assert!(Verified.can_advance_to(Redeemed));
        assert!(!Pending.can_advance_to(Redeemed));
        assert!(!Verified.can_advance_to(Pending));
        assert!(!Redeemed.can_advance_to(Verified));
        assert!(!Redeemed.can_advance_to(Redeemed));
    }

    #[test]
    fn verified_includes_redeemed() {
        assert!(!SubmissionStatus::Pending.is_verified());
        assert!(SubmissionStatus::Verified.is_verified());
        assert!(SubmissionStatus::Redeemed.is_verified());
    }
}
