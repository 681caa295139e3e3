//! Leaderboard: rank accounts by verified quantity.

use crate::error::LedgerError;
use crate::profile::Profile;

/// Return the `n` profiles with the highest `total_verified`, descending.
///
/// `profiles` must be in registration order; ties keep that order, so an
/// earlier registration ranks higher.
pub fn top_n(mut profiles: Vec<Profile>, n: usize) -> Result<Vec<Profile>, LedgerError> {
    if n == 0 || n > profiles.len() {
        return Err(LedgerError::InvalidCount {
            requested: i64::try_from(n).unwrap_or(i64::MAX),
            available: profiles.len(),
        });
    }
    // sort_by is stable
    profiles.sort_by(|a, b| b.total_verified.cmp(&a.total_verified));
    profiles.truncate(n);
    Ok(profiles)
}
