//! Loading and writing the ledger snapshot file.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use reclaim_access::AdminRegistry;
use reclaim_credit::CreditLedger;
use reclaim_ledger::{LedgerSnapshot, RewardLedger};
use reclaim_types::{AccountId, LedgerParams};
use tracing::info;

/// Restore the ledger from `path` if it exists, otherwise start empty.
///
/// The configured owner and admins only seed a fresh ledger; a restored
/// ledger keeps the access set recorded in its snapshot.
pub fn open_ledger(
    path: Option<&Path>,
    params: LedgerParams,
    owner: AccountId,
    admins: Vec<AccountId>,
    credit: Arc<dyn CreditLedger>,
) -> anyhow::Result<RewardLedger> {
    if let Some(path) = path.filter(|p| p.exists()) {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading snapshot {}", path.display()))?;
        let snapshot = LedgerSnapshot::from_bytes(&bytes)?;
        if snapshot.owner != owner {
            tracing::warn!(
                configured = %owner,
                recorded = %snapshot.owner,
                "configured owner differs from snapshot, keeping snapshot owner"
            );
        }
        let ledger = RewardLedger::restore(snapshot, params, credit)
            .with_context(|| format!("restoring snapshot {}", path.display()))?;
        return Ok(ledger);
    }
    Ok(RewardLedger::new(
        params,
        AdminRegistry::with_admins(owner, admins),
        credit,
    )?)
}

/// Write the ledger snapshot to `path`, replacing any previous file.
pub fn save_snapshot(ledger: &RewardLedger, path: &Path) -> anyhow::Result<()> {
    let snapshot = ledger.snapshot()?;
    let bytes = snapshot.to_bytes()?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    info!(
        path = %path.display(),
        accounts = snapshot.account_count(),
        bytes = bytes.len(),
        "ledger snapshot written"
    );
    Ok(())
}
