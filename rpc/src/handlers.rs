//! RPC request handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use reclaim_ledger::{LedgerError, Profile, Redemption, RewardLedger};
use reclaim_types::{AccountId, SubmissionStatus};
use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::server::AppState;

/// Header carrying the caller identity.
pub const CALLER_HEADER: &str = "x-caller";

type ApiResult<T> = Result<T, RpcError>;

// ── Account ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub display_name: String,
}

#[derive(Serialize, Deserialize)]
pub struct ProfileResponse {
    pub account: String,
    pub display_name: String,
    pub total_submitted: u64,
    pub total_verified: u64,
    pub total_redeemed: u64,
    pub redeemable: u64,
    pub credit_balance: String,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            redeemable: p.redeemable(),
            account: p.identity.to_string(),
            display_name: p.display_name,
            total_submitted: p.total_submitted,
            total_verified: p.total_verified,
            total_redeemed: p.total_redeemed,
            credit_balance: p.credit_balance.to_string(),
        }
    }
}

// ── Submissions ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub quantity: i64,
}

#[derive(Serialize, Deserialize)]
pub struct SubmitResponse {
    pub account: String,
    pub index: usize,
}

#[derive(Serialize, Deserialize)]
pub struct SubmissionView {
    pub index: usize,
    pub quantity: u64,
    pub status: SubmissionStatus,
}

#[derive(Serialize, Deserialize)]
pub struct SubmissionsResponse {
    pub account: String,
    pub submissions: Vec<SubmissionView>,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyResponse {
    pub account: String,
    pub index: usize,
    pub status: SubmissionStatus,
}

// ── Redemption ───────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct RedemptionResponse {
    pub account: String,
    pub units: u64,
    pub quantity_consumed: u64,
    pub remainder: u64,
    pub transferred: String,
    pub submissions_redeemed: usize,
}

impl From<Redemption> for RedemptionResponse {
    fn from(r: Redemption) -> Self {
        Self {
            account: r.identity.to_string(),
            units: r.units,
            quantity_consumed: r.quantity_consumed,
            remainder: r.remainder,
            transferred: r.transferred.raw().to_string(),
            submissions_redeemed: r.submissions_redeemed,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct CreditBalanceResponse {
    pub account: String,
    pub balance: String,
}

// ── Leaderboard ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LeaderboardParams {
    pub n: i64,
}

#[derive(Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub account: String,
    pub display_name: String,
    pub total_verified: u64,
}

#[derive(Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

// ── Admins ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminRequest {
    pub target: String,
}

#[derive(Serialize, Deserialize)]
pub struct AdminsResponse {
    pub owner: String,
    pub admins: Vec<String>,
}

// ── Telemetry ────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub accounts: usize,
}

// ── Handlers ─────────────────────────────────────────────────────────────

fn caller(headers: &HeaderMap) -> ApiResult<AccountId> {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(AccountId::from)
        .filter(|id| !id.is_null())
        .ok_or(RpcError::MissingCaller)
}

/// Run a ledger operation off the async executor.
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, LedgerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RpcError::Server(format!("task join error: {e}")))?
        .map_err(RpcError::from)
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProfileResponse>)> {
    let identity = caller(&headers)?;
    let Json(req) = payload?;
    let ledger = Arc::clone(&state.ledger);
    let (profile, count) = blocking(move || {
        ledger.register(&identity, req.display_name)?;
        Ok((ledger.profile(&identity)?, ledger.account_count()?))
    })
    .await?;
    state.metrics.registrations.inc();
    state.metrics.accounts.set(count as i64);
    Ok((StatusCode::CREATED, Json(profile.into())))
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let ledger = Arc::clone(&state.ledger);
    let profile = blocking(move || ledger.profile(&AccountId::new(account))).await?;
    Ok(Json(profile.into()))
}

pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> ApiResult<Json<SubmissionsResponse>> {
    let ledger = Arc::clone(&state.ledger);
    let id = AccountId::new(account.clone());
    let submissions = blocking(move || ledger.submissions(&id)).await?;
    Ok(Json(SubmissionsResponse {
        account,
        submissions: submissions
            .into_iter()
            .enumerate()
            .map(|(index, s)| SubmissionView {
                index,
                quantity: s.quantity,
                status: s.status,
            })
            .collect(),
    }))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let identity = caller(&headers)?;
    let Json(req) = payload?;
    // A negative quantity is submitted as zero so the ledger reports it
    // exactly like zero, after the registration check.
    let quantity = u64::try_from(req.quantity).unwrap_or(0);
    let ledger = Arc::clone(&state.ledger);
    let id = identity.clone();
    let index = blocking(move || ledger.submit(&id, quantity)).await?;
    state.metrics.submissions.inc();
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            account: identity.to_string(),
            index,
        }),
    ))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((account, index)): Path<(String, i64)>,
) -> ApiResult<Json<VerifyResponse>> {
    let verifier = caller(&headers)?;
    let ledger = Arc::clone(&state.ledger);
    let id = AccountId::new(account.clone());
    let verified = blocking(move || match usize::try_from(index) {
        Ok(index) => ledger.verify(&verifier, &id, index).map(|()| Some(index)),
        // Same precedence as the ledger: authorization, then registration.
        Err(_) => {
            if !ledger.is_owner(&verifier) && !ledger.is_admin(&verifier) {
                return Err(LedgerError::Unauthorized(verifier.to_string()));
            }
            ledger.profile(&id).map(|_| None)
        }
    })
    .await?;
    let Some(index) = verified else {
        return Err(RpcError::NegativeIndex(index));
    };
    state.metrics.verifications.inc();
    Ok(Json(VerifyResponse {
        account,
        index,
        status: SubmissionStatus::Verified,
    }))
}

pub async fn redeem(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<RedemptionResponse>> {
    let identity = caller(&headers)?;
    let ledger = Arc::clone(&state.ledger);
    match blocking(move || ledger.redeem(&identity)).await {
        Ok(receipt) => {
            state.metrics.redemptions.inc();
            state.metrics.credit_units_issued.inc_by(receipt.units);
            Ok(Json(receipt.into()))
        }
        Err(e) => {
            if matches!(e, RpcError::Ledger(LedgerError::TransferFailed(_))) {
                state.metrics.failed_redemptions.inc();
            }
            Err(e)
        }
    }
}

pub async fn credit_balance(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> ApiResult<Json<CreditBalanceResponse>> {
    let ledger = Arc::clone(&state.ledger);
    let id = AccountId::new(account.clone());
    let balance = blocking(move || Ok(ledger.credit_balance_of(&id))).await?;
    Ok(Json(CreditBalanceResponse {
        account,
        balance: balance.raw().to_string(),
    }))
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LeaderboardParams>, QueryRejection>,
) -> ApiResult<Json<LeaderboardResponse>> {
    let Query(params) = query?;
    let ledger = Arc::clone(&state.ledger);
    let requested = params.n;
    let ranked = blocking(move || {
        let n = usize::try_from(requested).map_err(|_| invalid_count(&ledger, requested))?;
        ledger.top_n(n)
    })
    .await?;
    Ok(Json(LeaderboardResponse {
        entries: ranked
            .into_iter()
            .enumerate()
            .map(|(i, p)| LeaderboardEntry {
                rank: i + 1,
                account: p.identity.to_string(),
                display_name: p.display_name,
                total_verified: p.total_verified,
            })
            .collect(),
    }))
}

fn invalid_count(ledger: &RewardLedger, requested: i64) -> LedgerError {
    match ledger.account_count() {
        Ok(available) => LedgerError::InvalidCount {
            requested,
            available,
        },
        Err(e) => e,
    }
}

pub async fn list_admins(State(state): State<Arc<AppState>>) -> ApiResult<Json<AdminsResponse>> {
    let ledger = Arc::clone(&state.ledger);
    let (owner, admins) = blocking(move || Ok((ledger.owner().clone(), ledger.admins()?))).await?;
    Ok(Json(AdminsResponse {
        owner: owner.to_string(),
        admins: admins.into_iter().map(|a| a.to_string()).collect(),
    }))
}

pub async fn add_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<AdminRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let owner = caller(&headers)?;
    let Json(req) = payload?;
    let ledger = Arc::clone(&state.ledger);
    blocking(move || ledger.add_admin(&owner, &AccountId::new(req.target))).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(target): Path<String>,
) -> ApiResult<StatusCode> {
    let owner = caller(&headers)?;
    let ledger = Arc::clone(&state.ledger);
    blocking(move || ledger.remove_admin(&owner, &AccountId::new(target))).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    state
        .metrics
        .encode()
        .map_err(|e| RpcError::Server(e.to_string()))
}

pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let ledger = Arc::clone(&state.ledger);
    let accounts = blocking(move || ledger.account_count()).await?;
    Ok(Json(HealthResponse {
        status: "ok".into(),
        accounts,
    }))
}
