//! Prometheus metrics for the reward ledger API.
//!
//! [`RpcMetrics`] owns a dedicated [`Registry`] that the `/metrics` endpoint
//! encodes into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

pub struct RpcMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Accounts registered through the API.
    pub registrations: IntCounter,
    /// Submissions recorded.
    pub submissions: IntCounter,
    /// Submissions verified.
    pub verifications: IntCounter,
    /// Successful redemptions.
    pub redemptions: IntCounter,
    /// Redemptions rolled back because the credit transfer failed.
    pub failed_redemptions: IntCounter,
    /// Credit units granted by redemptions.
    pub credit_units_issued: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Registered accounts.
    pub accounts: IntGauge,
}

impl RpcMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let registrations = register_int_counter_with_registry!(
            Opts::new("reclaim_registrations_total", "Accounts registered"),
            registry
        )?;
        let submissions = register_int_counter_with_registry!(
            Opts::new("reclaim_submissions_total", "Submissions recorded"),
            registry
        )?;
        let verifications = register_int_counter_with_registry!(
            Opts::new("reclaim_verifications_total", "Submissions verified"),
            registry
        )?;
        let redemptions = register_int_counter_with_registry!(
            Opts::new("reclaim_redemptions_total", "Successful redemptions"),
            registry
        )?;
        let failed_redemptions = register_int_counter_with_registry!(
            Opts::new(
                "reclaim_failed_redemptions_total",
                "Redemptions rolled back after a failed credit transfer"
            ),
            registry
        )?;
        let credit_units_issued = register_int_counter_with_registry!(
            Opts::new("reclaim_credit_units_issued_total", "Credit units granted"),
            registry
        )?;
        let accounts = register_int_gauge_with_registry!(
            Opts::new("reclaim_accounts", "Registered accounts"),
            registry
        )?;

        Ok(Self {
            registry,
            registrations,
            submissions,
            verifications,
            redemptions,
            failed_redemptions,
            credit_units_issued,
            accounts,
        })
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
