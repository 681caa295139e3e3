//! Daemon configuration with TOML file support.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use reclaim_types::{AccountId, CreditAmount, LedgerParams, ParamsError};
use reclaim_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("owner must be set")]
    MissingOwner,

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("treasury reserve of {0} units overflows the credit denomination")]
    ReserveOverflow(u64),
}

/// Configuration for the reward ledger daemon.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address the RPC server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// RPC port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Privileged identity fixed for the lifetime of the ledger.
    #[serde(default)]
    pub owner: String,

    /// Initial admin set.
    #[serde(default)]
    pub admins: Vec<String>,

    /// Verified quantity units per credit unit.
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: u64,

    /// Decimal places of the external credit token.
    #[serde(default = "default_credit_decimals")]
    pub credit_decimals: u32,

    /// Whole credit units available to the in-process credit ledger.
    #[serde(default = "default_treasury_reserve")]
    pub treasury_reserve: u64,

    /// Where the ledger snapshot is loaded from and written to.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_exchange_rate() -> u64 {
    10
}

fn default_credit_decimals() -> u32 {
    18
}

fn default_treasury_reserve() -> u64 {
    1_000_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Check everything the ledger would otherwise reject at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner().is_null() {
            return Err(ConfigError::MissingOwner);
        }
        self.treasury()?;
        Ok(())
    }

    pub fn owner(&self) -> AccountId {
        AccountId::new(self.owner.trim())
    }

    pub fn admins(&self) -> Vec<AccountId> {
        self.admins.iter().map(|a| AccountId::new(a.trim())).collect()
    }

    pub fn params(&self) -> Result<LedgerParams, ConfigError> {
        Ok(LedgerParams::new(self.exchange_rate, self.credit_decimals)?)
    }

    /// Treasury reserve in the credit ledger's base units.
    pub fn treasury(&self) -> Result<CreditAmount, ConfigError> {
        self.params()?
            .scale_units(self.treasury_reserve)
            .ok_or(ConfigError::ReserveOverflow(self.treasury_reserve))
    }

    pub fn rpc_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.rpc_port)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            rpc_port: default_rpc_port(),
            owner: String::new(),
            admins: Vec::new(),
            exchange_rate: default_exchange_rate(),
            credit_decimals: default_credit_decimals(),
            treasury_reserve: default_treasury_reserve(),
            snapshot_path: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str(r#"owner = "council""#).unwrap();
        assert_eq!(config.rpc_port, 7080);
        assert_eq!(config.exchange_rate, 10);
        assert_eq!(config.credit_decimals, 18);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.rpc_addr().to_string(), "127.0.0.1:7080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            owner = "council"
            admins = ["depot-1", "depot-2"]
            exchange_rate = 25
            credit_decimals = 6
            treasury_reserve = 50
            log_format = "json"
            snapshot_path = "/var/lib/reclaim/ledger.snap"
        "#;
        let config = DaemonConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.admins(), vec![AccountId::new("depot-1"), AccountId::new("depot-2")]);
        assert_eq!(config.params().unwrap().exchange_rate, 25);
        assert_eq!(config.treasury().unwrap(), CreditAmount::new(50_000_000));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.snapshot_path.as_deref(),
            Some(Path::new("/var/lib/reclaim/ledger.snap"))
        );
    }

    #[test]
    fn missing_owner_is_rejected() {
        let config = DaemonConfig::from_toml_str("owner = \"  \"").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::MissingOwner)));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let config = DaemonConfig::from_toml_str("owner = \"o\"\nexchange_rate = 0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Params(ParamsError::ZeroExchangeRate))
        ));

        let config = DaemonConfig::from_toml_str("owner = \"o\"\ncredit_decimals = 60").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Params(_))));
    }

    #[test]
    fn unknown_log_format_fails_to_parse() {
        assert!(matches!(
            DaemonConfig::from_toml_str("log_format = \"xml\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "owner = \"council\"\nrpc_port = 9000").unwrap();
        let config = DaemonConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.rpc_port, 9000);
        assert_eq!(config.owner(), AccountId::new("council"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = DaemonConfig::from_toml_file(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
