//! Pool Settings Module
//!
//! Loads pool parameters from TOML files with environment-specific overlays
//! and `CPMM_` environment variable overrides.

use amm::{AccountId, PoolConfig};
use anyhow::{anyhow, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CPMM";

const DEFAULT_FEE_BPS: u32 = 30;
const DEFAULT_TWAP_INTERVAL_SECS: u64 = 300;

/// Parameters a pool is created with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PoolSettings {
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u32,

    #[serde(default = "default_twap_interval_secs")]
    pub twap_interval_secs: u64,

    /// Hex address of the founding governor
    #[serde(default)]
    pub deployer: Option<String>,
}

fn default_fee_bps() -> u32 {
    DEFAULT_FEE_BPS
}

fn default_twap_interval_secs() -> u64 {
    DEFAULT_TWAP_INTERVAL_SECS
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
            twap_interval_secs: DEFAULT_TWAP_INTERVAL_SECS,
            deployer: None,
        }
    }
}

impl PoolSettings {
    /// Check every field without building a pool
    pub fn validate(&self) -> Result<()> {
        self.pool_config()?;
        if let Some(deployer) = &self.deployer {
            let account = parse_account(deployer)?;
            if account.is_zero() {
                return Err(anyhow!("deployer must not be the zero address"));
            }
        }
        Ok(())
    }

    pub fn pool_config(&self) -> Result<PoolConfig> {
        let config = PoolConfig {
            fee_bps: self.fee_bps,
            twap_interval_secs: self.twap_interval_secs,
        };
        config
            .validate()
            .with_context(|| format!("invalid fee_bps {}", self.fee_bps))?;
        Ok(config)
    }

    /// The configured deployer, required to create a pool
    pub fn deployer_account(&self) -> Result<AccountId> {
        let raw = self
            .deployer
            .as_deref()
            .ok_or_else(|| anyhow!("deployer address is not configured"))?;
        parse_account(raw)
    }
}

fn parse_account(raw: &str) -> Result<AccountId> {
    raw.parse::<AccountId>()
        .with_context(|| format!("invalid deployer address {raw:?}"))
}

/// Builder over the configuration sources, applied in a fixed order
#[derive(Debug, Default)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    environment: Option<String>,
    env_overrides: Option<HashMap<String, String>>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base TOML file; must exist when given
    pub fn file(mut self, path: &Path) -> Self {
        self.file = Some(path.to_path_buf());
        self
    }

    /// Overlay `environments/<name>.toml` next to the base file
    pub fn environment(mut self, name: &str) -> Self {
        self.environment = Some(name.to_string());
        self
    }

    /// Read `CPMM_*` variables from this map instead of the process environment
    pub fn env_overrides(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    fn overlay_path(&self, name: &str) -> PathBuf {
        let base_dir = self
            .file
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("config"));
        base_dir.join("environments").join(format!("{name}.toml"))
    }

    pub fn load(self) -> Result<PoolSettings> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            debug!("Loading pool config: {:?}", path);
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        if let Some(name) = &self.environment {
            let overlay = self.overlay_path(name);
            if overlay.exists() {
                info!("Loading environment config: {:?}", overlay);
                builder = builder.add_source(File::from(overlay));
            } else {
                warn!("Environment config not found: {:?}", overlay);
            }
        }

        // Values stay strings so hex addresses are never read as numbers
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).source(self.env_overrides));

        let settings: PoolSettings = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        Ok(settings)
    }
}

/// Load from an optional file plus the process environment
pub fn load_settings(path: Option<&Path>) -> Result<PoolSettings> {
    let mut loader = SettingsLoader::new();
    if let Some(path) = path {
        loader = loader.file(path);
    }
    loader.load()
}
