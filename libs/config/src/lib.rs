//! # CPMM Pool Configuration
//!
//! Layered loading of the parameters a pool is created with.
//!
//! ## Sources (later wins)
//!
//! - **Built-in defaults**: 30 bps fee, 300 second TWAP interval
//! - **Base file**: optional TOML file, e.g. `config/pool.toml`
//! - **Environment overlay**: `<base dir>/environments/<name>.toml` when a name is given
//! - **Environment variables**: `CPMM_FEE_BPS`, `CPMM_TWAP_INTERVAL_SECS`, `CPMM_DEPLOYER`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cpmm_config::SettingsLoader;
//! use std::path::Path;
//!
//! let settings = SettingsLoader::new()
//!     .file(Path::new("config/pool.toml"))
//!     .environment("staging")
//!     .load()?;
//! let pool_config = settings.pool_config()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod settings;

pub use settings::{load_settings, PoolSettings, SettingsLoader, ENV_PREFIX};
