//! Configuration source adapter.
//!
//! Implements [`ConfigSource`] from a JSON document compiled into the
//! image, or the shipped default table when none is given.  Tables are
//! range-checked here; name and behavior resolution happens when the
//! mapping table is built.

use log::{info, warn};

use crate::app::ports::ConfigSource;
use crate::config::BoardConfig;
use crate::error::{ConfigError, Result};

/// Configuration baked into the firmware image.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticConfig {
    document: Option<&'static str>,
}

impl StaticConfig {
    /// The shipped table.
    pub const fn builtin() -> Self {
        Self { document: None }
    }

    /// A JSON document in [`BoardConfig`] shape.
    pub const fn from_json(document: &'static str) -> Self {
        Self {
            document: Some(document),
        }
    }
}

fn validate_config(cfg: &BoardConfig) -> Result<()> {
    if cfg.tick_ms == 0 {
        return Err(ConfigError::ZeroTick.into());
    }
    if cfg.debounce_ms == 0 {
        warn!("Config: debounce disabled (debounce_ms = 0)");
    }
    Ok(())
}

impl ConfigSource for StaticConfig {
    fn load(&self) -> Result<BoardConfig> {
        let cfg = match self.document {
            None => {
                info!("Config: using built-in table");
                BoardConfig::default()
            }
            Some(doc) => serde_json::from_str(doc).map_err(|e| {
                warn!("Config: JSON decode failed: {}", e);
                ConfigError::Parse
            })?,
        };
        validate_config(&cfg)?;
        info!(
            "Config: {} relays, {} inputs, debounce={}ms tick={}ms",
            cfg.relays.len(),
            cfg.inputs.len(),
            cfg.debounce_ms,
            cfg.tick_ms
        );
        Ok(cfg)
    }
}
