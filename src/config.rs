//! Session configuration
//!
//! The display layer hands the session a JSON document; every field is
//! optional and falls back to the defaults below.
//!
//! ```
//! use zetascope::config::DebuggerConfig;
//!
//! let config = DebuggerConfig::from_json(r#"{ "preset": "kyber-256" }"#).unwrap();
//! assert_eq!(config.params().unwrap().n, 256);
//! assert_eq!(config.chart_window, 32);
//! ```

use serde::{Deserialize, Serialize};

use crate::compare::DEFAULT_CHART_WINDOW;
use crate::error::{Result, ZetaError};
use crate::ntt::params::{by_name, ModulusParams, ML_KEM};

/// Knobs for a [`crate::debugger::Session`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebuggerConfig {
    /// Parameter preset name, see [`crate::ntt::params::ALL_PARAMS`]
    pub preset: String,
    /// Leading entries handed to the chart collaborator
    pub chart_window: usize,
    /// Leading entries in the raw-value preview
    pub preview_len: usize,
    /// Reject edits to the reference source
    pub reference_read_only: bool,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            preset: ML_KEM.name.to_string(),
            chart_window: DEFAULT_CHART_WINDOW,
            preview_len: 8,
            reference_read_only: true,
        }
    }
}

impl DebuggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ZetaError::InvalidConfig(e.to_string()))
    }

    /// Resolve the preset name.
    pub fn params(&self) -> Result<ModulusParams> {
        by_name(&self.preset)
            .copied()
            .ok_or_else(|| ZetaError::InvalidConfig(format!("unknown preset {:?}", self.preset)))
    }
}
