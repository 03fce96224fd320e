//! Output contract gate configuration

use serde::Deserialize;

/// Output contract gate behaviour
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GateConfig {
    /// Reject turns whose conclusion fails the contract gate instead of
    /// logging and serving the repaired output.
    #[serde(default)]
    pub enforce: bool,
}
