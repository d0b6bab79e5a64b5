//! CLI driver configuration.
//!
//! The engine itself is pure and takes no configuration; this module
//! configures only the reference CLI driver in `main.rs`: whether to trace
//! per-stage activity, and the tick rate it reports when asked to "run" at
//! a target frequency. Loaded from an optional TOML file, falling back to
//! `Default` when absent.

use serde::Deserialize;

/// Target tick rate bounds: drivers should clamp into `1..=100` Hz.
const MIN_HZ: u32 = 1;
const MAX_HZ: u32 = 100;
const DEFAULT_HZ: u32 = 10;

/// CLI driver configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Emit per-stage `eprintln!` trace lines while ticking.
    #[serde(default)]
    pub trace_instructions: bool,

    /// Tick-rate hint for a `run` loop, in Hz. Consulted only by the CLI
    /// driver; clamped to `1..=100` via [`EngineConfig::default_hz`].
    #[serde(default = "default_hz")]
    pub default_hz: u32,
}

impl EngineConfig {
    /// Returns [`EngineConfig::default_hz`] clamped to the `1..=100` Hz
    /// range expected by the driver-to-client wire contract.
    pub fn default_hz(&self) -> u32 {
        self.default_hz.clamp(MIN_HZ, MAX_HZ)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            default_hz: DEFAULT_HZ,
        }
    }
}

fn default_hz() -> u32 {
    DEFAULT_HZ
}
