// Single source of truth for all default values.

// --- Evaluation ---
pub const DEFAULT_EVALUATION_INTERVAL_MS: u64 = 4_000;
pub const DEFAULT_PARALLEL_EVALUATION: bool = true;

// --- Alerts ---
pub const DEFAULT_MAX_CLOSED_ALERTS: usize = 1_000;

// --- Logging ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = false;
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// --- Files / env ---
pub const CONFIG_FILENAME: &str = "vigil.toml";
pub const LOG_FILTER_ENV: &str = "VIGIL_LOG";
