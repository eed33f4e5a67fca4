use crate::error::{BalanceError, BalanceResult};
use serde::{Deserialize, Serialize};

/// Trailing window used for the average booked balance.
pub const DEFAULT_WINDOW_DAYS: u32 = 90;

/// Decimal places written at the output boundary.
pub const DEFAULT_OUTPUT_PRECISION: usize = 7;

/// Upper bound on the window; anything longer is a typo, not a request.
const MAX_WINDOW_DAYS: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Length of the averaging window, in calendar days.
    pub window_days: u32,
    /// Decimal places used when rendering averages.
    pub output_precision: usize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            output_precision: DEFAULT_OUTPUT_PRECISION,
        }
    }
}

impl BalanceConfig {
    /// Load from a JSON file. Missing fields fall back to the defaults.
    /// In tests, use BalanceConfig::default_test().
    pub fn load(path: &str) -> BalanceResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: BalanceConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config with the production defaults, spelled out for unit tests.
    pub fn default_test() -> Self {
        Self {
            window_days: 90,
            output_precision: 7,
        }
    }

    pub fn validate(&self) -> BalanceResult<()> {
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(BalanceError::InvalidConfig {
                reason: format!(
                    "window_days must be at most {MAX_WINDOW_DAYS}, got {}",
                    self.window_days
                ),
            });
        }
        if self.output_precision > 17 {
            return Err(BalanceError::InvalidConfig {
                reason: format!(
                    "output_precision beyond 17 digits is noise, got {}",
                    self.output_precision
                ),
            });
        }
        Ok(())
    }
}
