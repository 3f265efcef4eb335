use serde_derive::Deserialize;
use thiserror::Error;

/// Default number of no-progress passes tolerated before a block is denied.
pub const DEFAULT_DENY_THRESHOLD: u32 = 10;
/// Default percentage of lowest-hit blocks selected as under-covered.
pub const DEFAULT_LOW_AREA_PERCENT: f64 = 10.0;

#[derive(Debug, Error)]
pub enum WarmupError {
    #[error("deny threshold must be positive")]
    InvalidThreshold,
    #[error("bad low area percentage: {0}, expected (0, 100]")]
    InvalidPercent(f64),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WarmupConfig {
    /// A block is denied once its no-progress streak exceeds this.
    pub deny_threshold: u32,
    /// Percentage of lowest-hit blocks taken as under-covered.
    pub low_area_percent: f64,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            deny_threshold: DEFAULT_DENY_THRESHOLD,
            low_area_percent: DEFAULT_LOW_AREA_PERCENT,
        }
    }
}

impl WarmupConfig {
    pub fn check(&self) -> Result<(), WarmupError> {
        if self.deny_threshold == 0 {
            return Err(WarmupError::InvalidThreshold);
        }
        check_percent(self.low_area_percent)
    }
}

pub(crate) fn check_percent(percent: f64) -> Result<(), WarmupError> {
    if percent.is_finite() && percent > 0.0 && percent <= 100.0 {
        Ok(())
    } else {
        Err(WarmupError::InvalidPercent(percent))
    }
}
