use std::time::Duration;

use crate::config::ReconnectConfig;

/// Floor for configured delays so a zero never turns into a busy loop.
const MIN_DELAY_MS: u64 = 1;

/// Exponential reconnect delays with a cap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Consecutive failed attempts allowed before giving up; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl ReconnectPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Delay before reconnect attempt number `attempt` (1-based), or `None`
    /// when no further attempt should be made.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if !self.enabled || attempt == 0 {
            return None;
        }
        if let Some(max) = self.max_attempts {
            if attempt > max {
                return None;
            }
        }

        let exponent = (attempt - 1).min(63) as i32;
        let factor = self.multiplier.max(1.0).powi(exponent);
        let cap = self.max_delay.max(self.initial_delay).as_millis() as f64;
        let millis = (self.initial_delay.as_millis() as f64 * factor).min(cap);
        Some(Duration::from_millis(millis as u64))
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from(&ReconnectConfig::default())
    }
}

impl From<&ReconnectConfig> for ReconnectPolicy {
    fn from(config: &ReconnectConfig) -> Self {
        let initial_delay = Duration::from_millis(config.initial_delay_ms.max(MIN_DELAY_MS));
        Self {
            enabled: config.enabled,
            initial_delay,
            max_delay: Duration::from_millis(config.max_delay_ms).max(initial_delay),
            multiplier: config.multiplier,
            max_attempts: config.max_attempts,
        }
    }
}
