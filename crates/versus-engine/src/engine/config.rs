use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::spawner::DuelSeed;

/// Timing parameters of a duel.
///
/// Scoring values and thresholds are fixed and live in [`crate::rules`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Delay between fall ticks of a board that is not slowed.
    pub initial_fall_interval_ms: u64,
    /// Delay between two AI approach steps.
    pub ai_move_delay_ms: u64,
    /// How long a slowdown lasts.
    pub slowdown_duration_ms: u64,
    /// A slowed board's fall interval is divided by this factor.
    pub slowdown_factor: f64,
    /// Delay between two alternate-palette periods.
    pub palette_interval_ms: u64,
    /// How long the alternate palette stays on.
    pub palette_duration_ms: u64,
    /// Seed for shape generation; random when absent.
    pub seed: Option<DuelSeed>,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            initial_fall_interval_ms: 400,
            ai_move_delay_ms: 100,
            slowdown_duration_ms: 10_000,
            slowdown_factor: 0.8,
            palette_interval_ms: 120_000,
            palette_duration_ms: 20_000,
            seed: None,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[display("slowdown_factor must be in (0, 1], got {factor}")]
    SlowdownFactor { factor: f64 },
}

impl DuelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("initial_fall_interval_ms", self.initial_fall_interval_ms),
            ("ai_move_delay_ms", self.ai_move_delay_ms),
            ("slowdown_duration_ms", self.slowdown_duration_ms),
            ("palette_interval_ms", self.palette_interval_ms),
            ("palette_duration_ms", self.palette_duration_ms),
        ];
        if let Some((field, _)) = intervals.into_iter().find(|&(_, ms)| ms == 0) {
            return Err(ConfigError::ZeroInterval { field });
        }
        if !(self.slowdown_factor > 0.0 && self.slowdown_factor <= 1.0) {
            return Err(ConfigError::SlowdownFactor {
                factor: self.slowdown_factor,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn initial_fall_interval(&self) -> Duration {
        Duration::from_millis(self.initial_fall_interval_ms)
    }

    #[must_use]
    pub fn ai_move_delay(&self) -> Duration {
        Duration::from_millis(self.ai_move_delay_ms)
    }

    #[must_use]
    pub fn slowdown_duration(&self) -> Duration {
        Duration::from_millis(self.slowdown_duration_ms)
    }

    #[must_use]
    pub fn palette_interval(&self) -> Duration {
        Duration::from_millis(self.palette_interval_ms)
    }

    #[must_use]
    pub fn palette_duration(&self) -> Duration {
        Duration::from_millis(self.palette_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        DuelConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DuelConfig =
            serde_json::from_str(r#"{"initial_fall_interval_ms": 250}"#).unwrap();
        assert_eq!(config.initial_fall_interval(), Duration::from_millis(250));
        assert_eq!(config.ai_move_delay(), Duration::from_millis(100));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_seed_from_json() {
        let config: DuelConfig =
            serde_json::from_str(r#"{"seed": "000000000000000000000000000000ff"}"#).unwrap();
        assert_eq!(config.seed, Some(DuelSeed::from_u128(0xff)));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = DuelConfig {
            ai_move_delay_ms: 0,
            ..DuelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroInterval {
                field: "ai_move_delay_ms"
            })
        ));
    }

    #[test]
    fn test_rejects_bad_factor() {
        for factor in [0.0, -0.5, 1.5, f64::NAN] {
            let config = DuelConfig {
                slowdown_factor: factor,
                ..DuelConfig::default()
            };
            assert!(config.validate().is_err(), "{factor}");
        }
    }
}
