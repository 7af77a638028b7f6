//! Core configuration for cabbie-animation-core.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AnimationError;

/// Scheduler and scene configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound for a single frame delta. Gaps from tab backgrounding or a
    /// paused debugger are clamped to this value.
    #[serde(deserialize_with = "positive_ms")]
    pub max_frame_delta_ms: f64,

    /// Divisor of the exponential moving average used for the fps readout.
    #[serde(deserialize_with = "positive_ms")]
    pub frame_time_smoothing: f64,

    /// Decimal places of the fps status string.
    pub status_precision: usize,

    /// Per-kind light budget.
    pub light_limits: LightLimits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightLimits {
    pub spot: usize,
    pub positional: usize,
    pub directional: usize,
}

impl Default for LightLimits {
    fn default() -> Self {
        Self {
            spot: 10,
            positional: 10,
            directional: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: 2000.0,
            frame_time_smoothing: 20.0,
            status_precision: 1,
            light_limits: LightLimits::default(),
        }
    }
}

impl Config {
    /// Reject values that would turn the frame clamp or the fps average
    /// into garbage.
    pub fn validate(&self) -> Result<(), AnimationError> {
        for (field, v) in [
            ("max_frame_delta_ms", self.max_frame_delta_ms),
            ("frame_time_smoothing", self.frame_time_smoothing),
        ] {
            if !is_positive(v) {
                return Err(AnimationError::invalid(format!(
                    "config {field} must be positive and finite, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Copy with every invalid field replaced by its default.
    pub(crate) fn sanitized(mut self) -> Self {
        let defaults = Config::default();
        if !is_positive(self.max_frame_delta_ms) {
            self.max_frame_delta_ms = defaults.max_frame_delta_ms;
        }
        if !is_positive(self.frame_time_smoothing) {
            self.frame_time_smoothing = defaults.frame_time_smoothing;
        }
        self
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn positive_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let v = f64::deserialize(deserializer)?;
    if is_positive(v) {
        Ok(v)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a positive finite number, got {v}"
        )))
    }
}
