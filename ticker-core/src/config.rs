use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{layout, motion, timing};
use crate::cycle::ScrollSpeed;
use crate::error::{Result, TickerError};

/// Caller-supplied knobs for a ticker instance.
///
/// All fields carry defaults so hosts can override only what they care about.
/// Values are validated against their natural numeric domains only; a speed of
/// zero is legal and simply turns the frame loop into a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Speed multiplier. Points per second = `speed * 10`.
    pub speed: f32,
    /// Fixed render height of the strip, in layout units.
    pub height: f32,
    /// Gap between items. One gap per item is part of the cycle width.
    pub spacing: f32,
    /// Delay (ms) before auto-resume after a tap or drag. 0 disables auto-resume.
    pub resume_delay_ms: u64,
    /// Target frame rate of the animation loop.
    pub frame_rate_hz: u32,
    /// Interval (ms) between width-table readiness checks.
    pub width_poll_interval_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            speed: motion::DEFAULT_SPEED,
            height: layout::HEIGHT,
            spacing: layout::ITEM_SPACING,
            resume_delay_ms: timing::RESUME_DELAY_MS,
            frame_rate_hz: motion::FRAME_RATE_HZ,
            width_poll_interval_ms: timing::WIDTH_POLL_INTERVAL_MS,
        }
    }
}

impl TickerConfig {
    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    pub fn width_poll_interval(&self) -> Duration {
        Duration::from_millis(self.width_poll_interval_ms.max(1))
    }

    pub fn scroll_speed(&self) -> ScrollSpeed {
        ScrollSpeed::new(self.speed, self.frame_rate_hz)
    }

    /// Reject values outside their natural domains.
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(TickerError::InvalidConfig(format!(
                "speed must be a finite value >= 0, got {}",
                self.speed
            )));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(TickerError::InvalidConfig(format!(
                "spacing must be a finite value >= 0, got {}",
                self.spacing
            )));
        }
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(TickerError::InvalidConfig(format!(
                "height must be a finite value >= 0, got {}",
                self.height
            )));
        }
        if self.frame_rate_hz == 0 {
            return Err(TickerError::InvalidConfig(
                "frame_rate_hz must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
