use std::fmt;

use ticker_core::TickerConfig;

/// Frame rates above this rarely match any display and only burn CPU.
const MAX_USEFUL_FRAME_RATE_HZ: u32 = 240;
const SLOW_WIDTH_POLL_MS: u64 = 1_000;

/// A setting that passes [`TickerConfig::validate`] but is probably not
/// what the operator meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `speed` is 0, so the frame loop never starts moving.
    Stationary,
    /// `resume_delay_ms` is 0, so taps and drags stop the ticker for good.
    NoAutoResume,
    FrameRateHigh { frame_rate_hz: u32 },
    SlowWidthPoll { interval_ms: u64 },
}

impl ConfigWarning {
    /// Config field the warning is about.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Stationary => "speed",
            Self::NoAutoResume => "resume_delay_ms",
            Self::FrameRateHigh { .. } => "frame_rate_hz",
            Self::SlowWidthPoll { .. } => "width_poll_interval_ms",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Stationary => {
                Some("set TICKER_SPEED or `speed` to a positive multiplier")
            }
            Self::NoAutoResume => Some("set TICKER_RESUME_DELAY, e.g. `3s`"),
            Self::FrameRateHigh { .. } => {
                Some("values above 240 rarely render any faster")
            }
            Self::SlowWidthPoll { .. } => None,
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stationary => f.write_str("speed is 0; the ticker will never move")?,
            Self::NoAutoResume => f.write_str(
                "resume_delay_ms is 0; scrolling stays paused after a tap or drag",
            )?,
            Self::FrameRateHigh { frame_rate_hz } => {
                write!(f, "frame_rate_hz {frame_rate_hz} is unusually high")?
            }
            Self::SlowWidthPoll { interval_ms } => write!(
                f,
                "width_poll_interval_ms {interval_ms} delays the first frame noticeably"
            )?,
        }
        match self.hint() {
            Some(hint) => write!(f, " ({hint})"),
            None => Ok(()),
        }
    }
}

pub type ConfigWarnings = Vec<ConfigWarning>;

/// Flag settings that are legal but surprising. Hard errors are left to
/// [`TickerConfig::validate`].
pub fn collect_warnings(config: &TickerConfig) -> ConfigWarnings {
    let checks = [
        (config.speed == 0.0).then_some(ConfigWarning::Stationary),
        (config.resume_delay_ms == 0).then_some(ConfigWarning::NoAutoResume),
        (config.frame_rate_hz > MAX_USEFUL_FRAME_RATE_HZ).then_some(
            ConfigWarning::FrameRateHigh {
                frame_rate_hz: config.frame_rate_hz,
            },
        ),
        (config.width_poll_interval_ms >= SLOW_WIDTH_POLL_MS).then_some(
            ConfigWarning::SlowWidthPoll {
                interval_ms: config.width_poll_interval_ms,
            },
        ),
    ];
    checks.into_iter().flatten().collect()
}
