//! Ticker constants
//!
//! Shared defaults for ticker motion, timing and layout. Tuning should happen
//! here so every ticker instance and the config defaults stay consistent.

/// Motion defaults for the frame loop.
pub mod motion {
    /// Scale factor relating the public speed multiplier to points per second.
    pub const POINTS_PER_SECOND_PER_SPEED: f32 = 10.0;
    /// Target frame rate of the animation loop (Hz).
    pub const FRAME_RATE_HZ: u32 = 60;
    /// Default speed multiplier (50 points per second).
    pub const DEFAULT_SPEED: f32 = 5.0;
}

/// Timing defaults for measurement polling and auto-resume.
pub mod timing {
    /// Interval (ms) between checks for a fully populated width table.
    pub const WIDTH_POLL_INTERVAL_MS: u64 = 50;
    /// Delay (ms) after user interaction before scrolling resumes.
    pub const RESUME_DELAY_MS: u64 = 3_000;
}

/// Layout defaults handed to the host view.
pub mod layout {
    /// Fixed render height of the ticker strip.
    pub const HEIGHT: f32 = 44.0;
    /// Gap between adjacent items, also applied after the last item of a cycle.
    pub const ITEM_SPACING: f32 = 20.0;
}

/// Event bus sizing.
pub mod events {
    /// Broadcast capacity; lagging subscribers skip to the newest events.
    pub const BUS_CAPACITY: usize = 256;
}
