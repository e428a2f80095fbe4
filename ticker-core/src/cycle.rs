//! Cycle arithmetic for the looping scroll offset.
//!
//! The ticker renders its items twice in a row. Scrolling left by exactly one
//! cycle width yields a frame identical to offset zero, so the offset can be
//! folded back by a whole cycle at any time without a visible jump.

use std::time::Duration;

use crate::constants::motion;

/// Speed knob translated into physical units for a fixed frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpeed {
    multiplier: f32,
    frame_rate_hz: u32,
}

impl ScrollSpeed {
    pub fn new(multiplier: f32, frame_rate_hz: u32) -> Self {
        Self {
            multiplier,
            frame_rate_hz: frame_rate_hz.max(1),
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn frame_rate_hz(&self) -> u32 {
        self.frame_rate_hz
    }

    pub fn points_per_second(&self) -> f32 {
        self.multiplier * motion::POINTS_PER_SECOND_PER_SPEED
    }

    /// Distance travelled per frame.
    pub fn increment(&self) -> f32 {
        self.points_per_second() / self.frame_rate_hz as f32
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate_hz))
    }
}

impl Default for ScrollSpeed {
    fn default() -> Self {
        Self::new(motion::DEFAULT_SPEED, motion::FRAME_RATE_HZ)
    }
}

/// Width of one full pass through all items plus their trailing gaps.
///
/// Returns `None` when the result is not a positive length.
pub fn cycle_width(
    total_item_width: f32,
    spacing: f32,
    item_count: usize,
) -> Option<f32> {
    if item_count == 0 {
        return None;
    }
    let width = total_item_width + spacing * item_count as f32;
    (width.is_finite() && width > 0.0).then_some(width)
}

/// Per-loop constants: how far to move each frame and where to wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleMetrics {
    cycle_width: f32,
    increment: f32,
}

impl CycleMetrics {
    pub fn new(cycle_width: f32, speed: ScrollSpeed) -> Self {
        Self {
            cycle_width,
            increment: speed.increment(),
        }
    }

    pub fn cycle_width(&self) -> f32 {
        self.cycle_width
    }

    pub fn increment(&self) -> f32 {
        self.increment
    }

    /// One frame of motion. Returns the new offset and whether it wrapped.
    ///
    /// Crossing `-cycle_width` folds the offset back by whole cycles, keeping
    /// the sub-frame remainder.
    pub fn advance(&self, offset: f32) -> (f32, bool) {
        let next = offset - self.increment;
        if next <= -self.cycle_width {
            (self.wrap(next), true)
        } else {
            (next, false)
        }
    }

    /// Normalise any offset into `(-cycle_width, 0]`.
    pub fn wrap(&self, offset: f32) -> f32 {
        if self.cycle_width <= 0.0 || !offset.is_finite() {
            return 0.0;
        }
        let rem = offset.rem_euclid(self.cycle_width);
        if rem == 0.0 { 0.0 } else { rem - self.cycle_width }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn speed_scales_to_points_per_frame() {
        let speed = ScrollSpeed::new(5.0, 60);
        assert_eq!(speed.points_per_second(), 50.0);
        assert!(approx(speed.increment(), 50.0 / 60.0, 1e-6));
        let period = speed.frame_period().as_nanos();
        assert!((16_666_666..=16_666_667).contains(&period), "{period}");
    }

    #[test]
    fn zero_frame_rate_is_clamped() {
        let speed = ScrollSpeed::new(1.0, 0);
        assert_eq!(speed.frame_rate_hz(), 1);
        assert_eq!(speed.increment(), 10.0);
    }

    #[test]
    fn cycle_width_sums_widths_and_spacing() {
        assert_eq!(cycle_width(450.0, 20.0, 3), Some(510.0));
        assert_eq!(cycle_width(0.0, 0.0, 3), None);
        assert_eq!(cycle_width(100.0, 10.0, 0), None);
    }

    #[test]
    fn advance_wraps_by_modulo_not_reset() {
        let metrics = CycleMetrics::new(100.0, ScrollSpeed::new(60.0, 60));
        // increment = 10 per frame
        let (next, wrapped) = metrics.advance(-95.0);
        assert!(wrapped);
        assert!(approx(next, -5.0, 1e-4), "got {next}");
    }

    #[test]
    fn advance_lands_exactly_on_boundary() {
        let metrics = CycleMetrics::new(100.0, ScrollSpeed::new(60.0, 60));
        let (next, wrapped) = metrics.advance(-90.0);
        assert!(wrapped);
        assert_eq!(next, 0.0);
    }

    #[test]
    fn wrap_folds_far_drags_into_range() {
        let metrics = CycleMetrics::new(510.0, ScrollSpeed::default());
        assert!(approx(metrics.wrap(-1_093.0), -73.0, 1e-3));
        assert!(approx(metrics.wrap(30.0), -480.0, 1e-3));
        assert_eq!(metrics.wrap(0.0), 0.0);
        assert_eq!(metrics.wrap(f32::NAN), 0.0);
    }

    #[test]
    fn offset_tracks_modular_distance() {
        let metrics = CycleMetrics::new(510.0, ScrollSpeed::new(5.0, 60));
        let mut offset = 0.0_f32;
        let mut wraps = 0;
        for frame in 1..=1_500_u32 {
            let (next, wrapped) = metrics.advance(offset);
            offset = next;
            wraps += usize::from(wrapped);
            assert!(offset <= 0.0 && offset > -510.0, "frame {frame}: {offset}");
        }
        let travelled = 1_500.0_f64 * (50.0 / 60.0);
        let expected = -(travelled % 510.0) as f32;
        assert!(approx(offset, expected, 0.1), "{offset} vs {expected}");
        assert_eq!(wraps, 2);
    }
}
