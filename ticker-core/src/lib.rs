//! # Ticker Core
//!
//! Scroll, timing and measurement engine for an infinitely looping horizontal
//! ticker. The view layer of any toolkit renders the items; this crate decides
//! where they are.
//!
//! ## Overview
//!
//! - **Engine**: offset, measured widths, frame loop and auto-resume timer
//! - **Signal**: the shared scrolling flag owned by the host
//! - **Events**: explicit offset/width/pause notifications for repainting
//! - **Host binding**: duplicate-aware width reporting, drag overlay, taps
//!
//! ## Architecture
//!
//! - [`engine`]: [`TickerEngine`] and the frame loop
//! - [`cycle`]: pure cycle-width and wrap arithmetic
//! - [`timer`]: cancellable delayed actions
//! - [`host`]: [`TickerHost`], the glue a view talks to
//!
//! ## Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use ticker_core::{ScrollingSignal, TickerEngine};
//!
//! async fn scroll() -> ticker_core::Result<()> {
//!     let scrolling = ScrollingSignal::new(false);
//!     let engine = TickerEngine::<u32>::new(scrolling.clone())?;
//!     engine.set_item_count(2);
//!     engine.record_width(1, 120.0);
//!     engine.record_width(2, 80.0);
//!
//!     let _driver = engine.spawn_driver(5.0, 20.0);
//!     engine.resume();
//!     tokio::time::sleep(Duration::from_secs(1)).await;
//!     engine.pause(Duration::from_secs(3));
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Shared tuning constants
pub mod constants;

/// Ticker configuration surface
pub mod config;

pub mod cycle;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod item;
pub mod signal;
pub mod timer;
pub mod width_table;

pub use config::TickerConfig;
pub use cycle::{CycleMetrics, ScrollSpeed};
pub use driver::AnimationDriver;
pub use engine::{EngineSnapshot, LoopExit, TickerEngine};
pub use error::{Result, TickerError};
pub use events::{TickerEvent, TickerEventBus};
pub use host::{RenderSlot, SelectHandler, TickerHost};
pub use item::{ItemKey, TickerItem};
pub use signal::ScrollingSignal;
pub use timer::DelayedAction;
pub use width_table::WidthTable;
