//! Toolkit-agnostic host binding.
//!
//! A real view forwards its render, gesture and tap callbacks here. The binding
//! keeps the bookkeeping the engine expects from a view: it renders every item
//! twice, reports widths keyed by the original identity (duplicate-pass
//! reports are dropped), holds the live drag translation as a transient
//! overlay and resets the engine when the collection changes.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::TickerConfig;
use crate::driver::AnimationDriver;
use crate::engine::TickerEngine;
use crate::error::Result;
use crate::item::TickerItem;
use crate::signal::ScrollingSignal;

pub type SelectHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// One rendered node of the doubled sequence.
#[derive(Debug)]
pub struct RenderSlot<'a, T> {
    /// Position in the doubled sequence, `0..2 * len`.
    pub index: usize,
    pub item: &'a T,
    /// `true` for the second, wrap-filling copy.
    pub is_duplicate: bool,
}

pub struct TickerHost<T: TickerItem> {
    engine: TickerEngine<T::Id>,
    config: TickerConfig,
    items: Vec<T>,
    on_select: Option<SelectHandler<T>>,
    live_drag: f32,
    dragging: bool,
}

impl<T: TickerItem> fmt::Debug for TickerHost<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickerHost")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("has_select_handler", &self.on_select.is_some())
            .field("live_drag", &self.live_drag)
            .field("dragging", &self.dragging)
            .finish()
    }
}

impl<T: TickerItem> TickerHost<T> {
    pub fn new(config: TickerConfig, scrolling: ScrollingSignal) -> Result<Self> {
        let engine = TickerEngine::from_config(&config, scrolling)?;
        Ok(Self {
            engine,
            config,
            items: Vec::new(),
            on_select: None,
            live_drag: 0.0,
            dragging: false,
        })
    }

    pub fn with_select<F>(mut self, handler: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(handler));
        self
    }

    pub fn engine(&self) -> &TickerEngine<T::Id> {
        &self.engine
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the displayed collection. Any identity or content change
    /// resets the engine and switches scrolling off. Returns whether a reset
    /// happened.
    pub fn set_items(&mut self, items: Vec<T>) -> bool {
        if items == self.items {
            return false;
        }
        self.items = items;
        self.live_drag = 0.0;
        self.dragging = false;
        self.engine.reset();
        self.engine.set_item_count(self.items.len());
        tracing::info!(target: "ticker::host", items = self.items.len(), "ticker items replaced");
        true
    }

    /// The doubled sequence a view should render for seamless looping.
    pub fn render_slots(&self) -> impl Iterator<Item = RenderSlot<'_, T>> + '_ {
        let len = self.items.len();
        self.items
            .iter()
            .chain(self.items.iter())
            .enumerate()
            .map(move |(index, item)| RenderSlot {
                index,
                item,
                is_duplicate: index >= len,
            })
    }

    /// Measurement callback. Only the primary pass feeds the width table.
    pub fn report_width(&self, slot: &RenderSlot<'_, T>, width: f32) -> bool {
        if slot.is_duplicate {
            return false;
        }
        self.engine.record_width(slot.item.id(), width)
    }

    /// Live drag update. The first update of a gesture stops scrolling
    /// without scheduling a resume.
    pub fn drag_changed(&mut self, translation: f32) {
        if !self.dragging {
            self.dragging = true;
            self.engine.pause(Duration::ZERO);
        }
        if translation.is_finite() {
            self.live_drag = translation;
        }
    }

    /// Drag end: commit the final translation and schedule auto-resume.
    pub fn drag_ended(&mut self, translation: f32) {
        self.dragging = false;
        self.live_drag = 0.0;
        self.engine.apply_drag_delta(translation);
        self.engine.pause(self.config.resume_delay());
    }

    /// Tap on an item: pause (with auto-resume) first, then select.
    /// Returns `false` when no displayed item has that identity.
    pub fn tap(&self, id: &T::Id) -> bool {
        self.engine.pause(self.config.resume_delay());
        let Some(item) = self.items.iter().find(|item| &item.id() == id) else {
            tracing::debug!(target: "ticker::host", item = ?id, "tap on unknown item");
            return false;
        };
        if let Some(handler) = &self.on_select {
            handler(item);
        }
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Offset the view should paint at: committed offset plus live drag.
    pub fn display_offset(&self) -> f32 {
        self.engine.offset() + self.live_drag
    }

    pub fn start(&self) {
        self.engine.resume();
    }

    pub fn stop(&self) {
        self.engine.pause(Duration::ZERO);
    }

    pub fn spawn_driver(&self) -> AnimationDriver {
        self.engine
            .spawn_driver(self.config.speed, self.config.spacing)
    }
}

impl<T: TickerItem> Drop for TickerHost<T> {
    fn drop(&mut self) {
        self.engine.shutdown();
    }
}
