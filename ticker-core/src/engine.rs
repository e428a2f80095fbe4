//! Scroll/timing engine behind a looping ticker.
//!
//! The engine owns the scroll offset, the measured width of every item, the
//! frame loop and the auto-resume timer. It is cheap to clone; clones share
//! state. The scrolling flag is not owned by the engine: the host hands in a
//! [`ScrollingSignal`] and both sides read and write it.
//!
//! All offset writes (frame decrement, drag commit, reset) go through a single
//! mutex, and the frame loop re-checks that it is still the active loop under
//! that mutex before every write, so a loop that lost its slot to a reset can
//! never touch the offset again.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::config::TickerConfig;
use crate::constants::{motion, timing};
use crate::cycle::{self, CycleMetrics, ScrollSpeed};
use crate::error::Result;
use crate::events::{TickerEvent, TickerEventBus};
use crate::item::ItemKey;
use crate::signal::ScrollingSignal;
use crate::timer::DelayedAction;
use crate::width_table::WidthTable;

/// Why [`TickerEngine::run_animation`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The scrolling signal was already off at entry.
    NotScrolling,
    /// No items, or the cycle width was not positive.
    EmptyCycle,
    /// Speed resolves to no forward motion.
    Stationary,
    /// The scrolling signal was switched off.
    Paused,
    /// The engine cancelled the loop (reset or teardown). The canceller owns
    /// the signal; the loop leaves it alone.
    Cancelled,
    /// A newer loop took over. The signal was left alone.
    Superseded,
}

/// Point-in-time view of engine state for hosts and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSnapshot {
    pub offset: f32,
    pub measured: usize,
    pub item_count: usize,
    pub scrolling: bool,
    pub resume_pending: bool,
    pub animating: bool,
}

#[derive(Debug)]
struct LoopSlot {
    id: u64,
    token: CancellationToken,
}

#[derive(Debug)]
struct EngineState<K> {
    offset: f32,
    widths: WidthTable<K>,
    item_count: usize,
    resume: Option<DelayedAction>,
    resume_generation: u64,
    active_loop: Option<LoopSlot>,
    loop_generation: u64,
}

impl<K> Default for EngineState<K> {
    fn default() -> Self {
        Self {
            offset: 0.0,
            widths: WidthTable::default(),
            item_count: 0,
            resume: None,
            resume_generation: 0,
            active_loop: None,
            loop_generation: 0,
        }
    }
}

struct EngineInner<K> {
    runtime: Handle,
    scrolling: ScrollingSignal,
    events: TickerEventBus,
    frame_rate_hz: u32,
    poll_interval: Duration,
    state: Mutex<EngineState<K>>,
}

impl<K> Drop for EngineInner<K> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(slot) = state.active_loop.take() {
            slot.token.cancel();
        }
        // Dropping the timer cancels it.
        state.resume.take();
    }
}

pub struct TickerEngine<K> {
    inner: Arc<EngineInner<K>>,
}

impl<K> Clone for TickerEngine<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: ItemKey> fmt::Debug for TickerEngine<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("TickerEngine");
        debug
            .field("scrolling", &self.inner.scrolling.get())
            .field("frame_rate_hz", &self.inner.frame_rate_hz)
            .field("poll_interval", &self.inner.poll_interval);
        if let Some(state) = self.inner.state.try_lock() {
            debug
                .field("offset", &state.offset)
                .field("measured", &state.widths.len())
                .field("item_count", &state.item_count)
                .field("resume_pending", &state.resume.is_some())
                .field("animating", &state.active_loop.is_some());
        }
        debug.finish()
    }
}

impl<K> TickerEngine<K>
where
    K: ItemKey,
{
    /// Create an engine bound to the current tokio runtime.
    pub fn new(scrolling: ScrollingSignal) -> Result<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(
            runtime,
            scrolling,
            motion::FRAME_RATE_HZ,
            Duration::from_millis(timing::WIDTH_POLL_INTERVAL_MS),
        ))
    }

    /// Create an engine using the frame rate and poll interval from `config`.
    pub fn from_config(
        config: &TickerConfig,
        scrolling: ScrollingSignal,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(
            runtime,
            scrolling,
            config.frame_rate_hz,
            config.width_poll_interval(),
        ))
    }

    pub fn with_runtime(
        runtime: Handle,
        scrolling: ScrollingSignal,
        frame_rate_hz: u32,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                runtime,
                scrolling,
                events: TickerEventBus::default(),
                frame_rate_hz: frame_rate_hz.max(1),
                poll_interval: poll_interval.max(Duration::from_millis(1)),
                state: Mutex::new(EngineState::default()),
            }),
        }
    }

    pub fn scrolling(&self) -> &ScrollingSignal {
        &self.inner.scrolling
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.inner.runtime
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TickerEvent> {
        self.inner.events.subscribe()
    }

    pub fn watch_offset(&self) -> watch::Receiver<f32> {
        self.inner.events.watch_offset()
    }

    pub fn offset(&self) -> f32 {
        self.inner.state.lock().offset
    }

    pub fn widths_len(&self) -> usize {
        self.inner.state.lock().widths.len()
    }

    pub fn width_of(&self, key: &K) -> Option<f32> {
        self.inner.state.lock().widths.get(key)
    }

    pub fn item_count(&self) -> usize {
        self.inner.state.lock().item_count
    }

    /// Number of items the host currently displays. Governs whether
    /// [`resume`](Self::resume) may switch scrolling on.
    pub fn set_item_count(&self, item_count: usize) {
        self.inner.state.lock().item_count = item_count;
    }

    /// Cycle width for the current table, or `None` until every item has
    /// reported or when the result is not positive.
    pub fn cycle_width(&self, spacing: f32, item_count: usize) -> Option<f32> {
        let state = self.inner.state.lock();
        if !state.widths.is_complete(item_count) {
            return None;
        }
        cycle::cycle_width(state.widths.total(), spacing, item_count)
    }

    pub fn has_pending_resume(&self) -> bool {
        self.inner.state.lock().resume.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.inner.state.lock().active_loop.is_some()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let state = self.inner.state.lock();
        EngineSnapshot {
            offset: state.offset,
            measured: state.widths.len(),
            item_count: state.item_count,
            scrolling: self.inner.scrolling.get(),
            resume_pending: state.resume.is_some(),
            animating: state.active_loop.is_some(),
        }
    }

    /// Clear widths and offset after the item collection changed.
    ///
    /// Also switches scrolling off, drops any pending auto-resume and stops
    /// the active loop, all in one transition.
    pub fn reset(&self) {
        let (timer, slot) = {
            let mut state = self.inner.state.lock();
            state.widths.clear();
            state.offset = 0.0;
            (state.resume.take(), state.active_loop.take())
        };
        self.inner.scrolling.set(false);

        if let Some(slot) = slot {
            slot.token.cancel();
        }
        let had_timer = timer.is_some();
        drop(timer);

        tracing::debug!(target: "ticker::engine", had_timer, "ticker reset");
        if had_timer {
            self.inner.events.publish(TickerEvent::ResumeCancelled);
        }
        self.inner.events.publish(TickerEvent::Reset);
        self.inner
            .events
            .publish(TickerEvent::OffsetChanged { offset: 0.0 });
    }

    /// Record the measured width of an item. Returns `false` (and emits
    /// nothing) when the stored width is unchanged.
    pub fn record_width(&self, key: K, width: f32) -> bool {
        let (changed, measured, total_width) = {
            let mut state = self.inner.state.lock();
            let changed = state.widths.record(key.clone(), width);
            (changed, state.widths.len(), state.widths.total())
        };
        if changed {
            tracing::trace!(
                target: "ticker::engine",
                item = ?key,
                width,
                measured,
                "width recorded"
            );
            self.inner.events.publish(TickerEvent::WidthRecorded {
                measured,
                total_width,
            });
        }
        changed
    }

    /// Stop scrolling. A non-zero `resume_after` schedules an automatic
    /// [`resume`](Self::resume); any earlier pending resume is dropped first.
    pub fn pause(&self, resume_after: Duration) {
        self.inner.scrolling.set(false);

        let previous = {
            let mut state = self.inner.state.lock();
            let previous = state.resume.take();
            if !resume_after.is_zero() {
                state.resume_generation += 1;
                let generation = state.resume_generation;
                let weak = Arc::downgrade(&self.inner);
                state.resume = Some(DelayedAction::spawn(
                    &self.inner.runtime,
                    generation,
                    resume_after,
                    move |generation| fire_resume(&weak, generation),
                ));
            }
            previous
        };

        let superseded = previous.is_some();
        drop(previous);

        tracing::debug!(
            target: "ticker::engine",
            ?resume_after,
            superseded,
            "scrolling paused"
        );
        if superseded {
            self.inner.events.publish(TickerEvent::ResumeCancelled);
        }
        self.inner.events.publish(TickerEvent::Paused {
            resume_after: (!resume_after.is_zero()).then_some(resume_after),
        });
    }

    /// Drop any pending auto-resume and switch scrolling on, unless there is
    /// nothing to show.
    pub fn resume(&self) {
        let (timer, item_count) = {
            let mut state = self.inner.state.lock();
            (state.resume.take(), state.item_count)
        };
        drop(timer);
        self.resume_with_count(item_count);
    }

    fn resume_with_count(&self, item_count: usize) {
        if item_count == 0 {
            tracing::debug!(target: "ticker::engine", "resume ignored: no items");
            return;
        }
        self.inner.scrolling.set(true);
        tracing::debug!(target: "ticker::engine", item_count, "scrolling resumed");
        self.inner.events.publish(TickerEvent::Resumed);
    }

    /// Commit the final translation of a drag gesture.
    pub fn apply_drag_delta(&self, delta: f32) {
        if !delta.is_finite() {
            tracing::warn!(target: "ticker::engine", delta, "ignoring non-finite drag delta");
            return;
        }
        let offset = {
            let mut state = self.inner.state.lock();
            state.offset += delta;
            state.offset
        };
        tracing::trace!(target: "ticker::engine", delta, offset, "drag committed");
        self.inner
            .events
            .publish(TickerEvent::OffsetChanged { offset });
    }

    /// Stop the active loop as if torn down. Scrolling is forced off.
    pub fn cancel_animation(&self) {
        let slot = self.inner.state.lock().active_loop.take();
        if let Some(slot) = slot {
            slot.token.cancel();
        }
        self.inner.scrolling.set(false);
    }

    /// Tear down: cancel the pending resume and the active loop.
    pub fn shutdown(&self) {
        let timer = self.inner.state.lock().resume.take();
        drop(timer);
        self.cancel_animation();
        tracing::debug!(target: "ticker::engine", "ticker engine shut down");
    }

    /// Run the frame loop until scrolling stops or the loop is cancelled.
    ///
    /// Waits (polling) until `item_count` widths are known, then moves the
    /// offset left by `speed_multiplier * 10 / frame_rate` every frame,
    /// folding it back by the cycle width when it crosses `-cycle_width`.
    pub async fn run_animation(
        &self,
        speed_multiplier: f32,
        spacing: f32,
        item_count: usize,
    ) -> LoopExit {
        if !self.inner.scrolling.get() {
            return LoopExit::NotScrolling;
        }
        if item_count == 0 {
            return LoopExit::EmptyCycle;
        }

        let (id, token) = self.claim_loop();
        let exit = self
            .drive(id, &token, speed_multiplier, spacing, item_count)
            .await;
        self.release_loop(id);

        tracing::debug!(target: "ticker::engine", loop_id = id, ?exit, "animation loop exited");
        exit
    }

    async fn drive(
        &self,
        id: u64,
        token: &CancellationToken,
        speed_multiplier: f32,
        spacing: f32,
        item_count: usize,
    ) -> LoopExit {
        let total_width = loop {
            let ready = {
                let state = self.inner.state.lock();
                if !owns_slot(&state, id) {
                    None
                } else {
                    Some(
                        state
                            .widths
                            .is_complete(item_count)
                            .then(|| state.widths.total()),
                    )
                }
            };
            match ready {
                None => return self.lost_slot(id),
                Some(Some(total)) => break total,
                Some(None) => {}
            }
            tokio::select! {
                biased;
                _ = token.cancelled() => return self.lost_slot(id),
                _ = tokio::time::sleep(self.inner.poll_interval) => {}
            }
        };

        let Some(cycle_width) =
            cycle::cycle_width(total_width, spacing, item_count)
        else {
            return LoopExit::EmptyCycle;
        };
        let speed = ScrollSpeed::new(speed_multiplier, self.inner.frame_rate_hz);
        let metrics = CycleMetrics::new(cycle_width, speed);
        if !(metrics.increment().is_finite() && metrics.increment() > 0.0) {
            return LoopExit::Stationary;
        }
        let frame = speed.frame_period();

        tracing::debug!(
            target: "ticker::engine",
            loop_id = id,
            cycle_width,
            increment = metrics.increment(),
            "animation loop running"
        );

        loop {
            if !self.inner.scrolling.get() {
                return LoopExit::Paused;
            }
            let step = {
                let mut state = self.inner.state.lock();
                if owns_slot(&state, id) {
                    let (next, wrapped) = metrics.advance(state.offset);
                    state.offset = next;
                    Some((next, wrapped))
                } else {
                    None
                }
            };
            let Some((offset, wrapped)) = step else {
                return self.lost_slot(id);
            };

            self.inner
                .events
                .publish(TickerEvent::OffsetChanged { offset });
            if wrapped {
                self.inner
                    .events
                    .publish(TickerEvent::Wrapped { cycle_width });
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => return self.lost_slot(id),
                _ = tokio::time::sleep(frame) => {}
            }
        }
    }

    fn claim_loop(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let (id, previous) = {
            let mut state = self.inner.state.lock();
            state.loop_generation += 1;
            let id = state.loop_generation;
            let previous = state.active_loop.replace(LoopSlot {
                id,
                token: token.clone(),
            });
            (id, previous)
        };
        if let Some(previous) = previous {
            tracing::debug!(
                target: "ticker::engine",
                superseded = previous.id,
                loop_id = id,
                "superseding animation loop"
            );
            previous.token.cancel();
        }
        (id, token)
    }

    fn release_loop(&self, id: u64) {
        let mut state = self.inner.state.lock();
        if owns_slot(&state, id) {
            state.active_loop = None;
        }
    }

    /// Exit path once a loop notices it was cancelled or replaced.
    ///
    /// Never writes the signal: `reset`, `cancel_animation` and `shutdown`
    /// switch it off synchronously, and the host may already have resumed by
    /// the time a stale loop is polled again.
    fn lost_slot(&self, id: u64) -> LoopExit {
        let state = self.inner.state.lock();
        if matches!(&state.active_loop, Some(slot) if slot.id != id) {
            LoopExit::Superseded
        } else {
            LoopExit::Cancelled
        }
    }
}

fn owns_slot<K>(state: &EngineState<K>, id: u64) -> bool {
    matches!(&state.active_loop, Some(slot) if slot.id == id)
}

/// Timer callback. Only the timer the engine currently tracks may resume.
fn fire_resume<K: ItemKey>(weak: &Weak<EngineInner<K>>, generation: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let engine = TickerEngine { inner };
    let item_count = {
        let mut state = engine.inner.state.lock();
        match &state.resume {
            Some(timer) if timer.generation() == generation => {}
            _ => return,
        }
        state.resume = None;
        state.item_count
    };
    tracing::debug!(target: "ticker::engine", generation, "auto-resume fired");
    engine.resume_with_count(item_count);
}
