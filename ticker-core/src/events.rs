use std::time::Duration;

use tokio::sync::{broadcast, watch};

use crate::constants;

/// Notifications emitted by the engine. Views subscribe to these instead of
/// relying on implicit re-rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerEvent {
    OffsetChanged { offset: f32 },
    /// A width was inserted or changed. `measured` is the table size after the
    /// update and `total_width` the sum of all recorded widths.
    WidthRecorded { measured: usize, total_width: f32 },
    /// The offset folded back by one or more cycles.
    Wrapped { cycle_width: f32 },
    Reset,
    Paused { resume_after: Option<Duration> },
    Resumed,
    /// A pending auto-resume was dropped before it fired.
    ResumeCancelled,
}

/// In-process fan-out of engine notifications plus a latest-value offset
/// channel for views that only care about the current position.
#[derive(Debug)]
pub struct TickerEventBus {
    sender: broadcast::Sender<TickerEvent>,
    offset: watch::Sender<f32>,
}

impl TickerEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let (offset, _) = watch::channel(0.0);
        Self { sender, offset }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TickerEvent> {
        self.sender.subscribe()
    }

    pub fn watch_offset(&self) -> watch::Receiver<f32> {
        self.offset.subscribe()
    }

    pub fn publish(&self, event: TickerEvent) {
        if let TickerEvent::OffsetChanged { offset } = event {
            self.offset.send_replace(offset);
        }
        // No subscribers is fine; the event is simply dropped.
        let _ = self.sender.send(event);
    }
}

impl Default for TickerEventBus {
    fn default() -> Self {
        Self::new(constants::events::BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = TickerEventBus::default();
        bus.publish(TickerEvent::Reset);
        bus.publish(TickerEvent::OffsetChanged { offset: -3.0 });
        assert_eq!(*bus.watch_offset().borrow(), -3.0);
    }

    #[test]
    fn subscribers_receive_in_order() {
        let bus = TickerEventBus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(TickerEvent::Resumed);
        bus.publish(TickerEvent::OffsetChanged { offset: -1.5 });
        assert_eq!(rx.try_recv().expect("first"), TickerEvent::Resumed);
        assert_eq!(
            rx.try_recv().expect("second"),
            TickerEvent::OffsetChanged { offset: -1.5 }
        );
        assert!(rx.try_recv().is_err());
    }
}
