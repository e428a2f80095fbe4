//! Shared scrolling signal.
//!
//! The flag is owned by whoever created it (usually the host) and shared with
//! the engine. Both sides read and write it; neither holds it exclusively.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone)]
pub struct ScrollingSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ScrollingSignal {
    pub fn new(initial: bool) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn get(&self) -> bool {
        *self.sender.borrow()
    }

    /// Store `active`; subscribers are only woken on an actual change.
    /// Returns whether the value changed.
    pub fn set(&self, active: bool) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == active {
                false
            } else {
                *current = active;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Whether two handles share the same underlying flag.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.sender, &other.sender)
    }
}

impl Default for ScrollingSignal {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for ScrollingSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollingSignal")
            .field("active", &self.get())
            .field("handles", &Arc::strong_count(&self.sender))
            .finish()
    }
}
