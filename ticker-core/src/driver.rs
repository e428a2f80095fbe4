//! Background task that re-enters the frame loop on every off -> on
//! transition of the scrolling signal.

use std::fmt;

use tokio::task::JoinHandle;

use crate::engine::{LoopExit, TickerEngine};
use crate::item::ItemKey;

/// Handle to a spawned driver. Dropping it aborts the task.
pub struct AnimationDriver {
    task: JoinHandle<()>,
}

impl AnimationDriver {
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AnimationDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl fmt::Debug for AnimationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

impl<K> TickerEngine<K>
where
    K: ItemKey,
{
    /// Spawn a task that runs [`run_animation`](Self::run_animation) whenever
    /// the scrolling signal is (or becomes) true. The item count is read from
    /// the engine at each entry so collection changes are picked up.
    pub fn spawn_driver(&self, speed_multiplier: f32, spacing: f32) -> AnimationDriver {
        let engine = self.clone();
        let task = self.runtime().spawn(async move {
            let mut active = engine.scrolling().subscribe();
            loop {
                let scrolling = *active.borrow_and_update();
                if scrolling {
                    let item_count = engine.item_count();
                    let exit = engine
                        .run_animation(speed_multiplier, spacing, item_count)
                        .await;
                    if exit == LoopExit::Superseded {
                        tracing::debug!(target: "ticker::driver", "driver loop superseded by another caller");
                    }
                }
                if active.changed().await.is_err() {
                    break;
                }
            }
        });
        AnimationDriver { task }
    }
}
