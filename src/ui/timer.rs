//! Cancelable delayed hide for info panels.
//!
//! A timer holds at most one pending hide. Scheduling cancels whatever was
//! pending, and every schedule carries a generation number so a late firing
//! from a replaced schedule can be told apart from the current one.

use crate::prelude::{Duration, Instant};

pub trait AutoHideTimer: Send {
    /// Replace any pending hide with one firing `after` from `now`
    fn schedule(&mut self, generation: u64, after: Duration, now: Instant);

    /// Drop the pending hide, if any
    fn cancel(&mut self);

    /// Returns the generation of a hide that has fired since the last poll
    fn poll_fired(&mut self, now: Instant) -> Option<u64>;

    fn is_pending(&self) -> bool;
}

/// Deadline timer driven by the host's frame loop
#[derive(Debug, Clone, Default)]
pub struct DeadlineTimer {
    pending: Option<(u64, Instant)>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }
}

impl AutoHideTimer for DeadlineTimer {
    fn schedule(&mut self, generation: u64, after: Duration, now: Instant) {
        self.pending = Some((generation, now + after));
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn poll_fired(&mut self, now: Instant) -> Option<u64> {
        match self.pending {
            Some((generation, deadline)) if deadline <= now => {
                self.pending = None;
                Some(generation)
            }
            _ => None,
        }
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(feature = "tokio-runtime")]
pub use self::tokio_timer::TokioTimer;

#[cfg(feature = "tokio-runtime")]
mod tokio_timer {
    use super::*;
    use crate::runtime::{spawn_after, AsyncHandle};
    use crossbeam_channel::{unbounded, Receiver, Sender};

    /// Timer that sleeps on a tokio task and reports back over a channel.
    ///
    /// The previous task is aborted whenever a new hide is scheduled, the
    /// pending hide is canceled, or the timer is dropped.
    pub struct TokioTimer {
        runtime: ::tokio::runtime::Handle,
        fired_tx: Sender<u64>,
        fired_rx: Receiver<u64>,
        task: Option<Box<dyn AsyncHandle>>,
        pending: Option<u64>,
    }

    impl TokioTimer {
        pub fn new(runtime: ::tokio::runtime::Handle) -> Self {
            let (fired_tx, fired_rx) = unbounded();
            Self {
                runtime,
                fired_tx,
                fired_rx,
                task: None,
                pending: None,
            }
        }

        /// Timer on the runtime of the calling context, if there is one
        pub fn current() -> Option<Self> {
            ::tokio::runtime::Handle::try_current().ok().map(Self::new)
        }
    }

    impl AutoHideTimer for TokioTimer {
        fn schedule(&mut self, generation: u64, after: Duration, _now: Instant) {
            self.cancel();
            let tx = self.fired_tx.clone();
            self.task = Some(spawn_after(&self.runtime, after, move || {
                // Receiver gone means the widget was torn down
                let _ = tx.send(generation);
            }));
            self.pending = Some(generation);
        }

        fn cancel(&mut self) {
            if let Some(task) = self.task.take() {
                task.cancel();
            }
            self.pending = None;
        }

        fn poll_fired(&mut self, _now: Instant) -> Option<u64> {
            let mut fired = None;
            for generation in self.fired_rx.try_iter() {
                if self.pending == Some(generation) {
                    self.pending = None;
                    self.task = None;
                    fired = Some(generation);
                } else {
                    log::debug!("ignoring stale auto-hide generation {}", generation);
                }
            }
            fired
        }

        fn is_pending(&self) -> bool {
            self.pending.is_some()
        }
    }

    impl Drop for TokioTimer {
        fn drop(&mut self) {
            self.cancel();
        }
    }
}
