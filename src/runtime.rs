//! Runtime abstraction layer for delayed work
//!
//! The widget itself is single-threaded and event driven. The only deferred
//! work it ever needs is a delayed callback, which this module spawns on a
//! runtime and hands back as a cancelable handle.

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

#[cfg(feature = "tokio-runtime")]
pub use self::tokio_impl::spawn_after;

#[cfg(feature = "tokio-runtime")]
mod tokio_impl {
    use super::AsyncHandle;
    use ::tokio::task::JoinHandle;
    use std::time::Duration;

    struct TokioHandle(JoinHandle<()>);

    impl AsyncHandle for TokioHandle {
        fn is_finished(&self) -> bool {
            self.0.is_finished()
        }

        fn cancel(&self) {
            self.0.abort();
        }
    }

    /// Runs `callback` on `runtime` once `delay` has elapsed, unless canceled first
    pub fn spawn_after<F>(
        runtime: &::tokio::runtime::Handle,
        delay: Duration,
        callback: F,
    ) -> Box<dyn AsyncHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            ::tokio::time::sleep(delay).await;
            callback();
        });
        Box::new(TokioHandle(handle))
    }
}

#[cfg(all(test, feature = "tokio-runtime"))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_spawn_after_runs_callback() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let handle = spawn_after(
            &::tokio::runtime::Handle::current(),
            Duration::from_millis(100),
            move || flag.store(true, Ordering::SeqCst),
        );

        ::tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(ran.load(Ordering::SeqCst));
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_canceled_callback_never_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let handle = spawn_after(
            &::tokio::runtime::Handle::current(),
            Duration::from_millis(100),
            move || flag.store(true, Ordering::SeqCst),
        );
        handle.cancel();

        ::tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }
}
