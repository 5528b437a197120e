//! Timers scoped to a single request.
//!
//! Every timer spawned for a request is owned by a [`RequestTimers`] and is
//! gone once [`RequestTimers::shutdown`] returns. Dropping the owner without a
//! shutdown still aborts the tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Counts live timer tasks; decremented when the task's future is dropped.
struct LiveTimer {
    live: Arc<AtomicUsize>,
}

impl LiveTimer {
    fn register(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            live: Arc::clone(live),
        }
    }
}

impl Drop for LiveTimer {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) struct RequestTimers {
    live: Arc<AtomicUsize>,
    handles: Vec<JoinHandle<()>>,
}

impl RequestTimers {
    pub(crate) fn new(live: Arc<AtomicUsize>) -> Self {
        Self {
            live,
            handles: Vec::new(),
        }
    }

    /// Runs `on_fire` once `delay` has elapsed, unless shut down first.
    pub(crate) fn spawn<F>(&mut self, name: &'static str, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let guard = LiveTimer::register(&self.live);
        self.handles.push(tokio::spawn(async move {
            let _guard = guard;
            tokio::time::sleep(delay).await;
            trace!(timer = name, "timer fired");
            on_fire();
        }));
    }

    /// Aborts all timers and waits until each task has been torn down.
    pub(crate) async fn shutdown(mut self) {
        for handle in std::mem::take(&mut self.handles) {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for RequestTimers {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
