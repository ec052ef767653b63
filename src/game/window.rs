//! Defense-window timer.

use std::io;
use std::sync::{Arc, Condvar, PoisonError};
use std::thread;
use std::time::Duration;

use crate::sync::Mutex;

#[derive(Debug, Default)]
struct Signal {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl Signal {
    /// Waits for `duration` or until cancelled. Returns `true` if the full
    /// duration elapsed without cancellation.
    fn wait(&self, duration: Duration) -> bool {
        let (cancelled, _) = self
            .wake
            .wait_timeout_while(self.cancelled.lock(), duration, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        !*cancelled
    }
}

/// A detached, cancellable one-shot timer.
///
/// The timer thread only decides *when* to call back. Whether the callback
/// still applies is decided by the game under its own lock, so a stale
/// callback is harmless.
#[derive(Debug, Clone)]
pub(crate) struct DefenseTimer {
    signal: Arc<Signal>,
}

impl DefenseTimer {
    /// Starts a timer that runs `on_expire` after `duration` unless cancelled first.
    pub(crate) fn spawn<F>(name: String, duration: Duration, on_expire: F) -> io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let signal = Arc::new(Signal::default());
        let waiter = Arc::clone(&signal);

        thread::Builder::new().name(name).spawn(move || {
            if waiter.wait(duration) {
                on_expire();
            }
        })?;

        Ok(Self { signal })
    }

    /// Cancels the timer. Idempotent.
    pub(crate) fn cancel(&self) {
        *self.signal.cancelled.lock() = true;
        self.signal.wake.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn is_cancelled(&self) -> bool {
        *self.signal.cancelled.lock()
    }
}

/// The open attack window of the current exchange.
#[derive(Debug, Clone)]
pub(crate) struct OpenWindow {
    /// Identifies this window; expiry callbacks carry it back.
    pub(crate) epoch: u64,
    /// Roster index of the defending player.
    pub(crate) defender: usize,
    /// Running timer, once spawned.
    pub(crate) timer: Option<DefenseTimer>,
}

impl OpenWindow {
    pub(crate) const fn new(epoch: u64, defender: usize) -> Self {
        Self {
            epoch,
            defender,
            timer: None,
        }
    }

    pub(crate) fn cancel(&self) {
        if let Some(timer) = &self.timer {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn fires_after_duration() {
        let (tx, rx) = mpsc::channel();
        let _timer = DefenseTimer::spawn("t-fire".into(), Duration::from_millis(10), move || {
            tx.send(()).ok();
        })
        .unwrap();

        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let timer = DefenseTimer::spawn("t-cancel".into(), Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        timer.cancel();
        timer.cancel();
        assert!(timer.is_cancelled());

        thread::sleep(Duration::from_millis(150));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
