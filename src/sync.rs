//! Synchronization primitives shared by the search and its coordinator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};

/// A thread-safe stop flag for cooperative search cancellation.
///
/// Every worker polls it at each node. Cancellation is advisory: a worker
/// that sees the flag unwinds to the root and its iteration is discarded.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// One-shot signal that can be fired from any thread and waited on.
///
/// Firing more than once is harmless; a fire that happens before `wait`
/// is remembered.
#[derive(Clone, Debug)]
pub struct Signal {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Signal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Signal { tx, rx }
    }

    pub fn fire(&self) {
        // full means already fired
        let _ = self.tx.try_send(());
    }

    #[must_use]
    pub fn is_fired(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Block until the signal has been fired.
    pub fn wait(&self) {
        if self.rx.recv().is_ok() {
            // keep it fired for later waiters
            self.fire();
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn stop_flag_lifecycle() {
        let flag = StopFlag::new();
        assert!(!flag.is_stopped());
        flag.stop();
        assert!(flag.is_stopped());
        flag.reset();
        assert!(!flag.is_stopped());
    }

    #[test]
    fn stop_flag_clones_share_state() {
        let flag = StopFlag::new();
        let other = flag.clone();
        flag.stop();
        assert!(other.is_stopped());
    }

    #[test]
    fn signal_fired_before_wait_is_remembered() {
        let signal = Signal::new();
        signal.fire();
        signal.fire();
        signal.wait();
        assert!(signal.is_fired());
    }

    #[test]
    fn signal_wakes_waiter() {
        let signal = Signal::new();
        let remote = signal.clone();
        let waiter = thread::spawn(move || remote.wait());
        thread::sleep(Duration::from_millis(20));
        signal.fire();
        waiter.join().unwrap();
    }
}
