//! Hard-deadline timer thread.
//!
//! One long-lived thread serves every search session. It is driven by
//! `TimerMessage`s and sets the session's stop flag when an armed deadline
//! passes.

use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::debug;

use crate::sync::StopFlag;

/// Commands understood by the timer thread.
#[derive(Debug)]
pub enum TimerMessage {
    /// Stop `stop` once `deadline` passes
    Arm { deadline: Instant, stop: StopFlag },
    /// Keep the armed deadline but do not fire it (pondering)
    Suspend,
    /// Resume a suspended deadline, firing at once if it already passed
    PonderHit,
    /// Forget the current deadline
    Disarm,
    Quit,
}

enum TimerState {
    Idle,
    Armed { deadline: Instant, stop: StopFlag },
    Suspended { deadline: Instant, stop: StopFlag },
}

/// Body of the timer thread. Returns on `Quit` or when every sender is gone.
pub fn run_timer(rx: &Receiver<TimerMessage>) {
    let mut state = TimerState::Idle;

    loop {
        let msg = match &state {
            TimerState::Armed { deadline, stop } => match rx.recv_deadline(*deadline) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => {
                    debug!("hard deadline reached");
                    stop.stop();
                    state = TimerState::Idle;
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => return,
            },
            _ => match rx.recv() {
                Ok(msg) => msg,
                Err(_) => return,
            },
        };

        state = match (msg, state) {
            (TimerMessage::Quit, _) => return,
            (TimerMessage::Arm { deadline, stop }, _) => TimerState::Armed { deadline, stop },
            (TimerMessage::Suspend, TimerState::Armed { deadline, stop }) => {
                TimerState::Suspended { deadline, stop }
            }
            (TimerMessage::PonderHit, TimerState::Suspended { deadline, stop }) => {
                TimerState::Armed { deadline, stop }
            }
            (TimerMessage::Disarm, _) => TimerState::Idle,
            (_, unchanged) => unchanged,
        };
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use crossbeam_channel::unbounded;

    use super::*;

    fn spawn_timer() -> (crossbeam_channel::Sender<TimerMessage>, thread::JoinHandle<()>) {
        let (tx, rx) = unbounded();
        let handle = thread::spawn(move || run_timer(&rx));
        (tx, handle)
    }

    #[test]
    fn armed_deadline_stops() {
        let (tx, handle) = spawn_timer();
        let stop = StopFlag::new();
        tx.send(TimerMessage::Arm {
            deadline: Instant::now() + Duration::from_millis(30),
            stop: stop.clone(),
        })
        .unwrap();
        thread::sleep(Duration::from_millis(150));
        assert!(stop.is_stopped());
        tx.send(TimerMessage::Quit).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn disarmed_deadline_never_fires() {
        let (tx, handle) = spawn_timer();
        let stop = StopFlag::new();
        tx.send(TimerMessage::Arm {
            deadline: Instant::now() + Duration::from_millis(50),
            stop: stop.clone(),
        })
        .unwrap();
        tx.send(TimerMessage::Disarm).unwrap();
        thread::sleep(Duration::from_millis(120));
        assert!(!stop.is_stopped());
        tx.send(TimerMessage::Quit).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn suspended_deadline_fires_after_ponder_hit() {
        let (tx, handle) = spawn_timer();
        let stop = StopFlag::new();
        tx.send(TimerMessage::Arm {
            deadline: Instant::now() + Duration::from_millis(20),
            stop: stop.clone(),
        })
        .unwrap();
        tx.send(TimerMessage::Suspend).unwrap();
        thread::sleep(Duration::from_millis(80));
        assert!(!stop.is_stopped());

        tx.send(TimerMessage::PonderHit).unwrap();
        thread::sleep(Duration::from_millis(80));
        assert!(stop.is_stopped());
        tx.send(TimerMessage::Quit).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn exits_when_sender_dropped() {
        let (tx, handle) = spawn_timer();
        drop(tx);
        handle.join().unwrap();
    }
}
