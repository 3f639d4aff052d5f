//! Thread coordinator: runs search sessions concurrently with a hard-deadline
//! timer and a progress reporter.
//!
//! Three long-lived named threads are started once and driven by channel
//! messages. Only one session runs at a time. Results leave the coordinator
//! as `SearchEvent`s through the user's sink, and the final result is also
//! handed back to whoever stops or waits on the session.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{debug, error, info};

use super::error::EngineError;
use super::time::TimeLimits;
use crate::board::search::smp::SEARCH_STACK_SIZE;
use crate::board::search::{smp_search, IterationInfo, SearchResult, SharedSearch};
use crate::board::{Move, Position};
use crate::sync::Signal;
use crate::timer::{run_timer, TimerMessage};

/// Interval between progress reports while a search runs
pub const REPORT_INTERVAL: Duration = Duration::from_millis(2000);

/// Periodic search statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub hashfull: u32,
}

/// Everything the coordinator reports about a running search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    Progress(Progress),
    /// A completed iterative-deepening depth
    Iteration(IterationInfo),
    /// Final answer of a session, sent exactly once
    BestMove {
        best: Option<Move>,
        ponder: Option<Move>,
    },
}

/// Receiver of search events; called from the coordinator's threads.
pub type EventSink = Arc<dyn Fn(SearchEvent) + Send + Sync>;

/// How a session's clock behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionPlan {
    /// Soft and hard limits, `None` without a clock
    pub limits: Option<TimeLimits>,
    /// Think on the opponent's time until `ponder_hit`
    pub ponder: bool,
    /// Withhold the best move until stopped
    pub infinite: bool,
}

/// One search session as handed to the search thread.
pub struct SearchJob {
    position: Position,
    shared: Arc<SharedSearch>,
    threads: usize,
    /// Best move may be reported once fired
    release: Signal,
    hold: bool,
    done: Sender<Option<SearchResult>>,
}

pub enum SearchMessage {
    Start(Box<SearchJob>),
    Quit,
}

pub enum ReporterMessage {
    Active(Arc<SharedSearch>),
    Idle,
    Quit,
}

/// Coordinator-side view of the running session.
struct ActiveSession {
    shared: Arc<SharedSearch>,
    plan: SessionPlan,
    pondering: bool,
    release: Signal,
    done: Receiver<Option<SearchResult>>,
}

pub struct Coordinator {
    search_tx: Sender<SearchMessage>,
    timer_tx: Sender<TimerMessage>,
    reporter_tx: Sender<ReporterMessage>,
    handles: Vec<JoinHandle<()>>,
    active: Option<ActiveSession>,
    /// Outcome of a session that finished before anyone collected it
    finished: Option<Option<SearchResult>>,
}

impl Coordinator {
    /// Start the search, timer and reporter threads.
    pub fn new(sink: EventSink) -> Result<Self, EngineError> {
        let (search_tx, search_rx) = unbounded();
        let (timer_tx, timer_rx) = unbounded();
        let (reporter_tx, reporter_rx) = unbounded();

        let mut handles = Vec::with_capacity(3);

        let search_sink = Arc::clone(&sink);
        let search_timer = timer_tx.clone();
        let search_reporter = reporter_tx.clone();
        handles.push(
            thread::Builder::new()
                .name("search".to_string())
                .stack_size(SEARCH_STACK_SIZE)
                .spawn(move || {
                    search_loop(&search_rx, &search_sink, &search_timer, &search_reporter);
                })
                .map_err(EngineError::ThreadSpawn)?,
        );
        handles.push(
            thread::Builder::new()
                .name("timer".to_string())
                .spawn(move || run_timer(&timer_rx))
                .map_err(EngineError::ThreadSpawn)?,
        );
        handles.push(
            thread::Builder::new()
                .name("reporter".to_string())
                .spawn(move || reporter_loop(&reporter_rx, &sink))
                .map_err(EngineError::ThreadSpawn)?,
        );

        info!("engine threads started");
        Ok(Coordinator {
            search_tx,
            timer_tx,
            reporter_tx,
            handles,
            active: None,
            finished: None,
        })
    }

    /// Whether a session is still running. A finished session's result is
    /// kept for the next `wait` or `stop`.
    pub fn is_searching(&mut self) -> bool {
        let outcome = match &self.active {
            None => return false,
            Some(active) => match active.done.try_recv() {
                Err(TryRecvError::Empty) => return true,
                Ok(result) => result,
                Err(TryRecvError::Disconnected) => None,
            },
        };
        self.active = None;
        self.finished = Some(outcome);
        false
    }

    /// Start a session searching `position`.
    ///
    /// # Errors
    /// `SearchInProgress` while another session runs, `CoordinatorGone` if
    /// the search thread has exited.
    pub fn start(
        &mut self,
        position: Position,
        shared: Arc<SharedSearch>,
        threads: usize,
        plan: SessionPlan,
    ) -> Result<(), EngineError> {
        if self.is_searching() {
            return Err(EngineError::SearchInProgress);
        }

        let clock = &shared.limits().clock;
        let start = clock.start();
        if let Some(limits) = plan.limits {
            let soft = start + limits.soft();
            let hard = start + limits.hard();
            if plan.ponder {
                clock.set_deadlines(None, None);
            } else {
                clock.set_deadlines(Some(soft), Some(hard));
            }
            self.send_timer(TimerMessage::Arm {
                deadline: hard,
                stop: shared.limits().stop.clone(),
            });
            if plan.ponder {
                self.send_timer(TimerMessage::Suspend);
            }
        }

        self.finished = None;
        let release = Signal::new();
        let (done_tx, done_rx) = bounded(1);
        let job = SearchJob {
            position,
            shared: Arc::clone(&shared),
            threads,
            release: release.clone(),
            hold: plan.infinite || plan.ponder,
            done: done_tx,
        };
        self.search_tx
            .send(SearchMessage::Start(Box::new(job)))
            .map_err(|_| EngineError::CoordinatorGone)?;

        debug!(
            "session started: threads {threads} ponder {} infinite {} limits {:?}",
            plan.ponder, plan.infinite, plan.limits
        );
        self.active = Some(ActiveSession {
            shared,
            plan,
            pondering: plan.ponder,
            release,
            done: done_rx,
        });
        Ok(())
    }

    /// Stop the running session and return its last completed result.
    pub fn stop(&mut self) -> Option<SearchResult> {
        if let Some(active) = &self.active {
            active.shared.limits().stop.stop();
            active.release.fire();
        }
        self.wait()
    }

    /// Block until the running session has reported its best move.
    ///
    /// A pondering or infinite session only finishes after `stop` or
    /// `ponder_hit`.
    pub fn wait(&mut self) -> Option<SearchResult> {
        match self.active.take() {
            Some(active) => active.done.recv().ok().flatten(),
            None => self.finished.take().flatten(),
        }
    }

    /// The opponent played the expected move: pondering becomes a normal
    /// timed search measured from the original start.
    pub fn ponder_hit(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if !active.pondering {
            return;
        }
        active.pondering = false;
        active.release.fire();

        let Some(limits) = active.plan.limits else {
            return;
        };
        let clock = &active.shared.limits().clock;
        let start = clock.start();
        let hard = start + limits.hard();
        clock.set_deadlines(Some(start + limits.soft()), Some(hard));
        if Instant::now() >= hard {
            debug!("ponder hit after the hard limit, stopping");
            active.shared.limits().stop.stop();
        } else {
            self.send_timer(TimerMessage::PonderHit);
        }
    }

    fn send_timer(&self, msg: TimerMessage) {
        if self.timer_tx.send(msg).is_err() {
            error!("timer thread is gone");
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
        let _ = self.search_tx.send(SearchMessage::Quit);
        let _ = self.timer_tx.send(TimerMessage::Quit);
        let _ = self.reporter_tx.send(ReporterMessage::Quit);
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        info!("engine threads stopped");
    }
}

fn search_loop(
    rx: &Receiver<SearchMessage>,
    sink: &EventSink,
    timer_tx: &Sender<TimerMessage>,
    reporter_tx: &Sender<ReporterMessage>,
) {
    while let Ok(msg) = rx.recv() {
        match msg {
            SearchMessage::Start(job) => run_session(&job, sink, timer_tx, reporter_tx),
            SearchMessage::Quit => break,
        }
    }
}

fn run_session(
    job: &SearchJob,
    sink: &EventSink,
    timer_tx: &Sender<TimerMessage>,
    reporter_tx: &Sender<ReporterMessage>,
) {
    let _ = reporter_tx.send(ReporterMessage::Active(Arc::clone(&job.shared)));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        smp_search(&job.position, &job.shared, job.threads)
    }));

    let _ = reporter_tx.send(ReporterMessage::Idle);

    match outcome {
        Ok(result) => {
            if job.hold {
                job.release.wait();
            }
            let _ = timer_tx.send(TimerMessage::Disarm);
            debug!("session finished: {result}");
            let (best, ponder) = (result.best_move, result.ponder_move);
            let _ = job.done.send(Some(result));
            sink(SearchEvent::BestMove { best, ponder });
        }
        Err(payload) => {
            let _ = timer_tx.send(TimerMessage::Disarm);
            error!("search panicked: {}", panic_message(payload.as_ref()));
            let _ = job.done.send(None);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

fn reporter_loop(rx: &Receiver<ReporterMessage>, sink: &EventSink) {
    let mut current: Option<Arc<SharedSearch>> = None;

    loop {
        let msg = match &current {
            Some(shared) => match rx.recv_timeout(REPORT_INTERVAL) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => {
                    sink(SearchEvent::Progress(progress(shared)));
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => return,
            },
            None => match rx.recv() {
                Ok(msg) => msg,
                Err(_) => return,
            },
        };

        match msg {
            ReporterMessage::Active(shared) => current = Some(shared),
            ReporterMessage::Idle => current = None,
            ReporterMessage::Quit => return,
        }
    }
}

fn progress(shared: &SharedSearch) -> Progress {
    let time_ms = shared.limits().clock.elapsed().as_millis() as u64;
    let nodes = shared.nodes();
    Progress {
        nodes,
        nps: if time_ms > 0 { nodes * 1000 / time_ms } else { nodes },
        time_ms,
        hashfull: shared.hashfull(),
    }
}
