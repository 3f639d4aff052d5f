//! Engine facade: game state, options and asynchronous search sessions.
//!
//! The protocol front-end only parses text and calls into `Engine`; all
//! search output comes back through the `EventSink` given at construction.

mod controller;
mod error;
pub mod time;

use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};

use crate::board::eval::{DefaultEvaluator, EvalBreakdown, Evaluator};
use crate::board::search::{SearchClock, SearchLimits, SearchResult, SharedSearch, MAX_DEPTH};
use crate::board::{Position, START_FEN};
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;

pub use controller::{
    Coordinator, EventSink, Progress, SearchEvent, SessionPlan, REPORT_INTERVAL,
};
pub use error::EngineError;
pub use time::{TimeConfig, TimeControl, TimeLimits};

pub use crate::tt::{DEFAULT_HASH_MB, MAX_HASH_MB};

pub const MAX_THREADS: usize = 64;

/// User-adjustable engine options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub hash_mb: usize,
    pub threads: usize,
    /// Report a ponder move with the best move
    pub ponder: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            hash_mb: DEFAULT_HASH_MB,
            threads: 1,
            ponder: false,
        }
    }
}

/// What to search and for how long.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub time_control: TimeControl,
    /// Depth cap on top of the time control
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    /// Start as a ponder search; the clock starts on `ponder_hit`
    pub ponder: bool,
}

impl SearchRequest {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchRequest {
            time_control: TimeControl::Depth(depth),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn movetime(ms: u64) -> Self {
        SearchRequest {
            time_control: TimeControl::MoveTime(ms),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn infinite() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn clock(time_left_ms: u64, inc_ms: u64, movestogo: Option<u64>) -> Self {
        SearchRequest {
            time_control: TimeControl::Incremental {
                time_left_ms,
                inc_ms,
                movestogo,
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn pondering(mut self) -> Self {
        self.ponder = true;
        self
    }

    fn max_depth(&self) -> u32 {
        self.depth
            .or(self.time_control.depth())
            .unwrap_or(MAX_DEPTH)
            .clamp(1, MAX_DEPTH)
    }
}

/// Clamp a hash size to a valid table size, warning on fallback.
fn valid_hash_mb(mb: usize) -> usize {
    if (1..=MAX_HASH_MB).contains(&mb) && mb.is_power_of_two() {
        mb
    } else {
        warn!("invalid hash size {mb} MB, using {DEFAULT_HASH_MB} MB");
        DEFAULT_HASH_MB
    }
}

pub struct Engine {
    position: Position,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator>,
    options: EngineOptions,
    time_config: TimeConfig,
    sink: EventSink,
    coordinator: Coordinator,
}

impl Engine {
    /// Engine with the default evaluator.
    ///
    /// # Errors
    /// Fails when the coordinator threads cannot be started.
    pub fn new(sink: EventSink) -> Result<Self, EngineError> {
        Self::with_evaluator(Arc::new(DefaultEvaluator::new()), sink)
    }

    /// Engine with a caller-supplied evaluator.
    ///
    /// # Errors
    /// Fails when the coordinator threads cannot be started.
    pub fn with_evaluator(
        evaluator: Arc<dyn Evaluator>,
        sink: EventSink,
    ) -> Result<Self, EngineError> {
        Self::with_options(evaluator, EngineOptions::default(), sink)
    }

    /// Engine with initial options, validated like their setters.
    ///
    /// # Errors
    /// Fails when the coordinator threads cannot be started.
    pub fn with_options(
        evaluator: Arc<dyn Evaluator>,
        options: EngineOptions,
        sink: EventSink,
    ) -> Result<Self, EngineError> {
        let options = EngineOptions {
            hash_mb: valid_hash_mb(options.hash_mb),
            threads: options.threads.clamp(1, MAX_THREADS),
            ponder: options.ponder,
        };
        Ok(Engine {
            position: Position::new(),
            tt: Arc::new(TranspositionTable::new(options.hash_mb)),
            evaluator,
            options,
            time_config: TimeConfig::default(),
            coordinator: Coordinator::new(Arc::clone(&sink))?,
            sink,
        })
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[must_use]
    pub fn time_config(&self) -> &TimeConfig {
        &self.time_config
    }

    pub fn set_move_overhead_ms(&mut self, ms: u64) {
        self.time_config.move_overhead_ms = ms;
    }

    pub fn set_ponder(&mut self, ponder: bool) {
        self.options.ponder = ponder;
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.stop_search();
        self.tt.clear();
        self.evaluator.clear();
        self.position = Position::new();
        info!("new game");
    }

    /// Set the position from `"startpos"` or a FEN, then play `moves` in
    /// coordinate notation. The current position is kept on error.
    ///
    /// # Errors
    /// `InvalidFen` or `InvalidMove` naming the first bad move.
    pub fn set_position<I, S>(&mut self, desc: &str, moves: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let desc = desc.trim();
        let fen = if desc == "startpos" { START_FEN } else { desc };
        let mut position = Position::try_from_fen(fen)?;
        for (index, mv) in moves.into_iter().enumerate() {
            position
                .make_move_uci(mv.as_ref())
                .map_err(|source| EngineError::InvalidMove { index, source })?;
        }
        self.stop_search();
        self.position = position;
        Ok(())
    }

    /// Start an asynchronous search of the current position.
    ///
    /// # Errors
    /// `SearchInProgress` while a session is running.
    pub fn start_search(&mut self, request: SearchRequest) -> Result<(), EngineError> {
        if self.coordinator.is_searching() {
            return Err(EngineError::SearchInProgress);
        }

        let limits = SearchLimits {
            max_depth: request.max_depth(),
            node_limit: request.nodes.unwrap_or(0),
            clock: Arc::new(SearchClock::new(Instant::now(), None, None)),
            stop: StopFlag::new(),
        };
        let sink = Arc::clone(&self.sink);
        let shared = SharedSearch::new(
            Arc::clone(&self.tt),
            Arc::clone(&self.evaluator),
            limits,
            self.position.move_counter(),
        )
        .with_callback(Arc::new(move |info| sink(SearchEvent::Iteration(info.clone()))));

        let plan = SessionPlan {
            limits: request.time_control.compute_limits(&self.time_config),
            ponder: request.ponder,
            infinite: request.time_control == TimeControl::Infinite,
        };
        self.coordinator.start(
            self.position.clone(),
            Arc::new(shared),
            self.options.threads,
            plan,
        )
    }

    /// Stop the running search and return its last completed result.
    pub fn stop_search(&mut self) -> Option<SearchResult> {
        self.coordinator.stop()
    }

    /// Block until the running search reports its best move.
    pub fn wait(&mut self) -> Option<SearchResult> {
        self.coordinator.wait()
    }

    pub fn ponder_hit(&mut self) {
        self.coordinator.ponder_hit();
    }

    pub fn is_searching(&mut self) -> bool {
        self.coordinator.is_searching()
    }

    /// Resize the transposition table. Sizes that are not a power of two in
    /// `1..=16384` fall back to 128 MB with a warning.
    pub fn set_hash_size_mb(&mut self, mb: usize) {
        let mb = valid_hash_mb(mb);
        self.stop_search();
        self.options.hash_mb = mb;
        match Arc::get_mut(&mut self.tt) {
            Some(tt) => tt.resize(mb),
            None => self.tt = Arc::new(TranspositionTable::new(mb)),
        }
        info!("hash set to {mb} MB");
    }

    /// Number of Lazy SMP workers, clamped to `1..=64`.
    pub fn set_thread_count(&mut self, threads: usize) {
        self.options.threads = threads.clamp(1, MAX_THREADS);
    }

    #[must_use]
    pub fn evaluate_current_position(&self) -> EvalBreakdown {
        self.evaluator.breakdown(&self.position)
    }
}
