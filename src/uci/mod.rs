//! Universal Chess Interface (UCI) protocol front-end.
//!
//! Parses text commands and forwards them to `Engine`. Search output arrives
//! asynchronously through the engine's event sink and is printed from the
//! coordinator threads.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, LevelFilter};

use crate::board::eval::DefaultEvaluator;
use crate::engine::{Engine, EngineError, EngineOptions, EventSink, SearchEvent};

pub mod command;
pub mod options;
pub mod report;

use command::{parse_uci_command, UciCommand};
use report::{format_bestmove, format_iteration, format_progress};

/// Default log level when `debug` is off.
pub const QUIET_LEVEL: LevelFilter = LevelFilter::Info;

fn print_event(event: &SearchEvent, show_ponder: bool) {
    let line = match event {
        SearchEvent::Progress(progress) => format_progress(progress),
        SearchEvent::Iteration(info) => format_iteration(info),
        SearchEvent::BestMove { best, ponder } => format_bestmove(*best, *ponder, show_ponder),
    };
    println!("{line}");
}

pub struct UciFrontEnd {
    engine: Engine,
    show_ponder: Arc<AtomicBool>,
}

impl UciFrontEnd {
    /// Front-end printing search output to stdout.
    ///
    /// # Errors
    /// Fails when the engine threads cannot be started.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_options(EngineOptions::default())
    }

    /// # Errors
    /// Fails when the engine threads cannot be started.
    pub fn with_options(options: EngineOptions) -> Result<Self, EngineError> {
        let show_ponder = Arc::new(AtomicBool::new(options.ponder));
        let flag = Arc::clone(&show_ponder);
        let sink: EventSink =
            Arc::new(move |event| print_event(&event, flag.load(Ordering::Relaxed)));
        let engine = Engine::with_options(Arc::new(DefaultEvaluator::new()), options, sink)?;
        Ok(UciFrontEnd {
            engine,
            show_ponder,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Read commands from stdin until `quit` or end of input.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let Some(cmd) = parse_uci_command(&line) else {
                continue;
            };
            match self.execute(cmd) {
                Some(output) => {
                    for out in output {
                        println!("{out}");
                    }
                }
                None => break,
            }
        }
        self.engine.stop_search();
    }

    /// Execute one command, returning the lines to print, or `None` on quit.
    pub fn execute(&mut self, cmd: UciCommand) -> Option<Vec<String>> {
        let mut out = Vec::new();
        match cmd {
            UciCommand::Uci => out = options::option_lines(&self.engine),
            UciCommand::IsReady => out.push("readyok".to_string()),
            UciCommand::UciNewGame => self.engine.new_game(),
            UciCommand::Position { desc, moves } => {
                if let Err(err) = self.engine.set_position(&desc, &moves) {
                    out.push(format!("info string {err}"));
                }
            }
            UciCommand::Go(go) => {
                let request = go.to_request(self.engine.position().side_to_move());
                if let Err(err) = self.engine.start_search(request) {
                    out.push(format!("info string {err}"));
                }
            }
            UciCommand::Stop => {
                self.engine.stop_search();
            }
            UciCommand::PonderHit => self.engine.ponder_hit(),
            UciCommand::SetOption { name, value } => {
                options::apply_setoption(&mut self.engine, &name, value.as_deref());
                self.show_ponder
                    .store(self.engine.options().ponder, Ordering::Relaxed);
            }
            UciCommand::Debug(on) => {
                log::set_max_level(if on { LevelFilter::Debug } else { QUIET_LEVEL });
            }
            UciCommand::Eval => {
                let breakdown = self.engine.evaluate_current_position();
                out.extend(breakdown.to_string().lines().map(str::to_string));
            }
            UciCommand::Perft(depth) => out = self.perft(depth),
            UciCommand::Quit => {
                self.engine.stop_search();
                return None;
            }
            UciCommand::Unknown(line) => debug!("unknown command: {line}"),
        }
        Some(out)
    }

    fn perft(&mut self, depth: usize) -> Vec<String> {
        if self.engine.is_searching() {
            return vec!["info string search in progress".to_string()];
        }
        let mut pos = self.engine.position().clone();
        let start = Instant::now();
        let divide = pos.perft_divide(depth);
        let total: u64 = divide.iter().map(|(_, n)| n).sum();
        let elapsed = start.elapsed();

        let mut out: Vec<String> = divide.iter().map(|(mv, n)| format!("{mv}: {n}")).collect();
        out.push(String::new());
        out.push(format!("Nodes searched: {total}"));
        out.push(format!(
            "info string perft depth {depth} nodes {total} time_ms {}",
            elapsed.as_millis()
        ));
        out
    }
}
