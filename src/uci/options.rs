//! UCI options: advertisement and `setoption` handling.

use log::warn;

use crate::engine::{Engine, DEFAULT_HASH_MB, MAX_HASH_MB, MAX_THREADS};

pub const ENGINE_NAME: &str = "chess_core";
pub const ENGINE_AUTHOR: &str = "chess_core developers";

/// Lines answering the `uci` command, ending with `uciok`.
#[must_use]
pub fn option_lines(engine: &Engine) -> Vec<String> {
    let options = engine.options();
    vec![
        format!("id name {ENGINE_NAME} {}", env!("CARGO_PKG_VERSION")),
        format!("id author {ENGINE_AUTHOR}"),
        format!("option name Hash type spin default {DEFAULT_HASH_MB} min 1 max {MAX_HASH_MB}"),
        format!("option name Threads type spin default 1 min 1 max {MAX_THREADS}"),
        format!(
            "option name Ponder type check default {}",
            if options.ponder { "true" } else { "false" }
        ),
        format!(
            "option name Move Overhead type spin default {} min 0 max 5000",
            engine.time_config().move_overhead_ms
        ),
        "uciok".to_string(),
    ]
}

/// Apply `setoption name <name> value <value>`. Unknown options and bad
/// values are logged and ignored.
pub fn apply_setoption(engine: &mut Engine, name: &str, value: Option<&str>) {
    let normalized = name.trim().to_ascii_lowercase();
    let number = value.and_then(|v| v.trim().parse::<u64>().ok());

    match (normalized.as_str(), number) {
        ("hash", Some(mb)) => engine.set_hash_size_mb(mb as usize),
        ("threads", Some(n)) => engine.set_thread_count(n as usize),
        ("move overhead", Some(ms)) => engine.set_move_overhead_ms(ms.min(5000)),
        ("ponder", _) => {
            let on = value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"));
            engine.set_ponder(on);
        }
        ("hash" | "threads" | "move overhead", None) => {
            warn!("option {name}: invalid value {value:?}");
        }
        _ => warn!("unknown option {name}"),
    }
}
