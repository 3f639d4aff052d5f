//! Parsing of UCI input lines into typed commands.

use crate::board::Color;
use crate::engine::{SearchRequest, TimeControl};

/// Arguments of a `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: u64,
    pub binc: u64,
    pub movestogo: Option<u64>,
    pub movetime: Option<u64>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub infinite: bool,
    pub ponder: bool,
}

impl GoParams {
    fn parse(parts: &[&str]) -> Self {
        let mut params = GoParams::default();
        let value = |i: usize| parts.get(i + 1).and_then(|v| v.parse::<u64>().ok());

        let mut i = 1;
        while i < parts.len() {
            match parts[i] {
                "wtime" => params.wtime = value(i),
                "btime" => params.btime = value(i),
                "winc" => params.winc = value(i).unwrap_or(0),
                "binc" => params.binc = value(i).unwrap_or(0),
                "movestogo" => params.movestogo = value(i).filter(|&m| m > 0),
                "movetime" => params.movetime = value(i),
                "depth" => params.depth = value(i).map(|d| d.min(u64::from(u32::MAX)) as u32),
                "nodes" => params.nodes = value(i),
                "infinite" => {
                    params.infinite = true;
                    i += 1;
                    continue;
                }
                "ponder" => {
                    params.ponder = true;
                    i += 1;
                    continue;
                }
                _ => {
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }
        params
    }

    /// Search request for `side` to move.
    ///
    /// Precedence: `infinite`, `movetime`, the side's clock, `depth`; with
    /// none of them the search is infinite.
    #[must_use]
    pub fn to_request(&self, side: Color) -> SearchRequest {
        let (time_left, inc) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };

        let time_control = if self.infinite {
            TimeControl::Infinite
        } else if let Some(ms) = self.movetime {
            TimeControl::MoveTime(ms)
        } else if let Some(time_left_ms) = time_left {
            TimeControl::Incremental {
                time_left_ms,
                inc_ms: inc,
                movestogo: self.movestogo,
            }
        } else if let Some(depth) = self.depth {
            TimeControl::Depth(depth)
        } else {
            TimeControl::Infinite
        };

        SearchRequest {
            time_control,
            depth: self.depth,
            nodes: self.nodes,
            ponder: self.ponder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    /// `startpos` or a FEN, then moves in coordinate notation
    Position { desc: String, moves: Vec<String> },
    Go(GoParams),
    Perft(usize),
    SetOption { name: String, value: Option<String> },
    Debug(bool),
    Eval,
    Stop,
    PonderHit,
    Quit,
    Unknown(String),
}

pub fn parse_uci_command(line: &str) -> Option<UciCommand> {
    let trimmed = line.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *parts.first()?;

    let cmd = match first {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => parse_position(&parts).unwrap_or_else(|| UciCommand::Unknown(trimmed.to_string())),
        "go" => UciCommand::Go(GoParams::parse(&parts)),
        "perft" => {
            let depth = parts.get(1).and_then(|v| v.parse::<usize>().ok()).unwrap_or(1);
            UciCommand::Perft(depth)
        }
        "setoption" => parse_setoption(&parts).unwrap_or_else(|| UciCommand::Unknown(trimmed.to_string())),
        "debug" => UciCommand::Debug(parts.get(1) != Some(&"off")),
        "eval" => UciCommand::Eval,
        "stop" => UciCommand::Stop,
        "ponderhit" => UciCommand::PonderHit,
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(trimmed.to_string()),
    };

    Some(cmd)
}

fn parse_position(parts: &[&str]) -> Option<UciCommand> {
    let moves_idx = parts.iter().position(|&p| p == "moves").unwrap_or(parts.len());
    let desc = match *parts.get(1)? {
        "startpos" => "startpos".to_string(),
        "fen" if moves_idx > 2 => parts[2..moves_idx].join(" "),
        _ => return None,
    };
    let moves = parts
        .iter()
        .skip(moves_idx + 1)
        .map(|m| (*m).to_string())
        .collect();
    Some(UciCommand::Position { desc, moves })
}

fn parse_setoption(parts: &[&str]) -> Option<UciCommand> {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut in_value = false;

    for part in parts.iter().skip(1) {
        match *part {
            "name" if !in_value => {}
            "value" => in_value = true,
            _ if in_value => value_parts.push(part),
            _ => name_parts.push(part),
        }
    }

    if name_parts.is_empty() {
        return None;
    }
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };
    Some(UciCommand::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_position_with_moves() {
        let cmd = parse_uci_command("position startpos moves e2e4 e7e5").unwrap();
        assert_eq!(
            cmd,
            UciCommand::Position {
                desc: "startpos".into(),
                moves: vec!["e2e4".into(), "e7e5".into()],
            }
        );
    }

    #[test]
    fn parses_fen_position() {
        let cmd = parse_uci_command("position fen 4k3/8/8/8/8/8/8/4K3 w - - 0 1 moves e1e2").unwrap();
        assert_eq!(
            cmd,
            UciCommand::Position {
                desc: "4k3/8/8/8/8/8/8/4K3 w - - 0 1".into(),
                moves: vec!["e1e2".into()],
            }
        );
        assert!(matches!(
            parse_uci_command("position fen"),
            Some(UciCommand::Unknown(_))
        ));
    }

    #[test]
    fn parses_go_clock() {
        let Some(UciCommand::Go(go)) =
            parse_uci_command("go wtime 60000 btime 50000 winc 1000 binc 500 movestogo 20")
        else {
            panic!("expected go");
        };
        assert_eq!(
            go.to_request(Color::Black).time_control,
            TimeControl::Incremental {
                time_left_ms: 50000,
                inc_ms: 500,
                movestogo: Some(20),
            }
        );
    }

    #[test]
    fn go_precedence() {
        let go = |line| match parse_uci_command(line) {
            Some(UciCommand::Go(go)) => go.to_request(Color::White),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(go("go depth 6").time_control, TimeControl::Depth(6));
        assert_eq!(go("go movetime 500 depth 3").time_control, TimeControl::MoveTime(500));
        assert_eq!(go("go movetime 500 depth 3").depth, Some(3));
        assert_eq!(go("go infinite").time_control, TimeControl::Infinite);
        assert_eq!(go("go").time_control, TimeControl::Infinite);
        assert!(go("go ponder wtime 1000 btime 1000").ponder);
    }

    #[test]
    fn parses_setoption_with_spaces() {
        let cmd = parse_uci_command("setoption name Move Overhead value 100").unwrap();
        assert_eq!(
            cmd,
            UciCommand::SetOption {
                name: "Move Overhead".into(),
                value: Some("100".into()),
            }
        );
    }

    #[test]
    fn debug_and_blank_lines() {
        assert_eq!(parse_uci_command("debug on"), Some(UciCommand::Debug(true)));
        assert_eq!(parse_uci_command("debug off"), Some(UciCommand::Debug(false)));
        assert_eq!(parse_uci_command("   "), None);
    }
}
