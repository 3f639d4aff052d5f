//! Time management: turn a clock situation into soft and hard search limits.
//!
//! The soft limit is checked by iterative deepening between completed depths;
//! the hard limit is enforced by the timer thread and as a backstop inside
//! the search.

use std::time::Duration;

/// Configuration for time management calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConfig {
    /// Time to reserve for move overhead (communication latency, etc.)
    pub move_overhead_ms: u64,
    /// Percentage of remaining time the soft limit may never exceed
    pub soft_time_percent: u64,
    /// Percentage of remaining time the hard limit may never exceed
    pub hard_time_percent: u64,
    /// Moves-to-go estimate when the clock does not give one
    pub default_moves_to_go: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            move_overhead_ms: 50,
            soft_time_percent: 70,
            hard_time_percent: 90,
            default_moves_to_go: 30,
        }
    }
}

/// Time control settings for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// No time limit; runs until stopped
    #[default]
    Infinite,
    /// Fixed depth, no time limit
    Depth(u32),
    /// Fixed time per move in milliseconds
    MoveTime(u64),
    /// Remaining clock time with optional increment and moves to go
    Incremental {
        time_left_ms: u64,
        inc_ms: u64,
        movestogo: Option<u64>,
    },
}

/// Soft and hard limits in milliseconds from the search start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimits {
    pub soft_ms: u64,
    pub hard_ms: u64,
}

impl TimeLimits {
    #[must_use]
    pub fn soft(&self) -> Duration {
        Duration::from_millis(self.soft_ms)
    }

    #[must_use]
    pub fn hard(&self) -> Duration {
        Duration::from_millis(self.hard_ms)
    }
}

impl TimeControl {
    /// Create an incremental time control from Duration values.
    #[must_use]
    pub fn incremental(time_left: Duration, inc: Duration, movestogo: Option<u64>) -> Self {
        TimeControl::Incremental {
            time_left_ms: time_left.as_millis() as u64,
            inc_ms: inc.as_millis() as u64,
            movestogo,
        }
    }

    /// Check if this control has no clock (infinite or depth-based).
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite | TimeControl::Depth(_))
    }

    /// Depth cap carried by the control, if any.
    #[must_use]
    pub fn depth(&self) -> Option<u32> {
        match self {
            TimeControl::Depth(d) => Some(*d),
            _ => None,
        }
    }

    /// Compute the limits for this control, `None` when it has no clock.
    #[must_use]
    pub fn compute_limits(&self, config: &TimeConfig) -> Option<TimeLimits> {
        match *self {
            TimeControl::Infinite | TimeControl::Depth(_) => None,
            TimeControl::MoveTime(time_ms) => {
                let ms = time_ms.saturating_sub(config.move_overhead_ms).max(1);
                Some(TimeLimits {
                    soft_ms: ms,
                    hard_ms: ms,
                })
            }
            TimeControl::Incremental {
                time_left_ms,
                inc_ms,
                movestogo,
            } => Some(compute_incremental_limits(
                time_left_ms,
                inc_ms,
                movestogo,
                config,
            )),
        }
    }
}

fn compute_incremental_limits(
    time_left_ms: u64,
    inc_ms: u64,
    movestogo: Option<u64>,
    config: &TimeConfig,
) -> TimeLimits {
    let safe_ms = time_left_ms.saturating_sub(config.move_overhead_ms);
    let moves_to_go = movestogo.unwrap_or(config.default_moves_to_go).max(1);

    let base = safe_ms / moves_to_go + inc_ms * 3 / 4;
    let soft_cap = safe_ms * config.soft_time_percent / 100;
    let soft_ms = base.min(soft_cap).max(1);

    let hard_cap = safe_ms * config.hard_time_percent / 100;
    let hard_ms = soft_ms.saturating_mul(3).min(hard_cap).max(soft_ms);

    TimeLimits { soft_ms, hard_ms }
}
