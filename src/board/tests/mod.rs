//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generator node counts, both generation modes
//! - `draw.rs` - Draw detection (50-move, repetition, insufficient material)
//! - `make_unmake.rs` - Make/unmake move correctness and key consistency
//! - `edge_cases.rs` - Special positions and edge cases
//! - `proptest.rs` - Property-based tests
//! - `search.rs` - Alpha-beta against minimax, tactical searches

mod draw;
mod edge_cases;
mod perft;
mod search;
