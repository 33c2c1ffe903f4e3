//! Optimal solver for two opposite center colour groups of a 4x4x4.
//!
//! A pattern database gives each colour group's exact distance to its face,
//! which IDA* combines into an admissible heuristic while searching over the
//! 36 layer moves.

pub mod config;
pub mod error;
pub mod face;
pub mod moves;
pub mod orientation;
pub mod pattern_database;
pub mod puzzle;
pub mod search;
pub mod solution;
pub mod solver;

pub use config::SolverConfig;
pub use error::{InputError, ParseMoveError, ParseStateError, SolverError};
pub use face::Face;
pub use moves::{parse_moves, Move};
pub use puzzle::{Color, PuzzleState};
pub use solver::{SolveRequest, SolveResult, SolveStatus, Solver};
