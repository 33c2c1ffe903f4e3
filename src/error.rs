use thiserror::Error;

use crate::{face::Face, moves::Move, puzzle::Color};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("Empty move token")]
    Empty,
    #[error("Unknown move: {0:?}")]
    UnknownMove(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseStateError {
    #[error("Expected 24 facelets but got {0}")]
    WrongLength(usize),
    #[error("Unknown color letter {0:?}")]
    UnknownColor(char),
    #[error("Unknown face {0:?}, expected one of U D F B R L")]
    UnknownFace(String),
}

/// Why a colour assignment cannot be searched. The caller has to resupply
/// input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error(
        "Both tracked colors need exactly 4 facelets, but {target} has {target_count} and {opposite} has {opposite_count}"
    )]
    CountMismatch {
        target: Color,
        target_count: usize,
        opposite: Color,
        opposite_count: usize,
    },
    #[error("Could not find two colors with exactly 4 facelets each, current counts: {0:?}")]
    NoColorPair(Vec<usize>),
    #[error("The two tracked colors must differ, got {0} twice")]
    SameColor(Color),
    #[error("Rotation {0} cannot be played back: it and its wide moves are all banned")]
    BannedRotation(Move),
}

/// Internal defects. These never describe bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Pattern database has no distance for mask {mask:#08x} as seen from face {face}")]
    UnknownDistance { mask: u32, face: Face },
}
