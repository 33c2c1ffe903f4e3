use itertools::Itertools;

use crate::{
    error::InputError,
    face::Face,
    moves::{Move, Turn},
};

/// The inverse of a sequence: reversed, with every token inverted.
pub fn invert_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}

/// Puts `anchor` in front of `moves`, folding it into the first token when
/// both are rotations about the same axis.
pub fn prepend_anchor(anchor: Option<Move>, mut moves: Vec<Move>) -> Vec<Move> {
    let Some(anchor) = anchor else {
        return moves;
    };
    match moves.first().copied() {
        Some(first) if first.is_rotation() && first.axis() == anchor.axis() => {
            let quarter_turns =
                i32::from(anchor.turn().quarter_turns()) + i32::from(first.turn().quarter_turns());
            match Turn::from_quarter_turns(quarter_turns) {
                Some(turn) => moves[0] = first.with_turn(turn),
                None => {
                    moves.remove(0);
                }
            }
        }
        _ => moves.insert(0, anchor),
    }
    moves
}

/// Replaces every banned rotation with the pair of wide moves it is made of.
///
/// # Errors
///
/// Fails when one of those wide moves is banned too.
pub fn spell_out_banned_rotations(
    moves: Vec<Move>,
    banned_prefixes: &[String],
) -> Result<Vec<Move>, InputError> {
    let mut spelled = Vec::with_capacity(moves.len());
    for mv in moves {
        match mv.wide_moves() {
            Some(wide) if mv.starts_with_any(banned_prefixes) => {
                if wide.iter().any(|w| w.starts_with_any(banned_prefixes)) {
                    return Err(InputError::BannedRotation(mv));
                }
                spelled.extend(wide);
            }
            _ => spelled.push(mv),
        }
    }
    Ok(spelled)
}

pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().join(" ")
}

/// A found solve: the reorientation prefix plus the searched layer moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub target: Face,
    pub prefix: Vec<Move>,
    pub path: Vec<Move>,
}

impl Solution {
    /// Prefix followed by path.
    pub fn forward(&self) -> Vec<Move> {
        self.prefix.iter().chain(&self.path).copied().collect()
    }

    /// Undoes `forward`: the inverted path followed by the inverted prefix.
    pub fn inverse(&self) -> Vec<Move> {
        invert_sequence(&self.forward())
    }

    /// `inverse` led by the target face's anchor rotation, for playback.
    pub fn setup(&self) -> Vec<Move> {
        prepend_anchor(self.target.anchor(), self.inverse())
    }

    /// `setup` with banned rotations written as wide moves.
    ///
    /// # Errors
    ///
    /// Fails when a rotation and its wide moves are all banned.
    pub fn setup_avoiding(&self, banned_prefixes: &[String]) -> Result<Vec<Move>, InputError> {
        spell_out_banned_rotations(self.setup(), banned_prefixes)
    }

    pub fn forward_string(&self) -> String {
        format_moves(&self.forward())
    }

    pub fn setup_string(&self) -> String {
        format_moves(&self.setup())
    }
}
