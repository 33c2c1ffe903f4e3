use log::debug;

use crate::{
    error::SolverError,
    face::Face,
    moves::{sequence_permutation, Axis, Move, Turn},
    pattern_database::PatternDatabase,
    solution::format_moves,
};

const X: Move = Move::Rotation(Axis::X, Turn::Clockwise);
const XI: Move = Move::Rotation(Axis::X, Turn::CounterClockwise);
const Y: Move = Move::Rotation(Axis::Y, Turn::Clockwise);
const YI: Move = Move::Rotation(Axis::Y, Turn::CounterClockwise);
const Z: Move = Move::Rotation(Axis::Z, Turn::Clockwise);
const ZI: Move = Move::Rotation(Axis::Z, Turn::CounterClockwise);

/// One rotation sequence for each of the 24 orientations, tried in order.
pub const CANDIDATES: [&[Move]; 24] = [
    &[],
    &[Y],
    &[Y, Y],
    &[YI],
    &[X],
    &[X, Y],
    &[X, Y, Y],
    &[X, YI],
    &[X, X],
    &[X, X, Y],
    &[Z, Z],
    &[X, X, YI],
    &[XI],
    &[XI, Y],
    &[XI, Y, Y],
    &[XI, YI],
    &[Z],
    &[Z, Y],
    &[Z, Y, Y],
    &[Z, YI],
    &[ZI],
    &[ZI, Y],
    &[ZI, Y, Y],
    &[ZI, YI],
];

/// The reorientation picked for a solve and the masks it leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orientation {
    pub prefix: Vec<Move>,
    pub target_mask: u32,
    pub opposite_mask: u32,
    pub heuristic: u8,
}

pub struct OrientationSelector<'a> {
    pdb: &'a PatternDatabase,
    target: Face,
}

impl<'a> OrientationSelector<'a> {
    pub fn new(pdb: &'a PatternDatabase, target: Face) -> Self {
        Self { pdb, target }
    }

    fn evaluate(
        &self,
        prefix: &[Move],
        target_mask: u32,
        opposite_mask: u32,
    ) -> Result<Orientation, SolverError> {
        let perm = sequence_permutation(prefix);
        let target_mask = perm.apply_mask(target_mask);
        let opposite_mask = perm.apply_mask(opposite_mask);
        let heuristic = self
            .pdb
            .distance(target_mask, self.target)?
            .max(self.pdb.distance(opposite_mask, self.target.opposite())?);
        Ok(Orientation {
            prefix: prefix.to_vec(),
            target_mask,
            opposite_mask,
            heuristic,
        })
    }

    /// Picks the prefix with the lowest heuristic, preferring fewer rotations
    /// and then earlier candidates. Candidates using a banned token are
    /// skipped; the empty prefix is always available.
    pub fn select(
        &self,
        target_mask: u32,
        opposite_mask: u32,
        banned_prefixes: &[String],
    ) -> Result<Orientation, SolverError> {
        let is_banned = |prefix: &[Move]| prefix.iter().any(|mv| mv.is_banned(banned_prefixes));

        let mut best = self.evaluate(CANDIDATES[0], target_mask, opposite_mask)?;
        for &prefix in &CANDIDATES[1..] {
            if is_banned(prefix) {
                continue;
            }
            let candidate = self.evaluate(prefix, target_mask, opposite_mask)?;
            let key = (candidate.heuristic, candidate.prefix.len());
            if key < (best.heuristic, best.prefix.len()) {
                best = candidate;
            }
        }

        debug!(
            "Orientation prefix [{}] with heuristic {}",
            format_moves(&best.prefix),
            best.heuristic
        );
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Permutation;
    use std::collections::HashSet;

    #[test]
    fn candidates_cover_every_orientation() {
        let orientations: HashSet<Permutation> = CANDIDATES
            .iter()
            .map(|prefix| sequence_permutation(prefix))
            .collect();
        assert_eq!(orientations.len(), 24);
        assert!(CANDIDATES.iter().all(|prefix| prefix.len() <= 3));
        for prefix in CANDIDATES {
            assert!(prefix.iter().all(|mv| mv.is_rotation()));
        }
    }

    #[test]
    fn solved_state_keeps_empty_prefix() {
        let selector = OrientationSelector::new(PatternDatabase::get(), Face::F);
        let orientation = selector
            .select(Face::F.mask(), Face::B.mask(), &[])
            .unwrap();
        assert!(orientation.prefix.is_empty());
        assert_eq!(orientation.heuristic, 0);
    }

    #[test]
    fn rotated_state_is_rotated_back() {
        let selector = OrientationSelector::new(PatternDatabase::get(), Face::U);
        let x = X.permutation();
        let orientation = selector
            .select(
                x.apply_mask(Face::U.mask()),
                x.apply_mask(Face::D.mask()),
                &[],
            )
            .unwrap();
        assert_eq!(orientation.prefix, vec![XI]);
        assert_eq!(orientation.heuristic, 0);
        assert_eq!(orientation.target_mask, Face::U.mask());
        assert_eq!(orientation.opposite_mask, Face::D.mask());
    }

    #[test]
    fn banned_rotation_is_skipped() {
        let selector = OrientationSelector::new(PatternDatabase::get(), Face::U);
        let x = X.permutation();
        let orientation = selector
            .select(
                x.apply_mask(Face::U.mask()),
                x.apply_mask(Face::D.mask()),
                &["x".to_owned()],
            )
            .unwrap();
        assert!(orientation.prefix.iter().all(|mv| mv.axis() != Axis::X));
        // only x' can undo the x rotation
        assert!(orientation.heuristic > 0);
    }

    #[test]
    fn banned_inverse_rotation_is_skipped() {
        let selector = OrientationSelector::new(PatternDatabase::get(), Face::U);
        let x = X.permutation();
        let orientation = selector
            .select(
                x.apply_mask(Face::U.mask()),
                x.apply_mask(Face::D.mask()),
                &["x'".to_owned()],
            )
            .unwrap();
        // x would show up as x' once the solution is inverted
        assert!(orientation.prefix.iter().all(|mv| mv.axis() != Axis::X));
        assert!(orientation.heuristic > 0);
    }
}
