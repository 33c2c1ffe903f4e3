//! Exact move-distance table for a single four-facelet colour group.
//!
//! Every 24-bit mask with four bits set is indexed directly, so the table
//! holds `2^24` entries. It is built once by breadth-first search from the
//! four U slots over all 42 generators, whole-puzzle rotations included, and
//! answers queries for any target face by first rotating the mask into the U
//! frame.

use std::{collections::VecDeque, sync::LazyLock, time::Instant};

use log::info;

use crate::{
    error::SolverError,
    face::Face,
    moves::{Move, Permutation, SLOTS},
};

/// Entries never reached by the breadth-first search.
const UNKNOWN: i8 = -1;

/// The search stops expanding masks at this distance.
pub const MAX_DISTANCE: i8 = 8;

pub struct PatternDatabase {
    table: Vec<i8>,
    transforms: [Permutation; 6],
}

static PATTERN_DATABASE: LazyLock<PatternDatabase> = LazyLock::new(PatternDatabase::build);

impl PatternDatabase {
    /// The shared table, built by the first caller.
    pub fn get() -> &'static PatternDatabase {
        &PATTERN_DATABASE
    }

    pub fn build() -> PatternDatabase {
        info!("Building center pattern database");
        let start = Instant::now();

        let generators: Vec<&Permutation> = Move::generators().map(Move::permutation).collect();
        let mut table = vec![UNKNOWN; 1 << SLOTS];
        table[Face::CANONICAL_MASK as usize] = 0;
        let mut queue = VecDeque::from([Face::CANONICAL_MASK]);
        let mut reached = 1_usize;
        let mut deepest = 0;

        while let Some(mask) = queue.pop_front() {
            let distance = table[mask as usize];
            if distance >= MAX_DISTANCE {
                continue;
            }
            for perm in &generators {
                let next = perm.apply_mask(mask);
                if table[next as usize] == UNKNOWN {
                    table[next as usize] = distance + 1;
                    deepest = deepest.max(distance + 1);
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }

        info!(
            "Pattern database built in {:.3}s: {} masks, deepest at {} moves",
            start.elapsed().as_secs_f64(),
            reached,
            deepest
        );
        PatternDatabase {
            table,
            transforms: Face::ALL.map(Face::transform),
        }
    }

    /// Distance of a mask already in the U frame, `None` if it was never
    /// reached.
    pub fn canonical_distance(&self, mask: u32) -> Option<u8> {
        match self.table.get(mask as usize) {
            Some(&distance) if distance != UNKNOWN => Some(distance as u8),
            _ => None,
        }
    }

    /// Minimum number of moves that bring the four facelets in `mask` onto
    /// `face`.
    ///
    /// # Errors
    ///
    /// Fails if the mask was never reached while building, which means the
    /// table itself is broken. The distance is never guessed.
    pub fn distance(&self, mask: u32, face: Face) -> Result<u8, SolverError> {
        let canonical = self.transforms[face.index()].apply_mask(mask);
        self.canonical_distance(canonical)
            .ok_or(SolverError::UnknownDistance { mask, face })
    }

    /// Number of masks with a known distance.
    pub fn known_entries(&self) -> usize {
        self.table.iter().filter(|&&d| d != UNKNOWN).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{Axis, Base, Turn};
    use std::collections::HashMap;

    fn four_bit_masks() -> impl Iterator<Item = u32> {
        (0_u32..1 << SLOTS).filter(|mask| mask.count_ones() == 4)
    }

    #[test]
    fn every_four_facelet_mask_is_known() {
        let pdb = PatternDatabase::get();
        let mut count = 0;
        for mask in four_bit_masks() {
            let distance = pdb.canonical_distance(mask);
            assert!(
                matches!(distance, Some(d) if d as i8 <= MAX_DISTANCE),
                "{mask:#x}"
            );
            count += 1;
        }
        assert_eq!(count, 10626);
        assert_eq!(pdb.known_entries(), count);
    }

    #[test]
    fn goal_is_zero_from_every_face() {
        let pdb = PatternDatabase::get();
        for face in Face::ALL {
            assert_eq!(pdb.distance(face.mask(), face), Ok(0));
            assert!(pdb.distance(face.opposite().mask(), face).unwrap() > 0);
        }
    }

    #[test]
    fn off_by_one_move() {
        let pdb = PatternDatabase::get();
        let rw = Move::Layer(Base::Rw, Turn::Clockwise).permutation();
        assert_eq!(pdb.distance(rw.apply_mask(Face::U.mask()), Face::U), Ok(1));
        // a whole-puzzle rotation costs one move in the table
        let x = Move::Rotation(Axis::X, Turn::Clockwise).permutation();
        assert_eq!(pdb.distance(x.apply_mask(Face::U.mask()), Face::U), Ok(1));
    }

    #[test]
    fn unknown_mask_is_an_error() {
        let pdb = PatternDatabase::get();
        assert_eq!(
            pdb.distance(0b111, Face::R),
            Err(SolverError::UnknownDistance {
                mask: 0b111,
                face: Face::R
            })
        );
    }

    /// Breadth-first search over facelet arrays instead of masks, cut off at
    /// a shallow depth.
    #[test]
    fn matches_brute_force_bfs() {
        const DEPTH: u8 = 3;
        let mut start = [false; SLOTS];
        for slot in Face::U.slots() {
            start[slot] = true;
        }
        let mut seen = HashMap::from([(start, 0_u8)]);
        let mut frontier = vec![start];
        for depth in 1..=DEPTH {
            let mut next_frontier = vec![];
            for state in &frontier {
                for mv in Move::generators() {
                    let next = mv.permutation().apply(state);
                    if !seen.contains_key(&next) {
                        seen.insert(next, depth);
                        next_frontier.push(next);
                    }
                }
            }
            frontier = next_frontier;
        }

        let pdb = PatternDatabase::get();
        for (state, depth) in seen {
            let mask = state
                .iter()
                .enumerate()
                .fold(0, |acc, (i, &set)| acc | (u32::from(set) << i));
            assert_eq!(pdb.canonical_distance(mask), Some(depth));
        }
    }
}
