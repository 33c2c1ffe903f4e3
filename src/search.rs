use fxhash::FxHashMap;
use log::debug;
use std::{collections::hash_map::Entry, time::Instant};

use crate::{
    config::SolverConfig,
    error::SolverError,
    face::Face,
    moves::{Move, Permutation},
    pattern_database::PatternDatabase,
};

/// How often, in nodes, the deadline is compared against the clock.
const DEADLINE_CHECK_INTERVAL: u64 = 4096;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    mv: Move,
    perm: &'static Permutation,
    base: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<Move>),
    /// Every bound up to the depth cap was searched without reaching the goal.
    Exhausted,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub nodes: u64,
}

enum Expansion {
    Found,
    /// Smallest `f` that exceeded the bound below this node, `u32::MAX` if
    /// none did.
    Pruned(u32),
    TimedOut,
}

/// Mutable state private to one search.
struct SearchContext {
    path: Vec<Move>,
    /// Smallest `g` each `(target mask, opposite mask)` pair was reached at
    /// during the current iteration.
    visited: FxHashMap<(u32, u32), u32>,
    nodes: u64,
}

/// IDA* over the 36 layer moves, driving one colour group onto `target` and
/// the other onto the opposite face.
pub struct Searcher<'a> {
    pdb: &'a PatternDatabase,
    target: Face,
    moves: Vec<Candidate>,
    max_depth: u32,
    deadline: Option<Instant>,
}

impl<'a> Searcher<'a> {
    pub fn new(
        pdb: &'a PatternDatabase,
        target: Face,
        config: &SolverConfig,
        banned_prefixes: &[String],
    ) -> Self {
        let mut moves: Vec<Candidate> = Move::layer_moves()
            .filter(|&mv| !mv.is_banned(banned_prefixes))
            .filter_map(|mv| match mv {
                Move::Layer(base, _) => Some(Candidate {
                    mv,
                    perm: mv.permutation(),
                    base: base.index(),
                }),
                Move::Rotation(..) => None,
            })
            .collect();
        // stable, so each group keeps base order
        let deferred = &config.deferred_prefixes;
        moves.sort_by_key(|candidate| candidate.mv.starts_with_any(deferred));

        Self {
            pdb,
            target,
            moves,
            max_depth: u32::from(config.max_depth),
            deadline: None,
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// The moves tried at every branch point, in the order they are tried.
    pub fn allowed_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().map(|candidate| candidate.mv)
    }

    /// Admissible estimate: each colour group on its own needs at least its
    /// pattern database distance.
    pub fn heuristic(&self, target_mask: u32, opposite_mask: u32) -> Result<u8, SolverError> {
        let target = self.pdb.distance(target_mask, self.target)?;
        let opposite = self.pdb.distance(opposite_mask, self.target.opposite())?;
        Ok(target.max(opposite))
    }

    /// Finds a shortest layer-move sequence, or reports that none exists
    /// within the depth cap.
    pub fn search(
        &self,
        target_mask: u32,
        opposite_mask: u32,
    ) -> Result<SearchReport, SolverError> {
        let mut ctx = SearchContext {
            path: vec![],
            visited: FxHashMap::default(),
            nodes: 0,
        };
        let mut bound = u32::from(self.heuristic(target_mask, opposite_mask)?);

        let outcome = loop {
            if bound > self.max_depth {
                break SearchOutcome::Exhausted;
            }
            debug!("Searching depth {}...", bound);
            let depth_start = Instant::now();
            let nodes_before = ctx.nodes;
            ctx.visited.clear();

            let expansion =
                self.ida_star_search(&mut ctx, target_mask, opposite_mask, 0, bound, None)?;
            debug!(
                "Traversed {} nodes in {:.3}s",
                ctx.nodes - nodes_before,
                depth_start.elapsed().as_secs_f64()
            );

            match expansion {
                Expansion::Found => break SearchOutcome::Found(std::mem::take(&mut ctx.path)),
                Expansion::TimedOut => break SearchOutcome::TimedOut,
                Expansion::Pruned(u32::MAX) => break SearchOutcome::Exhausted,
                Expansion::Pruned(next_bound) => bound = next_bound,
            }
        };

        Ok(SearchReport {
            outcome,
            nodes: ctx.nodes,
        })
    }

    fn ida_star_search(
        &self,
        ctx: &mut SearchContext,
        target_mask: u32,
        opposite_mask: u32,
        g: u32,
        bound: u32,
        last_base: Option<usize>,
    ) -> Result<Expansion, SolverError> {
        if ctx.nodes % DEADLINE_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|at| Instant::now() >= at)
        {
            return Ok(Expansion::TimedOut);
        }
        ctx.nodes += 1;

        let h = u32::from(self.heuristic(target_mask, opposite_mask)?);
        let f = g + h;
        if f > bound {
            return Ok(Expansion::Pruned(f));
        }
        if h == 0 {
            debug_assert_eq!(target_mask, self.target.mask());
            debug_assert_eq!(opposite_mask, self.target.opposite().mask());
            return Ok(Expansion::Found);
        }

        match ctx.visited.entry((target_mask, opposite_mask)) {
            Entry::Occupied(seen) if *seen.get() <= g => return Ok(Expansion::Pruned(u32::MAX)),
            Entry::Occupied(mut seen) => {
                seen.insert(g);
            }
            Entry::Vacant(slot) => {
                slot.insert(g);
            }
        }

        let mut min = u32::MAX;
        for candidate in &self.moves {
            // Moves on one axis commute, so only increasing base order is
            // searched. This also rules out turning the same base twice.
            if let Some(last) = last_base {
                if candidate.base / 4 == last / 4 && candidate.base <= last {
                    continue;
                }
            }

            ctx.path.push(candidate.mv);
            let expansion = self.ida_star_search(
                ctx,
                candidate.perm.apply_mask(target_mask),
                candidate.perm.apply_mask(opposite_mask),
                g + 1,
                bound,
                Some(candidate.base),
            )?;
            match expansion {
                Expansion::Found | Expansion::TimedOut => return Ok(expansion),
                Expansion::Pruned(t) => min = min.min(t),
            }
            ctx.path.pop();
        }

        Ok(Expansion::Pruned(min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{parse_moves, Base, Turn};

    fn masks_after(moves: &str, target: Face) -> (u32, u32) {
        let perm = crate::moves::sequence_permutation(&parse_moves(moves).unwrap());
        (
            perm.apply_mask(target.mask()),
            perm.apply_mask(target.opposite().mask()),
        )
    }

    fn default_searcher(target: Face) -> Searcher<'static> {
        let config = SolverConfig::default();
        Searcher::new(PatternDatabase::get(), target, &config, &[])
    }

    #[test]
    fn solved_root_needs_no_moves() {
        let searcher = default_searcher(Face::L);
        let report = searcher.search(Face::L.mask(), Face::R.mask()).unwrap();
        assert_eq!(report.outcome, SearchOutcome::Found(vec![]));
        assert_eq!(report.nodes, 1);
    }

    #[test]
    fn deferred_moves_come_last() {
        let searcher = default_searcher(Face::U);
        let order: Vec<Move> = searcher.allowed_moves().collect();
        assert_eq!(order.len(), Move::LAYER_COUNT);
        assert_eq!(order[0], Move::Layer(Base::Rw, Turn::Clockwise));
        let tail: Vec<String> = order[30..].iter().map(ToString::to_string).collect();
        assert_eq!(tail, ["Dw", "Dw2", "Dw'", "Bw", "Bw2", "Bw'"]);
    }

    #[test]
    fn custom_deferred_prefixes() {
        let config = SolverConfig::default().with_deferred_prefixes(["R"]);
        let searcher = Searcher::new(PatternDatabase::get(), Face::U, &config, &[]);
        let order: Vec<String> = searcher.allowed_moves().map(|mv| mv.to_string()).collect();
        assert_eq!(order[0], "Lw");
        assert_eq!(order[30..], ["Rw", "Rw2", "Rw'", "R", "R2", "R'"]);
    }

    #[test]
    fn banned_prefixes_are_removed() {
        let banned = vec!["F".to_owned(), "Lw".to_owned()];
        let config = SolverConfig::default();
        let searcher = Searcher::new(PatternDatabase::get(), Face::U, &config, &banned);
        let names: Vec<String> = searcher.allowed_moves().map(|mv| mv.to_string()).collect();
        assert_eq!(names.len(), Move::LAYER_COUNT - 9);
        for name in &names {
            assert!(!name.starts_with('F') && !name.starts_with("Lw"), "{name}");
        }
        assert!(names.iter().any(|name| name == "L2"));
    }

    #[test]
    fn banning_a_turn_also_bans_its_inverse() {
        let banned = vec!["Rw'".to_owned()];
        let config = SolverConfig::default();
        let searcher = Searcher::new(PatternDatabase::get(), Face::U, &config, &banned);
        let names: Vec<String> = searcher.allowed_moves().map(|mv| mv.to_string()).collect();
        assert_eq!(names.len(), Move::LAYER_COUNT - 2);
        assert!(!names.iter().any(|name| name == "Rw" || name == "Rw'"));
        assert!(names.iter().any(|name| name == "Rw2"));
    }

    #[test]
    fn finds_inverse_of_short_scramble() {
        let searcher = default_searcher(Face::U);
        let (w, y) = masks_after("Fw2", Face::U);
        let report = searcher.search(w, y).unwrap();
        let expected = parse_moves("Fw2").unwrap();
        assert_eq!(report.outcome, SearchOutcome::Found(expected));
    }

    #[test]
    fn depth_cap_is_respected() {
        let config = SolverConfig::default().with_max_depth(1);
        let searcher = Searcher::new(PatternDatabase::get(), Face::U, &config, &[]);
        let (w, y) = masks_after("Rw Uw Fw", Face::U);
        let report = searcher.search(w, y).unwrap();
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
    }

    #[test]
    fn expired_deadline_stops_search() {
        let deadline = Some(Instant::now());
        let searcher = default_searcher(Face::U).with_deadline(deadline);
        let (w, y) = masks_after("Rw Uw", Face::U);
        let report = searcher.search(w, y).unwrap();
        assert_eq!(report.outcome, SearchOutcome::TimedOut);
        assert_eq!(report.nodes, 0);
    }
}
