use log::{info, warn};
use std::time::{Duration, Instant};

use crate::{
    config::SolverConfig,
    error::{InputError, SolverError},
    face::Face,
    moves::Move,
    orientation::OrientationSelector,
    pattern_database::PatternDatabase,
    puzzle::{Color, PuzzleState},
    search::{SearchOutcome, Searcher},
    solution::Solution,
};

/// What the caller wants solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub state: PuzzleState,
    pub target: Face,
    /// Colour that goes on `target` and colour that goes on its opposite.
    /// Detected from the state when `None`.
    pub colors: Option<(Color, Color)>,
    pub banned_prefixes: Vec<String>,
}

impl SolveRequest {
    pub fn new(state: PuzzleState, target: Face) -> Self {
        Self {
            state,
            target,
            colors: None,
            banned_prefixes: vec![],
        }
    }

    #[must_use]
    pub fn with_colors(mut self, target_color: Color, opposite_color: Color) -> Self {
        self.colors = Some((target_color, opposite_color));
        self
    }

    #[must_use]
    pub fn with_banned_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.banned_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    Solved,
    NoSolutionWithinBound,
    TimeLimitExceeded,
    InvalidInput(InputError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub target: Face,
    /// Whole-puzzle rotations applied before the search.
    pub prefix: Vec<Move>,
    /// Layer moves found by the search.
    pub path: Vec<Move>,
    /// `prefix` then `path`.
    pub forward: Vec<Move>,
    /// Exact inverse of `forward`.
    pub inverse: Vec<Move>,
    /// `inverse` led by the target's anchor rotation, with banned rotations
    /// written as wide moves.
    pub setup: Vec<Move>,
    /// Layer moves only; the prefix is not counted.
    pub move_count: usize,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SolveResult {
    fn unsolved(status: SolveStatus, target: Face, nodes: u64, elapsed: Duration) -> Self {
        Self {
            status,
            target,
            prefix: vec![],
            path: vec![],
            forward: vec![],
            inverse: vec![],
            setup: vec![],
            move_count: 0,
            nodes,
            elapsed,
        }
    }

    fn solved(solution: &Solution, setup: Vec<Move>, nodes: u64, elapsed: Duration) -> Self {
        Self {
            status: SolveStatus::Solved,
            target: solution.target,
            prefix: solution.prefix.clone(),
            path: solution.path.clone(),
            forward: solution.forward(),
            inverse: solution.inverse(),
            setup,
            move_count: solution.path.len(),
            nodes,
            elapsed,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Solved
    }

    pub fn forward_string(&self) -> String {
        crate::solution::format_moves(&self.forward)
    }

    pub fn setup_string(&self) -> String {
        crate::solution::format_moves(&self.setup)
    }

    /// One status line for display next to the move strings.
    pub fn summary(&self) -> String {
        match &self.status {
            SolveStatus::Solved => format!(
                "{} moves{} | {:.1} ms",
                self.move_count,
                if self.prefix.is_empty() { "" } else { " (+setup)" },
                self.elapsed.as_secs_f64() * 1000.0
            ),
            SolveStatus::NoSolutionWithinBound => format!("no solution, nodes: {}", self.nodes),
            SolveStatus::TimeLimitExceeded => format!("time limit exceeded, nodes: {}", self.nodes),
            SolveStatus::InvalidInput(err) => err.to_string(),
        }
    }
}

/// Runs orientation selection, IDA* search and formatting for one request at
/// a time. Per-solve state lives on the stack of `solve`, so one solver can
/// be shared.
pub struct Solver {
    config: SolverConfig,
    pdb: &'static PatternDatabase,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Solver {
    /// Builds the shared pattern database if nobody has yet.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            pdb: PatternDatabase::get(),
        }
    }

    fn tracked_colors(request: &SolveRequest) -> Result<(Color, Color), InputError> {
        let (target, opposite) = match request.colors {
            Some(colors) => colors,
            None => request.state.detect_color_pair()?,
        };
        if target == opposite {
            return Err(InputError::SameColor(target));
        }
        let target_count = request.state.count(target);
        let opposite_count = request.state.count(opposite);
        if target_count != 4 || opposite_count != 4 {
            return Err(InputError::CountMismatch {
                target,
                target_count,
                opposite,
                opposite_count,
            });
        }
        Ok((target, opposite))
    }

    /// # Errors
    ///
    /// Only internal defects are errors. Bad input, an exhausted depth cap
    /// and an expired time limit are reported through `SolveStatus`.
    pub fn solve(&self, request: &SolveRequest) -> Result<SolveResult, SolverError> {
        let start = Instant::now();
        let deadline = self.config.time_limit.map(|limit| start + limit);

        let (target_color, opposite_color) = match Self::tracked_colors(request) {
            Ok(colors) => colors,
            Err(err) => {
                warn!("Rejecting input: {err}");
                return Ok(SolveResult::unsolved(
                    SolveStatus::InvalidInput(err),
                    request.target,
                    0,
                    start.elapsed(),
                ));
            }
        };

        let orientation = OrientationSelector::new(self.pdb, request.target).select(
            request.state.mask(target_color),
            request.state.mask(opposite_color),
            &request.banned_prefixes,
        )?;

        let report = Searcher::new(
            self.pdb,
            request.target,
            &self.config,
            &request.banned_prefixes,
        )
        .with_deadline(deadline)
        .search(orientation.target_mask, orientation.opposite_mask)?;

        let result = match report.outcome {
            SearchOutcome::Found(path) => {
                let solution = Solution {
                    target: request.target,
                    prefix: orientation.prefix,
                    path,
                };
                match solution.setup_avoiding(&request.banned_prefixes) {
                    Ok(setup) => {
                        SolveResult::solved(&solution, setup, report.nodes, start.elapsed())
                    }
                    Err(err) => SolveResult::unsolved(
                        SolveStatus::InvalidInput(err),
                        request.target,
                        report.nodes,
                        start.elapsed(),
                    ),
                }
            }
            SearchOutcome::Exhausted => SolveResult::unsolved(
                SolveStatus::NoSolutionWithinBound,
                request.target,
                report.nodes,
                start.elapsed(),
            ),
            SearchOutcome::TimedOut => SolveResult::unsolved(
                SolveStatus::TimeLimitExceeded,
                request.target,
                report.nodes,
                start.elapsed(),
            ),
        };

        match &result.status {
            SolveStatus::Solved => info!(
                "Solved {} onto {} in {} moves ({} nodes, {:.3}s)",
                target_color,
                request.target,
                result.move_count,
                result.nodes,
                result.elapsed.as_secs_f64()
            ),
            SolveStatus::NoSolutionWithinBound => warn!(
                "No solution onto {} within {} moves ({} nodes)",
                request.target, self.config.max_depth, result.nodes
            ),
            SolveStatus::TimeLimitExceeded => warn!(
                "Gave up on {} after {:.3}s ({} nodes)",
                request.target,
                result.elapsed.as_secs_f64(),
                result.nodes
            ),
            SolveStatus::InvalidInput(err) => warn!("Rejecting input: {err}"),
        }
        Ok(result)
    }
}
