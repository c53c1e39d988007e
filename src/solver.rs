//! Backtracking search over consistency-narrowed domains.
//!
//! The pipeline is: node consistency, then AC-3, then recursive backtracking
//! with minimum-remaining-values variable selection (degree tie-break) and
//! least-constraining-value ordering. An unsatisfiable puzzle is a normal
//! outcome, reported through [`SolveStatus::Unsatisfiable`] rather than an
//! error.
//!
//! # Error Handling
//!
//! The solver uses [`SolverError`] for malformed input:
//!
//! - S001: `EmptyWordList` (Vocabulary empty after normalization)
//!
//! Each error has a `code()`, optional `help()`, and `display_detailed()`
//! method. Puzzle-model construction errors (`G0xx`) are raised earlier, by
//! [`Grid::new`](crate::grid::Grid::new).
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use gridfill::grid::Grid;
//! use gridfill::solver::{self, SolveStatus};
//!
//! // A 1x3 strip holds a single across slot of length 3.
//! let grid = Grid::new(vec![vec![true, true, true]])?;
//! let result = solver::solve(&grid, &["cat", "dog"])?;
//!
//! assert_eq!(result.status, SolveStatus::Solved);
//! let assignment = result.assignment.expect("a three-letter word fits");
//! assert_eq!(assignment.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## No Solution Is Not an Error
//!
//! ```
//! use gridfill::grid::Grid;
//! use gridfill::solver::{self, SolveStatus};
//!
//! // A 4-cell slot with only 3-letter words: node consistency empties the
//! // domain and the solver reports the puzzle unsatisfiable.
//! let grid = Grid::new(vec![vec![true; 4]])?;
//! let result = solver::solve(&grid, &["cat", "dog"])?;
//!
//! assert!(result.assignment.is_none());
//! assert_eq!(result.status, SolveStatus::Unsatisfiable);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::cmp::Reverse;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::assignment::Assignment;
use crate::consistency::{all_arcs, enforce_node_consistency, run_ac3, Propagation};
use crate::domains::DomainStore;
use crate::grid::{Grid, Variable};
use crate::word_list::WordList;

/// The amount of time (in seconds) we allow a solve to run by default.
const TIME_BUDGET: u64 = 30;

/// Status of a solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// Search produced a complete, consistent assignment.
    Solved,

    /// Consistency enforcement or exhaustive search proved that no complete
    /// assignment exists.
    Unsatisfiable,

    /// The time budget expired before the search finished. Contains the
    /// elapsed time.
    TimedOut { elapsed: Duration },
}

/// Counters describing how much work the search did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Partial assignments from which a variable was selected.
    pub states: usize,
    /// States whose candidate words were all exhausted.
    pub backtracks: usize,
}

/// Successful solver run (even when the puzzle turned out unsatisfiable).
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// The completed assignment, present only when `status` is `Solved`.
    pub assignment: Option<Assignment>,
    /// Whether we solved, proved unsatisfiability, or ran out of time.
    pub status: SolveStatus,
    /// Search-effort counters.
    pub stats: SearchStats,
}

/// Unified error type for the solver pipeline.
///
/// Unsatisfiability is deliberately NOT represented here: a puzzle with no
/// solution is a valid outcome, not a failure. Errors are reserved for input
/// the solver cannot meaningfully search at all.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The vocabulary was empty after normalization (every entry blank or
    /// whitespace), so there is nothing to place.
    #[error("empty word list (no candidates to place)")]
    EmptyWordList,
}

impl SolverError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyWordList => "S001",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            SolverError::EmptyWordList => {
                Some("Provide at least one non-empty word; an unsolvable vocabulary is reported as Unsatisfiable, but an empty one is rejected up front")
            }
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Simple helper to enforce a wall-clock time limit.
///
/// Usage:
/// ```ignore
///  let budget = TimeBudget::new(Duration::from_secs(30));
///  while !budget.expired() {
///    // do some work
///  }
/// ```
pub(crate) struct TimeBudget {
    start: Instant,  // when the budget began
    limit: Duration, // maximum allowed elapsed time
}

impl TimeBudget {
    /// Create a new budget that lasts for `limit` (e.g., 30 seconds).
    pub(crate) fn new(limit: Duration) -> Self {
        Self { start: Instant::now(), limit }
    }

    /// A budget that never expires.
    pub(crate) fn unlimited() -> Self {
        Self::new(Duration::MAX)
    }

    /// How long this budget has been running.
    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns true if the allowed time has fully elapsed.
    pub(crate) fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// How one recursive descent of the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BacktrackOutcome {
    /// The assignment below this point is complete and consistent.
    Solved,
    /// Every candidate branch failed; the caller must try its next word.
    Exhausted,
    /// The time budget ran out mid-search.
    Expired,
}

/// Fill the grid from `words`, under the default 30-second time budget.
///
/// Runs node consistency, AC-3, and backtracking search. The completed
/// assignment (if any) is in [`SolveResult::assignment`]; a puzzle with no
/// solution yields `Ok` with [`SolveStatus::Unsatisfiable`].
///
/// # Errors
/// Returns [`SolverError::EmptyWordList`] if `words` normalizes to nothing.
pub fn solve(grid: &Grid, words: &[&str]) -> Result<SolveResult, SolverError> {
    solve_with_budget(grid, words, Some(Duration::from_secs(TIME_BUDGET)))
}

/// Like [`solve`], but with an explicit wall-clock limit (`None` = run
/// without a time limit).
///
/// The budget is checked at each AC-3 worklist iteration and at each
/// backtracking step; expiry surfaces as [`SolveStatus::TimedOut`], never as
/// a wrong Unsatisfiable verdict.
///
/// # Errors
/// Returns [`SolverError::EmptyWordList`] if `words` normalizes to nothing.
pub fn solve_with_budget(
    grid: &Grid,
    words: &[&str],
    limit: Option<Duration>,
) -> Result<SolveResult, SolverError> {
    let vocabulary = WordList::new(words.iter().copied());
    if vocabulary.is_empty() {
        return Err(SolverError::EmptyWordList);
    }

    info!(
        "solving {}x{} grid: {} slot(s), {} word(s)",
        grid.height(),
        grid.width(),
        grid.variables().len(),
        vocabulary.len()
    );

    let budget = limit.map_or_else(TimeBudget::unlimited, TimeBudget::new);
    let mut domains = DomainStore::new(grid, &vocabulary);
    let mut stats = SearchStats::default();

    // Phase 1: unary constraints.
    enforce_node_consistency(grid, &mut domains);
    if grid.variables().iter().any(|v| domains.is_wiped_out(v)) {
        info!("node consistency proved the puzzle unsatisfiable");
        return Ok(SolveResult { assignment: None, status: SolveStatus::Unsatisfiable, stats });
    }

    // Phase 2: binary constraints via AC-3 over the full arc set.
    match run_ac3(grid, &mut domains, all_arcs(grid), &budget) {
        Propagation::Wipeout => {
            info!("arc consistency proved the puzzle unsatisfiable");
            return Ok(SolveResult { assignment: None, status: SolveStatus::Unsatisfiable, stats });
        }
        Propagation::Expired => {
            return Ok(SolveResult {
                assignment: None,
                status: SolveStatus::TimedOut { elapsed: budget.elapsed() },
                stats,
            });
        }
        Propagation::Consistent => {}
    }
    debug!(
        "domain sizes after consistency enforcement: {:?}",
        grid.variables().iter().map(|v| domains.size_of(v)).collect::<Vec<_>>()
    );

    // Phase 3: backtracking search over the narrowed domains.
    let mut assignment = Assignment::new();
    let outcome = backtrack(grid, &domains, &mut assignment, &mut stats, &budget);
    let elapsed = budget.elapsed();

    let result = match outcome {
        BacktrackOutcome::Solved => {
            debug_assert!(assignment.is_complete(grid), "Solved outcome requires a complete assignment");
            debug_assert!(consistent(grid, &assignment), "Solved outcome requires a consistent assignment");
            info!(
                "solved in {:.3}s ({} state(s), {} backtrack(s))",
                elapsed.as_secs_f64(),
                stats.states,
                stats.backtracks
            );
            SolveResult { assignment: Some(assignment), status: SolveStatus::Solved, stats }
        }
        BacktrackOutcome::Exhausted => {
            info!(
                "search exhausted without a solution ({} state(s), {} backtrack(s))",
                stats.states, stats.backtracks
            );
            SolveResult { assignment: None, status: SolveStatus::Unsatisfiable, stats }
        }
        BacktrackOutcome::Expired => {
            warn!("time budget expired after {:.1}s", elapsed.as_secs_f64());
            SolveResult { assignment: None, status: SolveStatus::TimedOut { elapsed }, stats }
        }
    };
    Ok(result)
}

/// One step of the recursive search.
///
/// Extends the assignment one variable at a time: select by MRV (degree
/// tie-break), order candidates by LCV, keep any extension that passes the
/// global consistency check, and undo the extension exactly when a branch
/// fails. The first complete assignment wins.
fn backtrack(
    grid: &Grid,
    domains: &DomainStore,
    assignment: &mut Assignment,
    stats: &mut SearchStats,
    budget: &TimeBudget,
) -> BacktrackOutcome {
    if assignment.is_complete(grid) {
        return BacktrackOutcome::Solved;
    }
    if budget.expired() {
        return BacktrackOutcome::Expired;
    }
    stats.states += 1;

    let Some(var) = select_unassigned_variable(grid, domains, assignment).copied() else {
        debug_assert!(false, "incomplete assignment with no unassigned variable");
        return BacktrackOutcome::Exhausted;
    };

    for word in order_domain_values(grid, domains, assignment, &var) {
        assignment.assign(var, word);
        if consistent(grid, assignment) {
            match backtrack(grid, domains, assignment, stats, budget) {
                BacktrackOutcome::Exhausted => {}
                // Solved keeps the extension in place; Expired propagates up.
                done => return done,
            }
        }
        assignment.unassign(&var);
    }

    stats.backtracks += 1;
    BacktrackOutcome::Exhausted
}

/// Minimum-remaining-values selection with maximum-degree tie-break.
///
/// Domain sizes come straight from the domain store (they are not re-filtered
/// against the partial assignment). Remaining ties fall back to variable
/// construction order, which keeps fixtures reproducible.
fn select_unassigned_variable<'g>(
    grid: &'g Grid,
    domains: &DomainStore,
    assignment: &Assignment,
) -> Option<&'g Variable> {
    grid.variables()
        .iter()
        .filter(|v| !assignment.contains(v))
        .min_by_key(|v| (domains.size_of(v), Reverse(grid.degree(v))))
}

/// Least-constraining-value ordering for `var`'s candidates.
///
/// Each candidate is ranked by how many values it would eliminate across
/// `var`'s still-unassigned neighbors (a neighbor's candidate is eliminated
/// when the overlap letters conflict). Ascending rank, alphabetical within a
/// rank.
fn order_domain_values(
    grid: &Grid,
    domains: &DomainStore,
    assignment: &Assignment,
    var: &Variable,
) -> Vec<Rc<str>> {
    let unassigned_neighbors: Vec<&Variable> = grid
        .neighbors(var)
        .iter()
        .filter(|n| !assignment.contains(n))
        .collect();

    let mut ranked: Vec<(usize, Rc<str>)> = domains
        .domain_of(var)
        .iter()
        .map(|word| {
            let ruled_out: usize = unassigned_neighbors
                .iter()
                .filter_map(|n| grid.overlap(var, n).map(|offsets| (*n, offsets)))
                .map(|(n, (a, b))| {
                    domains
                        .domain_of(n)
                        .iter()
                        .filter(|candidate| eliminates(word, candidate, a, b))
                        .count()
                })
                .sum();
            (ruled_out, Rc::clone(word))
        })
        .collect();

    ranked.sort_by(|(ca, wa), (cb, wb)| ca.cmp(cb).then_with(|| wa.cmp(wb)));
    ranked.into_iter().map(|(_, word)| word).collect()
}

/// Whether placing `word` eliminates `candidate` in a crossing slot: the
/// letters at the overlap offsets fail to agree.
fn eliminates(word: &str, candidate: &str, a: usize, b: usize) -> bool {
    !matches!(
        (word.as_bytes().get(a), candidate.as_bytes().get(b)),
        (Some(ca), Some(cb)) if ca == cb
    )
}

/// Global consistency check over every pair of assigned variables.
///
/// Holds when each word's length matches its slot, no two slots hold the
/// identical word, and every defined overlap has agreeing letters. Pairs
/// without an overlap pass trivially, so this ranges over all assigned pairs
/// rather than any neighbor subset.
fn consistent(grid: &Grid, assignment: &Assignment) -> bool {
    for (x, wx) in assignment.iter() {
        if wx.len() != x.length() {
            return false;
        }
        for (y, wy) in assignment.iter() {
            if x == y {
                continue;
            }
            if wx == wy {
                return false;
            }
            if let Some((a, b)) = grid.overlap(x, y) {
                let agree = matches!(
                    (wx.as_bytes().get(a), wy.as_bytes().get(b)),
                    (Some(ca), Some(cb)) if ca == cb
                );
                if !agree {
                    return false;
                }
            }
        }
    }
    true
}
