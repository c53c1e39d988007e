//! The puzzle model: grid shape, slot variables, and pairwise overlap relations.
//!
//! A [`Grid`] is built once from an already-parsed open/blocked cell matrix.
//! Construction derives every [`Variable`] (a maximal horizontal or vertical
//! run of at least two open cells) and precomputes the overlap relation for
//! every intersecting pair. Everything here is read-only during solving.

use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::errors::GridError;

/// Orientation of a slot in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Across,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// One crossword slot: a starting cell, a length, and a direction.
///
/// Identity (equality and hashing) is the full `(i, j, length, direction)`
/// tuple. Variables are plain values; the solver copies them freely and never
/// destroys them during a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    i: usize,
    j: usize,
    length: usize,
    direction: Direction,
}

impl Variable {
    /// A slot must span at least two cells.
    pub const MIN_LENGTH: usize = 2;

    #[must_use]
    pub fn new(i: usize, j: usize, length: usize, direction: Direction) -> Self {
        debug_assert!(
            length >= Self::MIN_LENGTH,
            "slot length {length} below minimum {}",
            Self::MIN_LENGTH
        );
        Self { i, j, length, direction }
    }

    /// Starting row.
    #[must_use]
    pub fn i(&self) -> usize {
        self.i
    }

    /// Starting column.
    #[must_use]
    pub fn j(&self) -> usize {
        self.j
    }

    /// Number of cells (and required word length).
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The `(row, col)` coordinates this slot covers, in word order.
    ///
    /// The k-th coordinate is the cell holding the k-th letter of whatever
    /// word is placed here, which is all a rendering collaborator needs to
    /// reconstruct a letter grid from an assignment.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(move |k| match self.direction {
            Direction::Across => (self.i, self.j + k),
            Direction::Down => (self.i + k, self.j),
        })
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.i, self.j, self.direction, self.length)
    }
}

/// The static puzzle structure: cell matrix, derived variables, and overlaps.
#[derive(Debug, Clone)]
pub struct Grid {
    height: usize,
    width: usize,
    /// `true` = open (fillable) cell, `false` = blocked.
    cells: Vec<Vec<bool>>,
    /// All variables, in construction order (across runs row-major, then down
    /// runs column-major). This order is the deterministic tie-break used by
    /// the search heuristics.
    variables: Vec<Variable>,
    /// For each ordered pair of intersecting variables `(x, y)`, the offsets
    /// `(a, b)` such that the a-th letter of x's word must equal the b-th
    /// letter of y's word. Non-intersecting pairs are absent, which keeps
    /// "no overlap" distinct from "overlap at offset 0".
    overlaps: HashMap<(Variable, Variable), (usize, usize)>,
    /// For each variable, the variables whose cell ranges intersect it,
    /// in construction order.
    neighbors: HashMap<Variable, Vec<Variable>>,
}

impl Grid {
    /// Build the puzzle model from an open/blocked cell matrix
    /// (`true` = open).
    ///
    /// Validates the matrix shape, then derives variables from maximal
    /// contiguous runs of open cells (across, then down; runs of a single
    /// cell are not slots) and precomputes the overlap relation for every
    /// intersecting pair.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyStructure`] if the matrix has no rows or no
    /// columns, and [`GridError::RaggedStructure`] if any row's width differs
    /// from the first row's.
    pub fn new(cells: Vec<Vec<bool>>) -> Result<Self, GridError> {
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(GridError::EmptyStructure);
        }
        for (row, r) in cells.iter().enumerate() {
            if r.len() != width {
                return Err(GridError::RaggedStructure { row, expected: width, found: r.len() });
            }
        }

        let variables = derive_variables(&cells, height, width);
        let (overlaps, neighbors) = derive_overlaps(&variables);

        Ok(Self { height, width, cells, variables, overlaps, neighbors })
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the cell at `(i, j)` is open. Out-of-bounds cells are blocked.
    #[must_use]
    pub fn is_open(&self, i: usize, j: usize) -> bool {
        self.cells.get(i).is_some_and(|row| row.get(j).copied().unwrap_or(false))
    }

    /// All slot variables, in construction order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The variables whose cell ranges intersect `v`'s, in construction
    /// order. Unknown variables have no neighbors.
    #[must_use]
    pub fn neighbors(&self, v: &Variable) -> &[Variable] {
        self.neighbors.get(v).map_or(&[], Vec::as_slice)
    }

    /// Number of neighbors of `v`; the degree tie-break of the search.
    #[must_use]
    pub fn degree(&self, v: &Variable) -> usize {
        self.neighbors(v).len()
    }

    /// The overlap relation between two distinct variables.
    ///
    /// `None` means the cell ranges do not intersect. `Some((a, b))` means
    /// the a-th letter of x's word must equal the b-th letter of y's word.
    /// `overlap(x, x)` is not a meaningful query and always returns `None`.
    #[must_use]
    pub fn overlap(&self, x: &Variable, y: &Variable) -> Option<(usize, usize)> {
        self.overlaps.get(&(*x, *y)).copied()
    }
}

/// Scan the matrix for maximal runs of open cells, across then down.
fn derive_variables(cells: &[Vec<bool>], height: usize, width: usize) -> Vec<Variable> {
    let mut variables = Vec::new();

    for i in 0..height {
        let mut run_start = None;
        for j in 0..=width {
            let open = j < width && cells[i][j];
            match (open, run_start) {
                (true, None) => run_start = Some(j),
                (false, Some(start)) => {
                    let length = j - start;
                    if length >= Variable::MIN_LENGTH {
                        variables.push(Variable::new(i, start, length, Direction::Across));
                    }
                    run_start = None;
                }
                _ => {}
            }
        }
    }

    for j in 0..width {
        let mut run_start = None;
        for i in 0..=height {
            let open = i < height && cells[i][j];
            match (open, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    let length = i - start;
                    if length >= Variable::MIN_LENGTH {
                        variables.push(Variable::new(start, j, length, Direction::Down));
                    }
                    run_start = None;
                }
                _ => {}
            }
        }
    }

    variables
}

/// Compute the overlap offsets and neighbor lists for every pair of
/// variables whose cell ranges intersect.
///
/// Two distinct slots share at most one cell (parallel runs are maximal and
/// therefore disjoint), so the inner scan stops at the first common cell.
fn derive_overlaps(
    variables: &[Variable],
) -> (HashMap<(Variable, Variable), (usize, usize)>, HashMap<Variable, Vec<Variable>>) {
    let mut overlaps = HashMap::new();
    let mut neighbors: HashMap<Variable, Vec<Variable>> =
        variables.iter().map(|v| (*v, Vec::new())).collect();

    for (xi, x) in variables.iter().enumerate() {
        for y in variables.iter().skip(xi + 1) {
            let crossing = x.cells().enumerate().find_map(|(a, cx)| {
                y.cells().position(|cy| cy == cx).map(|b| (a, b))
            });
            if let Some((a, b)) = crossing {
                overlaps.insert((*x, *y), (a, b));
                overlaps.insert((*y, *x), (b, a));
            }
        }
    }

    // Neighbor lists in construction order.
    for x in variables {
        for y in variables {
            if x != y && overlaps.contains_key(&(*x, *y)) {
                if let Some(ns) = neighbors.get_mut(x) {
                    ns.push(*y);
                }
            }
        }
    }

    (overlaps, neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_row(n: usize) -> Vec<bool> {
        vec![true; n]
    }

    #[test]
    fn test_single_across_slot() {
        let grid = Grid::new(vec![open_row(3)]).unwrap();
        assert_eq!(
            grid.variables(),
            &[Variable::new(0, 0, 3, Direction::Across)]
        );
    }

    #[test]
    fn test_single_cell_runs_are_not_slots() {
        // Open cells separated by blocks: every run has length 1.
        let grid = Grid::new(vec![vec![true, false, true]]).unwrap();
        assert!(grid.variables().is_empty());
    }

    #[test]
    fn test_blocked_cell_splits_runs() {
        let grid = Grid::new(vec![vec![true, true, false, true, true, true]]).unwrap();
        assert_eq!(
            grid.variables(),
            &[
                Variable::new(0, 0, 2, Direction::Across),
                Variable::new(0, 3, 3, Direction::Across),
            ]
        );
    }

    #[test]
    fn test_down_slots_follow_across_slots_in_construction_order() {
        // 2x2 fully open: two across runs, then two down runs.
        let grid = Grid::new(vec![open_row(2), open_row(2)]).unwrap();
        assert_eq!(
            grid.variables(),
            &[
                Variable::new(0, 0, 2, Direction::Across),
                Variable::new(1, 0, 2, Direction::Across),
                Variable::new(0, 0, 2, Direction::Down),
                Variable::new(0, 1, 2, Direction::Down),
            ]
        );
    }

    #[test]
    fn test_empty_structure_rejected() {
        assert!(matches!(Grid::new(vec![]), Err(GridError::EmptyStructure)));
        assert!(matches!(Grid::new(vec![vec![]]), Err(GridError::EmptyStructure)));
    }

    #[test]
    fn test_ragged_structure_rejected() {
        let result = Grid::new(vec![open_row(3), open_row(2)]);
        assert!(matches!(
            result,
            Err(GridError::RaggedStructure { row: 1, expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_variable_identity_is_full_tuple() {
        let a = Variable::new(0, 0, 3, Direction::Across);
        let b = Variable::new(0, 0, 3, Direction::Across);
        let c = Variable::new(0, 0, 3, Direction::Down);
        let d = Variable::new(0, 0, 4, Direction::Across);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        set.insert(b);
        set.insert(c);
        set.insert(d);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_cells_across_and_down() {
        let across = Variable::new(1, 2, 3, Direction::Across);
        assert_eq!(across.cells().collect::<Vec<_>>(), vec![(1, 2), (1, 3), (1, 4)]);

        let down = Variable::new(1, 2, 3, Direction::Down);
        assert_eq!(down.cells().collect::<Vec<_>>(), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_overlap_offsets_for_crossing_slots() {
        // row 0 fully open, column 2 open for three rows:
        //   . . A
        //   # # D
        //   # # D
        let grid = Grid::new(vec![
            vec![true, true, true],
            vec![false, false, true],
            vec![false, false, true],
        ])
        .unwrap();

        let across = Variable::new(0, 0, 3, Direction::Across);
        let down = Variable::new(0, 2, 3, Direction::Down);
        assert_eq!(grid.variables(), &[across, down]);

        // They cross at (0, 2): third letter of across, first letter of down.
        assert_eq!(grid.overlap(&across, &down), Some((2, 0)));
        assert_eq!(grid.overlap(&down, &across), Some((0, 2)));
    }

    #[test]
    fn test_overlap_none_for_disjoint_slots() {
        let grid = Grid::new(vec![open_row(3), vec![false; 3], open_row(3)]).unwrap();
        let top = Variable::new(0, 0, 3, Direction::Across);
        let bottom = Variable::new(2, 0, 3, Direction::Across);

        assert_eq!(grid.overlap(&top, &bottom), None);
        assert!(grid.neighbors(&top).is_empty());
    }

    #[test]
    fn test_overlap_at_offset_zero_is_distinct_from_absence() {
        // Across and down slots sharing their starting cell.
        let grid = Grid::new(vec![
            vec![true, true, true],
            vec![true, false, false],
            vec![true, false, false],
        ])
        .unwrap();

        let across = Variable::new(0, 0, 3, Direction::Across);
        let down = Variable::new(0, 0, 3, Direction::Down);
        assert_eq!(grid.overlap(&across, &down), Some((0, 0)));
    }

    #[test]
    fn test_neighbors_symmetric_and_ordered() {
        // Full 3x3 open grid: three across, three down, every across crosses
        // every down.
        let grid = Grid::new(vec![open_row(3); 3]).unwrap();
        assert_eq!(grid.variables().len(), 6);

        let first_across = grid.variables()[0];
        assert_eq!(grid.degree(&first_across), 3);

        for x in grid.variables() {
            for y in grid.neighbors(x) {
                assert!(grid.neighbors(y).contains(x), "neighbors must be symmetric");
                assert!(grid.overlap(x, y).is_some());
            }
        }
    }

    #[test]
    fn test_is_open_bounds() {
        let grid = Grid::new(vec![vec![true, false]]).unwrap();
        assert!(grid.is_open(0, 0));
        assert!(!grid.is_open(0, 1));
        assert!(!grid.is_open(5, 5));
    }

    #[test]
    fn test_variable_display() {
        let v = Variable::new(1, 0, 3, Direction::Across);
        assert_eq!(v.to_string(), "(1, 0, across, 3)");
    }
}
