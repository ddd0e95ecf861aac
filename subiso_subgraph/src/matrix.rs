//! The query × target compatibility matrix.
//!
//! Each cell records whether a query vertex may still be mapped onto a target
//! vertex. Cells are never deleted while searching; they are *marked* as
//! removed on behalf of the row whose commitment made them inconsistent, and
//! every mark is pushed onto a trail. Undoing a commitment pops that row's
//! suffix of the trail, which puts back exactly the cells it hid and nothing
//! else. This avoids copying the matrix at every level of the search.

use std::fmt;

/// State of one `(query, target)` cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Never admissible (failed the vertex or degree test).
    Absent,
    /// A live candidate.
    Present,
    /// Hidden while the given row's commitment stands.
    RemovedBy(usize),
}

/// One entry of the undo log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Removal {
    /// Query vertex of the cell.
    row: usize,
    /// Target vertex of the cell.
    col: usize,
    /// Row whose commitment removed the cell.
    owner: usize,
    /// State the cell had before it was marked.
    previous: CellState,
}

/// Dense `rows × cols` grid of [`CellState`] plus its undo log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompatibilityMatrix {
    /// Number of query vertices.
    rows: usize,
    /// Number of target vertices.
    cols: usize,
    /// Row-major cells.
    cells: Vec<CellState>,
    /// Every mark not yet undone, oldest first.
    trail: Vec<Removal>,
}

impl CompatibilityMatrix {
    /// A matrix with every cell [`CellState::Absent`].
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellState::Absent; rows * cols],
            trail: Vec::new(),
        }
    }

    /// Number of rows (query vertices).
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (target vertices).
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) out of range");
        i * self.cols + j
    }

    /// Raw state of cell `(i, j)`.
    #[must_use]
    pub fn state(&self, i: usize, j: usize) -> CellState {
        self.cells[self.index(i, j)]
    }

    /// True iff `(i, j)` is a live candidate.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.state(i, j) == CellState::Present
    }

    /// Marks `(i, j)` present.
    #[contracts::debug_ensures(self.get(i, j))]
    pub fn set(&mut self, i: usize, j: usize) {
        let idx = self.index(i, j);
        self.cells[idx] = CellState::Present;
    }

    /// Removes the live cell `(i, j)` on behalf of row `owner`.
    #[contracts::debug_requires(self.get(i, j), "only live cells are marked")]
    #[contracts::debug_ensures(self.state(i, j) == CellState::RemovedBy(owner))]
    pub fn mark(&mut self, i: usize, j: usize, owner: usize) {
        let idx = self.index(i, j);
        self.trail.push(Removal {
            row: i,
            col: j,
            owner,
            previous: self.cells[idx],
        });
        self.cells[idx] = CellState::RemovedBy(owner);
    }

    /// Removes every live cell of row `i` on behalf of `owner`.
    ///
    /// Cells that are absent or already removed by someone else are left
    /// alone, so each cell has at most one owner.
    #[contracts::debug_ensures(!self.has_candidate(i))]
    pub fn mark_row(&mut self, i: usize, owner: usize) {
        for j in 0..self.cols {
            if self.get(i, j) {
                self.mark(i, j, owner);
            }
        }
    }

    /// Restores every cell removed on behalf of `owner`.
    ///
    /// Those removals form the newest suffix of the trail, since commitments
    /// are undone in reverse order. They all lie in rows `i..`: the committed
    /// row itself plus the later rows its refinement touched.
    #[contracts::debug_ensures(self.owned_by(owner) == 0)]
    pub fn reset_rows(&mut self, i: usize, owner: usize) {
        while let Some(last) = self.trail.last().copied() {
            if last.owner != owner {
                break;
            }
            self.trail.pop();
            debug_assert!(last.row >= i, "row {} restored by row {i}", last.row);

            let idx = self.index(last.row, last.col);
            // The chosen column of a committed row is re-set after its row
            // was marked; it is already live.
            if self.cells[idx] == CellState::RemovedBy(owner) {
                self.cells[idx] = last.previous;
            }
        }
    }

    /// True if row `i` still has a live candidate.
    #[must_use]
    pub fn has_candidate(&self, i: usize) -> bool {
        self.row(i).iter().any(|&c| c == CellState::Present)
    }

    /// Live candidates of row `i`, ascending.
    pub fn candidates(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(i)
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == CellState::Present)
            .map(|(j, _)| j)
    }

    /// Number of live cells in the whole matrix.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == CellState::Present)
            .count()
    }

    /// Number of cells currently removed on behalf of `owner`.
    #[must_use]
    pub fn owned_by(&self, owner: usize) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == CellState::RemovedBy(owner))
            .count()
    }

    /// Length of the undo log.
    #[must_use]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    fn row(&self, i: usize) -> &[CellState] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }
}

impl fmt::Display for CompatibilityMatrix {
    /// One line per row: `1` live, `.` absent, `x` removed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for &cell in self.row(i) {
                let c = match cell {
                    CellState::Absent => '.',
                    CellState::Present => '1',
                    CellState::RemovedBy(_) => 'x',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(rows: usize, cols: usize) -> CompatibilityMatrix {
        let mut m = CompatibilityMatrix::new(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                m.set(i, j);
            }
        }
        m
    }

    #[test]
    fn new_matrix_is_empty() {
        let m = CompatibilityMatrix::new(2, 3);
        assert_eq!(m.live_count(), 0);
        assert!(!m.has_candidate(0));
        assert_eq!(m.state(1, 2), CellState::Absent);
    }

    #[test]
    fn mark_and_reset_single_cell() {
        let mut m = full(2, 2);
        let before = m.clone();
        m.mark(1, 0, 0);
        assert!(!m.get(1, 0));
        assert_eq!(m.state(1, 0), CellState::RemovedBy(0));
        assert_eq!(m.trail_len(), 1);
        m.reset_rows(0, 0);
        assert_eq!(m, before);
    }

    #[test]
    fn mark_row_skips_removed_and_absent_cells() {
        let mut m = CompatibilityMatrix::new(2, 3);
        m.set(1, 0);
        m.set(1, 1);
        m.set(1, 2);
        m.mark(1, 2, 0);
        m.mark_row(1, 1);

        assert_eq!(m.state(1, 0), CellState::RemovedBy(1));
        assert_eq!(m.state(1, 1), CellState::RemovedBy(1));
        assert_eq!(m.state(1, 2), CellState::RemovedBy(0));
        assert_eq!(m.state(0, 0), CellState::Absent);
    }

    #[test]
    fn reset_only_restores_own_cells() {
        let mut m = full(3, 3);
        m.mark_row(0, 0);
        m.set(0, 1);
        m.mark(1, 1, 0);
        let after_first = m.clone();

        m.mark_row(1, 1);
        m.set(1, 2);
        m.mark(2, 2, 1);
        assert_eq!(m.owned_by(1), 2);

        m.reset_rows(1, 1);
        assert_eq!(m, after_first);
        assert_eq!(m.state(1, 1), CellState::RemovedBy(0));

        m.reset_rows(0, 0);
        assert_eq!(m, full(3, 3));
    }

    #[test]
    fn candidates_are_ascending() {
        let mut m = full(1, 4);
        m.mark(0, 1, 0);
        assert_eq!(m.candidates(0).collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(m.to_string(), "1x11\n");
    }
}
