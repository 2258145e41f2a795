use crate::ir::{GridShape, RowReversal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    /// Row 0 is the bottom row.
    pub row: usize,
    pub col: usize,
}

/// Grid position of each cell in fill order. Rows are filled bottom-up;
/// reversed rows run right to left.
pub fn cell_positions(grid: GridShape, reversal: &RowReversal) -> Vec<CellPosition> {
    if let RowReversal::Rows(rows) = reversal {
        for row in rows.iter().filter(|row| **row >= grid.rows) {
            tracing::warn!(row, rows = grid.rows, "ignoring reversed row outside the grid");
        }
    }

    let mut positions = Vec::with_capacity(grid.capacity());
    for row in 0..grid.rows {
        let reversed = reversal.is_reversed(row);
        for step in 0..grid.cols {
            let col = if reversed { grid.cols - 1 - step } else { step };
            positions.push(CellPosition { row, col });
        }
    }
    positions
}

/// Owners of the rightmost-column cells, ordered by row from the bottom.
pub fn rightmost_column(
    cells: &[Option<usize>],
    positions: &[CellPosition],
    grid: GridShape,
) -> Vec<Option<usize>> {
    let mut column = vec![None; grid.rows];
    for (cell, pos) in cells.iter().zip(positions) {
        if pos.col + 1 == grid.cols {
            column[pos.row] = *cell;
        }
    }
    column
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_fill_left_to_right_by_default() {
        let positions = cell_positions(GridShape::new(2, 3), &RowReversal::None);
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0], CellPosition { row: 0, col: 0 });
        assert_eq!(positions[2], CellPosition { row: 0, col: 2 });
        assert_eq!(positions[3], CellPosition { row: 1, col: 0 });
    }

    #[test]
    fn snake_mirrors_odd_rows() {
        let positions = cell_positions(GridShape::new(3, 3), &RowReversal::Snake);
        let cols: Vec<usize> = positions.iter().map(|p| p.col).collect();
        assert_eq!(cols, vec![0, 1, 2, 2, 1, 0, 0, 1, 2]);
    }

    #[test]
    fn explicit_rows_ignore_out_of_range() {
        let reversal = RowReversal::Rows([0, 7].into_iter().collect());
        let positions = cell_positions(GridShape::new(2, 2), &reversal);
        let cols: Vec<usize> = positions.iter().map(|p| p.col).collect();
        assert_eq!(cols, vec![1, 0, 0, 1]);
    }

    #[test]
    fn rightmost_column_follows_reversal() {
        let grid = GridShape::new(2, 3);
        // Class 0 owns the first four cells in fill order.
        let cells = vec![Some(0), Some(0), Some(0), Some(0), Some(1), None];
        let plain = cell_positions(grid, &RowReversal::None);
        assert_eq!(rightmost_column(&cells, &plain, grid), vec![Some(0), None]);

        let snake = cell_positions(grid, &RowReversal::Snake);
        assert_eq!(rightmost_column(&cells, &snake, grid), vec![Some(0), Some(0)]);
    }
}
