use crate::error::DotPlotError;
use crate::ir::GridShape;

/// Dot ownership for every grid cell, in fill order.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Percentages after rescaling, one per class.
    pub percentages: Vec<f64>,
    pub counts: Vec<usize>,
    /// `Some(class index)` or `None` for filler, length `rows * cols`.
    pub cells: Vec<Option<usize>>,
}

impl Allocation {
    pub fn colored(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn filler(&self) -> usize {
        self.cells.len() - self.colored()
    }

    /// Color sequence for the cells, class colors indexed like `counts`.
    pub fn colors<'a>(&self, class_colors: &'a [String], filler: &'a str) -> Vec<&'a str> {
        self.cells
            .iter()
            .map(|cell| match cell {
                Some(idx) => class_colors[*idx].as_str(),
                None => filler,
            })
            .collect()
    }
}

/// Rescales to a total of 100 (rounded to two decimals) when the raw sum
/// exceeds 100; otherwise returns the values untouched.
pub fn normalize_percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 100.0 {
        return values.to_vec();
    }
    values
        .iter()
        .map(|value| round_two_decimals(100.0 * value / total))
        .collect()
}

// The formatter rounds the exact binary value, so 2.50499.. stays 2.5.
fn round_two_decimals(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

pub fn allocate_dots(values: &[f64], grid: GridShape) -> Result<Allocation, DotPlotError> {
    let capacity = grid.capacity();
    if capacity == 0 {
        return Err(DotPlotError::EmptyGrid {
            rows: grid.rows,
            cols: grid.cols,
        });
    }
    let total: f64 = values.iter().sum();
    if !total.is_finite() {
        return Err(DotPlotError::InvalidTotal { total });
    }
    let percentages = normalize_percentages(values);
    let dot_value = 100.0 / capacity as f64;
    let counts: Vec<usize> = percentages
        .iter()
        .map(|pc| (pc / dot_value).round_ties_even().max(0.0) as usize)
        .collect();

    let required: usize = counts.iter().sum();
    if required > capacity {
        return Err(DotPlotError::DotOverflow { required, capacity });
    }

    let mut cells = Vec::with_capacity(capacity);
    for (idx, count) in counts.iter().enumerate() {
        cells.extend(std::iter::repeat_n(Some(idx), *count));
    }
    cells.resize(capacity, None);

    tracing::debug!(?counts, filler = capacity - required, "allocated dots");

    Ok(Allocation {
        percentages,
        counts,
        cells,
    })
}
