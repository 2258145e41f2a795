use crate::error::DotPlotError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Inclusive span of grid rows in the rightmost column owned by one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn single(row: usize) -> Self {
        Self {
            start: row,
            end: row,
        }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn mid(&self) -> f32 {
        0.5 * self.start as f32 + 0.5 * self.end as f32
    }
}

/// Groups the rightmost column (bottom row first) into one range per class.
///
/// Fails with [`DotPlotError::UnlabelledClass`] for the first class that owns
/// no cell in the column.
pub fn resolve_row_ranges(
    column: &[Option<usize>],
    class_labels: &[String],
) -> Result<Vec<RowRange>, DotPlotError> {
    let mut ranges: Vec<Option<RowRange>> = vec![None; class_labels.len()];
    for (row, owner) in column.iter().enumerate() {
        let Some(idx) = *owner else {
            continue;
        };
        let Some(slot) = ranges.get_mut(idx) else {
            continue;
        };
        match slot {
            Some(range) => {
                if range.end + 1 != row {
                    tracing::warn!(
                        label = class_labels[idx].as_str(),
                        row,
                        "class is split in the rightmost column, widening its label range"
                    );
                }
                range.end = row;
            }
            None => *slot = Some(RowRange::single(row)),
        }
    }

    ranges
        .into_iter()
        .zip(class_labels)
        .map(|(range, label)| {
            range.ok_or_else(|| DotPlotError::UnlabelledClass {
                label: label.clone(),
            })
        })
        .collect()
}

/// Checks color-map entries that name no plotted class: each one still needs
/// its color somewhere in the rightmost column, or it cannot be labelled.
pub fn check_unplotted_colors(
    column: &[Option<usize>],
    class_labels: &[String],
    class_colors: &[String],
    color_map: &HashMap<String, String>,
) -> Result<(), DotPlotError> {
    let present: HashSet<&str> = column
        .iter()
        .flatten()
        .map(|idx| class_colors[*idx].as_str())
        .collect();
    let mut extra: Vec<(&String, &String)> = color_map
        .iter()
        .filter(|(label, _)| !class_labels.contains(*label))
        .collect();
    extra.sort();
    for (label, color) in extra {
        if !present.contains(color.as_str()) {
            return Err(DotPlotError::UnlabelledClass {
                label: label.clone(),
            });
        }
    }
    Ok(())
}

/// Bracket and dash polylines for a label, in grid units.
pub fn label_segments(range: RowRange, cols: usize, dash_width: f32) -> Vec<Vec<(f32, f32)>> {
    let x = cols as f32;
    let start = range.start as f32;
    let end = range.end as f32;
    if range.is_single() {
        return vec![vec![(x - dash_width, start), (x + dash_width, start)]];
    }
    let mid = range.mid();
    vec![
        vec![
            (x - dash_width, start),
            (x, start),
            (x, end),
            (x - dash_width, end),
        ],
        vec![(x, mid), (x + dash_width, mid)],
    ]
}
