use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Number of rows and columns of the dot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

/// Which grid rows are traversed right to left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowReversal {
    #[default]
    None,
    /// Every odd row (counting from the bottom) runs right to left.
    Snake,
    Rows(BTreeSet<usize>),
}

impl RowReversal {
    pub fn is_reversed(&self, row: usize) -> bool {
        match self {
            RowReversal::None => false,
            RowReversal::Snake => row % 2 == 1,
            RowReversal::Rows(rows) => rows.contains(&row),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DotPlotSpec {
    pub class_labels: Vec<String>,
    pub proportions: HashMap<String, f64>,
    pub colors: Option<HashMap<String, String>>,
    pub grid: GridShape,
    pub reversed_rows: RowReversal,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub show_labels: bool,
    /// Figure size in inches; defaults to `(cols + 1, rows)`.
    pub figsize: Option<(f32, f32)>,
    /// Marker area in square points.
    pub dot_size: Option<f32>,
}

impl DotPlotSpec {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut class_labels = Vec::new();
        let mut proportions = HashMap::new();
        for (label, value) in entries {
            let label = label.into();
            proportions.insert(label.clone(), value);
            class_labels.push(label);
        }
        Self {
            class_labels,
            proportions,
            colors: None,
            grid: GridShape::default(),
            reversed_rows: RowReversal::None,
            title: None,
            caption: None,
            show_labels: false,
            figsize: None,
            dot_size: None,
        }
    }

    pub fn with_colors<I, K, V>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.colors = Some(
            colors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.grid = GridShape::new(rows, cols);
        self
    }

    pub fn with_reversed_rows(mut self, reversal: RowReversal) -> Self {
        self.reversed_rows = reversal;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    pub fn with_figsize(mut self, width: f32, height: f32) -> Self {
        self.figsize = Some((width, height));
        self
    }

    pub fn with_dot_size(mut self, dot_size: f32) -> Self {
        self.dot_size = Some(dot_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_label_order() {
        let spec = DotPlotSpec::new([("B", 20.0), ("A", 30.0)]).with_grid(5, 4);
        assert_eq!(spec.class_labels, vec!["B", "A"]);
        assert_eq!(spec.proportions["A"], 30.0);
        assert_eq!(spec.grid.capacity(), 20);
    }

    #[test]
    fn snake_reverses_odd_rows() {
        let reversal = RowReversal::Snake;
        assert!(!reversal.is_reversed(0));
        assert!(reversal.is_reversed(1));
        assert!(!reversal.is_reversed(4));

        let explicit = RowReversal::Rows([2, 5].into_iter().collect());
        assert!(explicit.is_reversed(2));
        assert!(!explicit.is_reversed(1));
    }
}
