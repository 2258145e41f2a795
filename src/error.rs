use crate::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DotPlotError {
    #[error("no classes to plot")]
    NoClasses,
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("duplicate class label '{label}'")]
    DuplicateLabel { label: String },
    #[error("class '{label}' has no proportion")]
    MissingProportion { label: String },
    #[error("class '{label}' has an invalid proportion ({value})")]
    InvalidProportion { label: String, value: f64 },
    #[error("proportions sum to {total}, which cannot be rescaled")]
    InvalidTotal { total: f64 },
    #[error(
        "there are {count} classes but only {max} default colors, consider reducing this for optimal visualisation or pass explicit colors"
    )]
    TooManyClasses { count: usize, max: usize },
    #[error("class '{label}' has no entry in the color mapping")]
    MissingColor { label: String },
    #[error(
        "proportions rounded to {required} dots but the grid only holds {capacity}, try manually providing percentages"
    )]
    DotOverflow { required: usize, capacity: usize },
    #[error("class '{label}' does not have a dot on the right hand side")]
    UnlabelledClass { label: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
}
