use crate::ir::{DotPlotSpec, GridShape, RowReversal};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

static CLASS_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<label>[^=]+?)\s*=\s*(?P<value>[-+]?(?:\d+\.?\d*|\.\d+))\s*(?::\s*(?P<color>\S+))?\s*$")
        .unwrap()
});
static GRID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*[xX,]\s*(\d+)\s*$").unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid dot plot document: {0}")]
    Document(String),
    #[error("invalid class entry '{0}', expected LABEL=VALUE or LABEL=VALUE:COLOR")]
    ClassEntry(String),
    #[error("invalid grid '{0}', expected ROWSxCOLS")]
    Grid(String),
    #[error("invalid row list '{0}', expected comma separated row numbers")]
    RowList(String),
    #[error("invalid row reversal '{0}', expected \"snake\", \"none\" or a list of rows")]
    Reversal(String),
    #[error("`data` is an object, so `classLabels` must give the class order")]
    MissingClassLabels,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SpecDocument {
    class_labels: Option<Vec<String>>,
    data: DataField,
    colors: Option<HashMap<String, String>>,
    grid: Option<GridField>,
    reversed_rows: Option<ReversalField>,
    title: Option<String>,
    caption: Option<String>,
    labels: Option<bool>,
    figsize: Option<[f32; 2]>,
    dot_size: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataField {
    Map(HashMap<String, f64>),
    List(Vec<ClassEntry>),
}

#[derive(Debug, Deserialize)]
struct ClassEntry {
    label: String,
    value: f64,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GridField {
    Pair([usize; 2]),
    Shape { rows: usize, cols: usize },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReversalField {
    Name(String),
    Rows(Vec<usize>),
}

/// Parses a JSON or JSON5 dot plot document.
pub fn parse_spec(input: &str) -> Result<DotPlotSpec, ParseError> {
    let doc: SpecDocument =
        json5::from_str(input).map_err(|err| ParseError::Document(err.to_string()))?;

    let (mut spec, entry_colors) = match doc.data {
        DataField::Map(values) => {
            let labels = doc.class_labels.ok_or(ParseError::MissingClassLabels)?;
            let mut spec = DotPlotSpec::new(Vec::<(String, f64)>::new());
            spec.class_labels = labels;
            spec.proportions = values;
            (spec, HashMap::new())
        }
        DataField::List(entries) => {
            let mut colors = HashMap::new();
            let mut pairs = Vec::with_capacity(entries.len());
            for entry in entries {
                if let Some(color) = entry.color {
                    colors.insert(entry.label.clone(), color);
                }
                pairs.push((entry.label, entry.value));
            }
            if !colors.is_empty() && colors.len() != pairs.len() {
                tracing::warn!("some classes have no color, falling back to the palette for all");
                colors.clear();
            }
            let mut spec = DotPlotSpec::new(pairs);
            if let Some(labels) = doc.class_labels {
                spec.class_labels = labels;
            }
            (spec, colors)
        }
    };

    let mut colors = doc.colors.unwrap_or_default();
    for (label, color) in entry_colors {
        colors.entry(label).or_insert(color);
    }
    if !colors.is_empty() {
        spec.colors = Some(colors);
    }

    spec.grid = match doc.grid {
        Some(GridField::Pair([rows, cols])) | Some(GridField::Shape { rows, cols }) => {
            GridShape::new(rows, cols)
        }
        None => GridShape::default(),
    };
    spec.reversed_rows = match doc.reversed_rows {
        None => RowReversal::None,
        Some(ReversalField::Rows(rows)) => RowReversal::Rows(rows.into_iter().collect()),
        Some(ReversalField::Name(name)) => parse_reversal(&name)?,
    };
    spec.title = doc.title;
    spec.caption = doc.caption;
    spec.show_labels = doc.labels.unwrap_or(false);
    spec.figsize = doc.figsize.map(|[w, h]| (w, h));
    spec.dot_size = doc.dot_size;

    tracing::debug!(classes = spec.class_labels.len(), "parsed dot plot document");
    Ok(spec)
}

/// Parses `"A=50,B=30:#d62728"` into ordered classes with optional colors.
///
/// Colors are only kept when every entry names one.
pub fn parse_data_shorthand(input: &str) -> Result<DotPlotSpec, ParseError> {
    let mut pairs = Vec::new();
    let mut colors = Vec::new();
    for item in input.split(',').filter(|item| !item.trim().is_empty()) {
        let caps = CLASS_ENTRY_RE
            .captures(item)
            .ok_or_else(|| ParseError::ClassEntry(item.trim().to_string()))?;
        let label = caps["label"].to_string();
        let value: f64 = caps["value"]
            .parse()
            .map_err(|_| ParseError::ClassEntry(item.trim().to_string()))?;
        if let Some(color) = caps.name("color") {
            colors.push((label.clone(), color.as_str().to_string()));
        }
        pairs.push((label, value));
    }
    if pairs.is_empty() {
        return Err(ParseError::ClassEntry(input.to_string()));
    }

    let complete = colors.len() == pairs.len();
    if !colors.is_empty() && !complete {
        tracing::warn!("some classes have no color, falling back to the palette for all");
    }
    let spec = DotPlotSpec::new(pairs);
    Ok(if complete { spec.with_colors(colors) } else { spec })
}

pub fn parse_grid(input: &str) -> Result<GridShape, ParseError> {
    let caps = GRID_RE
        .captures(input)
        .ok_or_else(|| ParseError::Grid(input.to_string()))?;
    let rows = caps[1]
        .parse()
        .map_err(|_| ParseError::Grid(input.to_string()))?;
    let cols = caps[2]
        .parse()
        .map_err(|_| ParseError::Grid(input.to_string()))?;
    Ok(GridShape::new(rows, cols))
}

pub fn parse_row_list(input: &str) -> Result<BTreeSet<usize>, ParseError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| ParseError::RowList(input.to_string()))
        })
        .collect()
}

pub fn parse_reversal(input: &str) -> Result<RowReversal, ParseError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "snake" => Ok(RowReversal::Snake),
        "none" | "" => Ok(RowReversal::None),
        _ => parse_row_list(input)
            .map(RowReversal::Rows)
            .map_err(|_| ParseError::Reversal(input.to_string())),
    }
}
