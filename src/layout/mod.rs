pub mod allocation;
pub mod grid;
pub mod labels;
mod text;
mod types;

use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::error::DotPlotError;
use crate::ir::{DotPlotSpec, GridShape};
use crate::theme::Theme;

pub use allocation::{Allocation, allocate_dots, normalize_percentages};
pub use grid::{CellPosition, cell_positions, rightmost_column};
pub use labels::{RowRange, check_unplotted_colors, label_segments, resolve_row_ranges};
pub use types::*;

use text::measure_text;

/// Validated classes in plotting order.
#[derive(Debug, Clone)]
struct ResolvedClasses {
    labels: Vec<String>,
    values: Vec<f64>,
    colors: Vec<String>,
}

fn resolve_classes(
    spec: &DotPlotSpec,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<ResolvedClasses, DotPlotError> {
    if spec.class_labels.is_empty() {
        return Err(DotPlotError::NoClasses);
    }
    let count = spec.class_labels.len();

    let colors = match &spec.colors {
        Some(map) => spec
            .class_labels
            .iter()
            .map(|label| {
                map.get(label)
                    .cloned()
                    .ok_or_else(|| DotPlotError::MissingColor {
                        label: label.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => {
            let max = config.max_classes_without_colors.min(theme.palette.len());
            if count > max {
                return Err(DotPlotError::TooManyClasses { count, max });
            }
            theme.palette[..count].to_vec()
        }
    };

    let mut seen = HashSet::new();
    let mut values = Vec::with_capacity(count);
    for label in &spec.class_labels {
        if !seen.insert(label.as_str()) {
            return Err(DotPlotError::DuplicateLabel {
                label: label.clone(),
            });
        }
        let value = *spec
            .proportions
            .get(label)
            .ok_or_else(|| DotPlotError::MissingProportion {
                label: label.clone(),
            })?;
        if !value.is_finite() || value < 0.0 {
            return Err(DotPlotError::InvalidProportion {
                label: label.clone(),
                value,
            });
        }
        values.push(value);
    }

    Ok(ResolvedClasses {
        labels: spec.class_labels.clone(),
        values,
        colors,
    })
}

/// Maps grid units (y up) to SVG pixels (y down).
#[derive(Debug, Clone, Copy)]
struct Transform {
    x_min: f32,
    y_max: f32,
    scale_x: f32,
    scale_y: f32,
}

impl Transform {
    fn new(grid: GridShape, figsize: (f32, f32), config: &LayoutConfig) -> Self {
        let margin = config.axis_margin;
        let x_min = -margin;
        let x_max = grid.cols as f32 + margin;
        let y_min = -margin;
        let y_max = grid.rows as f32 - 1.0 + margin;
        let axes_width = figsize.0 * config.dpi * config.axes_fraction_x;
        let axes_height = figsize.1 * config.dpi * config.axes_fraction_y;
        Self {
            x_min,
            y_max,
            scale_x: axes_width / (x_max - x_min),
            scale_y: axes_height / (y_max - y_min),
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.x_min) * self.scale_x, (self.y_max - y) * self.scale_y)
    }
}

pub fn compute_layout(
    spec: &DotPlotSpec,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Layout, DotPlotError> {
    let grid = spec.grid;
    if grid.rows == 0 || grid.cols == 0 {
        return Err(DotPlotError::EmptyGrid {
            rows: grid.rows,
            cols: grid.cols,
        });
    }
    let classes = resolve_classes(spec, theme, config)?;
    let allocation = allocate_dots(&classes.values, grid)?;
    let positions = cell_positions(grid, &spec.reversed_rows);

    let ranges = if spec.show_labels {
        let column = rightmost_column(&allocation.cells, &positions, grid);
        let ranges = resolve_row_ranges(&column, &classes.labels)?;
        if let Some(map) = &spec.colors {
            check_unplotted_colors(&column, &classes.labels, &classes.colors, map)?;
        }
        Some(ranges)
    } else {
        None
    };

    let figsize = spec
        .figsize
        .unwrap_or((grid.cols as f32 + 1.0, grid.rows as f32));
    let transform = Transform::new(grid, figsize, config);
    let pt = config.dpi / 72.0;
    let dot_size = spec.dot_size.unwrap_or(config.default_dot_size).max(0.0);
    let radius = dot_size.sqrt() / 2.0 * pt;
    let font_size = theme.font_size * pt;

    let mut bounds = Bounds::empty();

    let dots: Vec<DotLayout> = allocation
        .cells
        .iter()
        .zip(&positions)
        .map(|(owner, position)| {
            let (x, y) = transform.apply(position.col as f32, position.row as f32);
            bounds.include_point(x, y, radius);
            let color = match owner {
                Some(idx) => classes.colors[*idx].clone(),
                None => theme.filler_color.clone(),
            };
            DotLayout {
                position: *position,
                x,
                y,
                radius,
                class_index: *owner,
                color,
            }
        })
        .collect();

    let text_layout = |text: &str,
                       at: (f32, f32),
                       anchor: TextAnchor,
                       align: VerticalAlign,
                       size: f32,
                       color: &str| {
        let (x, y) = transform.apply(at.0, at.1);
        TextLayout {
            x,
            y,
            anchor,
            align,
            font_size: size,
            line_height: config.text_line_height,
            color: color.to_string(),
            block: measure_text(
                text,
                size,
                config.text_line_height,
                &theme.font_family,
                config.fast_text_metrics,
            ),
        }
    };

    let mut labels = Vec::new();
    if let Some(ranges) = ranges {
        let stroke_width = config.label_line_width * pt;
        for (idx, range) in ranges.into_iter().enumerate() {
            let segments: Vec<Vec<(f32, f32)>> =
                label_segments(range, grid.cols, config.dash_width)
                    .into_iter()
                    .map(|segment| {
                        segment
                            .into_iter()
                            .map(|(x, y)| transform.apply(x, y))
                            .collect()
                    })
                    .collect();
            for (x, y) in segments.iter().flatten() {
                bounds.include_point(*x, *y, stroke_width / 2.0);
            }
            let text = text_layout(
                &classes.labels[idx],
                (grid.cols as f32 + 2.0 * config.dash_width, range.mid()),
                TextAnchor::Start,
                VerticalAlign::Center,
                font_size,
                &classes.colors[idx],
            );
            bounds.include(text.bounds());
            labels.push(LabelLayout {
                class_index: idx,
                range,
                segments,
                stroke_width,
                text,
            });
        }
    }

    let title = spec.title.as_deref().map(|title| {
        let text = if theme.uppercase_title {
            title.to_uppercase()
        } else {
            title.to_string()
        };
        let layout = text_layout(
            &text,
            (
                (grid.cols as f32 - 1.0) / 2.0,
                grid.rows as f32 - 1.0 + config.title_offset,
            ),
            TextAnchor::Middle,
            VerticalAlign::Center,
            font_size,
            &theme.text_color,
        );
        bounds.include(layout.bounds());
        layout
    });

    let caption = spec.caption.as_deref().map(|caption| {
        let layout = text_layout(
            caption,
            (config.caption_x, config.caption_y),
            TextAnchor::Start,
            VerticalAlign::Top,
            theme.caption_font_size * pt,
            &theme.text_color,
        );
        bounds.include(layout.bounds());
        layout
    });

    let pad = config.pad_inches * config.dpi;
    let view_box = Bounds {
        min_x: bounds.min_x - pad,
        min_y: bounds.min_y - pad,
        max_x: bounds.max_x + pad,
        max_y: bounds.max_y + pad,
    };

    tracing::debug!(
        rows = grid.rows,
        cols = grid.cols,
        labels = labels.len(),
        width = view_box.width(),
        height = view_box.height(),
        "computed dot plot layout"
    );

    let class_layouts = classes
        .labels
        .into_iter()
        .zip(classes.colors)
        .enumerate()
        .map(|(idx, (label, color))| ClassLayout {
            label,
            color,
            percentage: allocation.percentages[idx],
            dots: allocation.counts[idx],
        })
        .collect();

    Ok(Layout {
        grid,
        view_box,
        classes: class_layouts,
        dots,
        labels,
        title,
        caption,
        filler_color: theme.filler_color.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RowReversal;

    fn config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    fn layout(spec: &DotPlotSpec) -> Result<Layout, DotPlotError> {
        compute_layout(spec, &Theme::classic(), &config())
    }

    #[test]
    fn even_split_has_no_filler() {
        let spec = DotPlotSpec::new([("A", 50.0), ("B", 50.0)]);
        let layout = layout(&spec).unwrap();
        assert_eq!(layout.dots.len(), 100);
        assert_eq!(layout.filler_dots(), 0);
        assert_eq!(layout.classes[0].dots, 50);
        assert_eq!(layout.classes[1].dots, 50);
        assert_eq!(layout.classes[0].color, "#1f77b4");
    }

    #[test]
    fn partial_split_pads_with_filler() {
        let spec = DotPlotSpec::new([("A", 30.0), ("B", 30.0)]);
        let layout = layout(&spec).unwrap();
        assert_eq!(layout.filler_dots(), 40);
        let colors = layout.colors();
        assert_eq!(colors.iter().filter(|c| **c == "silver").count(), 40);
    }

    #[test]
    fn too_many_classes_without_colors() {
        let entries: Vec<(String, f64)> = (0..11).map(|i| (format!("c{i}"), 1.0)).collect();
        let err = layout(&DotPlotSpec::new(entries.clone())).unwrap_err();
        assert!(matches!(err, DotPlotError::TooManyClasses { count: 11, max: 10 }));

        let colors: Vec<(String, String)> = entries
            .iter()
            .map(|(label, _)| (label.clone(), "black".to_string()))
            .collect();
        let spec = DotPlotSpec::new(entries).with_colors(colors);
        assert!(layout(&spec).is_ok());
    }

    #[test]
    fn ten_classes_use_the_whole_palette() {
        let entries: Vec<(String, f64)> = (0..10).map(|i| (format!("c{i}"), 10.0)).collect();
        let layout = layout(&DotPlotSpec::new(entries)).unwrap();
        assert_eq!(layout.classes[9].color, "#17becf");
    }

    #[test]
    fn missing_inputs_are_reported() {
        let mut spec = DotPlotSpec::new([("A", 10.0)]);
        spec.class_labels.push("B".to_string());
        assert!(matches!(
            layout(&spec).unwrap_err(),
            DotPlotError::MissingProportion { label } if label == "B"
        ));

        let spec = DotPlotSpec::new([("A", 10.0), ("B", 5.0)]).with_colors([("A", "red")]);
        assert!(matches!(
            layout(&spec).unwrap_err(),
            DotPlotError::MissingColor { label } if label == "B"
        ));

        let spec = DotPlotSpec::new([("A", -1.0)]);
        assert!(matches!(
            layout(&spec).unwrap_err(),
            DotPlotError::InvalidProportion { .. }
        ));

        let spec = DotPlotSpec::new([("A", 10.0), ("A", 5.0)]);
        assert!(matches!(
            layout(&spec).unwrap_err(),
            DotPlotError::DuplicateLabel { .. }
        ));

        let spec = DotPlotSpec::new(Vec::<(String, f64)>::new());
        assert!(matches!(layout(&spec).unwrap_err(), DotPlotError::NoClasses));
    }

    #[test]
    fn labels_follow_rightmost_column() {
        let spec = DotPlotSpec::new([("A", 50.0), ("B", 50.0)]).with_labels(true);
        let layout = layout(&spec).unwrap();
        assert_eq!(layout.labels.len(), 2);
        assert_eq!(layout.labels[0].range, RowRange { start: 0, end: 4 });
        assert_eq!(layout.labels[1].range, RowRange { start: 5, end: 9 });
        assert_eq!(layout.labels[0].segments.len(), 2);
        // Labels sit to the right of every dot.
        let max_dot_x = layout.dots.iter().map(|d| d.x).fold(f32::MIN, f32::max);
        assert!(layout.labels[0].text.x > max_dot_x);
        // Row 0 is drawn at the bottom.
        assert!(layout.labels[0].text.y > layout.labels[1].text.y);
    }

    #[test]
    fn zero_dot_class_cannot_be_labelled() {
        let spec = DotPlotSpec::new([("A", 50.0), ("B", 0.2), ("C", 40.0)]).with_labels(true);
        match layout(&spec).unwrap_err() {
            DotPlotError::UnlabelledClass { label } => assert_eq!(label, "B"),
            other => panic!("unexpected error: {other}"),
        }
        // Without labels the same plot is fine.
        let spec = DotPlotSpec::new([("A", 50.0), ("B", 0.2), ("C", 40.0)]);
        assert!(layout(&spec).is_ok());
    }

    #[test]
    fn labelled_color_map_entries_must_be_plotted() {
        let spec = DotPlotSpec::new([("A", 50.0), ("B", 50.0)])
            .with_colors([("A", "red"), ("B", "blue"), ("C", "green")])
            .with_labels(true);
        match layout(&spec).unwrap_err() {
            DotPlotError::UnlabelledClass { label } => assert_eq!(label, "C"),
            other => panic!("unexpected error: {other}"),
        }
        // Without labels the extra entry is harmless.
        assert!(layout(&spec.with_labels(false)).is_ok());
    }

    #[test]
    fn snake_keeps_counts() {
        let plain = layout(&DotPlotSpec::new([("A", 35.0), ("B", 45.0)])).unwrap();
        let snake = layout(
            &DotPlotSpec::new([("A", 35.0), ("B", 45.0)]).with_reversed_rows(RowReversal::Snake),
        )
        .unwrap();
        assert_eq!(plain.classes[0].dots, snake.classes[0].dots);
        assert_eq!(plain.filler_dots(), snake.filler_dots());
        // Cell 10 starts row 1, which runs right to left under snake.
        assert_eq!(plain.dots[10].position.col, 0);
        assert_eq!(snake.dots[10].position.col, 9);
    }

    #[test]
    fn title_and_caption_extend_view_box() {
        let bare = layout(&DotPlotSpec::new([("A", 50.0)])).unwrap();
        let dressed = layout(
            &DotPlotSpec::new([("A", 50.0)])
                .with_title("Share")
                .with_caption("Source: survey"),
        )
        .unwrap();
        let title = dressed.title.as_ref().unwrap();
        assert_eq!(title.block.lines, vec!["SHARE".to_string()]);
        assert!(dressed.height() > bare.height());
        assert!(dressed.view_box.min_y < bare.view_box.min_y);
        assert!(dressed.view_box.max_y > bare.view_box.max_y);
    }

    #[test]
    fn dot_size_sets_radius() {
        let spec = DotPlotSpec::new([("A", 50.0)]).with_dot_size(400.0);
        let layout = layout(&spec).unwrap();
        assert!((layout.dots[0].radius - 10.0).abs() < 1e-4);
    }
}
