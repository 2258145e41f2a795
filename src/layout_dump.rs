use crate::layout::{Layout, RowRange};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub rows: usize,
    pub cols: usize,
    pub width: f32,
    pub height: f32,
    pub filler_color: String,
    pub filler_dots: usize,
    pub classes: Vec<ClassDump>,
    pub cells: Vec<CellDump>,
    pub labels: Vec<LabelDump>,
    pub title: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassDump {
    pub label: String,
    pub color: String,
    pub percentage: f64,
    pub dots: usize,
}

#[derive(Debug, Serialize)]
pub struct CellDump {
    pub row: usize,
    pub col: usize,
    pub class: Option<String>,
    pub color: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub class: String,
    pub rows: RowRange,
    pub text_x: f32,
    pub text_y: f32,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let classes = layout
            .classes
            .iter()
            .map(|class| ClassDump {
                label: class.label.clone(),
                color: class.color.clone(),
                percentage: class.percentage,
                dots: class.dots,
            })
            .collect();

        let cells = layout
            .dots
            .iter()
            .map(|dot| CellDump {
                row: dot.position.row,
                col: dot.position.col,
                class: dot
                    .class_index
                    .map(|idx| layout.classes[idx].label.clone()),
                color: dot.color.clone(),
                x: dot.x,
                y: dot.y,
            })
            .collect();

        let labels = layout
            .labels
            .iter()
            .map(|label| LabelDump {
                class: layout.classes[label.class_index].label.clone(),
                rows: label.range,
                text_x: label.text.x,
                text_y: label.text.y,
            })
            .collect();

        LayoutDump {
            rows: layout.grid.rows,
            cols: layout.grid.cols,
            width: layout.width(),
            height: layout.height(),
            filler_color: layout.filler_color.clone(),
            filler_dots: layout.filler_dots(),
            classes,
            cells,
            labels,
            title: layout.title.as_ref().map(|t| t.block.lines.join("\n")),
            caption: layout.caption.as_ref().map(|c| c.block.lines.join("\n")),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    tracing::debug!(path = %path.display(), "wrote layout dump");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::DotPlotSpec;
    use crate::layout::compute_layout;
    use crate::theme::Theme;

    #[test]
    fn dump_names_cell_owners() {
        let spec = DotPlotSpec::new([("A", 2.0), ("B", 1.0)])
            .with_grid(1, 4)
            .with_labels(true);
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        // 1x4 grid: each dot is worth 25%, so neither class gets a dot.
        assert!(compute_layout(&spec, &Theme::classic(), &config).is_err());

        let spec = DotPlotSpec::new([("A", 50.0), ("B", 50.0)]).with_grid(2, 2).with_labels(true);
        let layout = compute_layout(&spec, &Theme::classic(), &config).unwrap();
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.cells.len(), 4);
        assert_eq!(dump.cells[0].class.as_deref(), Some("A"));
        assert_eq!(dump.cells[3].class.as_deref(), Some("B"));
        assert_eq!(dump.labels[1].rows, RowRange::single(1));

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["classes"][0]["dots"], 2);
        assert_eq!(json["labels"][0]["rows"]["start"], 0);
    }
}
