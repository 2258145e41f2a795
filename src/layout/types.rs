use crate::ir::GridShape;

use super::grid::CellPosition;
use super::labels::RowRange;

#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Center,
    Top,
}

#[derive(Debug, Clone)]
pub struct TextLayout {
    pub x: f32,
    pub y: f32,
    pub anchor: TextAnchor,
    pub align: VerticalAlign,
    pub font_size: f32,
    pub line_height: f32,
    pub color: String,
    pub block: TextBlock,
}

impl TextLayout {
    pub fn bounds(&self) -> Bounds {
        let min_x = match self.anchor {
            TextAnchor::Start => self.x,
            TextAnchor::Middle => self.x - self.block.width / 2.0,
        };
        let min_y = match self.align {
            VerticalAlign::Center => self.y - self.block.height / 2.0,
            VerticalAlign::Top => self.y,
        };
        Bounds {
            min_x,
            min_y,
            max_x: min_x + self.block.width,
            max_y: min_y + self.block.height,
        }
    }

    /// Vertical center of each line, for `dominant-baseline: central`.
    pub fn line_centers(&self) -> Vec<f32> {
        let top = self.bounds().min_y;
        let step = self.font_size * self.line_height;
        (0..self.block.lines.len())
            .map(|idx| top + step * (idx as f32 + 0.5))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    pub fn include(&mut self, other: Bounds) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn include_point(&mut self, x: f32, y: f32, pad: f32) {
        self.include(Bounds {
            min_x: x - pad,
            min_y: y - pad,
            max_x: x + pad,
            max_y: y + pad,
        });
    }

    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.max_y - self.min_y).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct DotLayout {
    pub position: CellPosition,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// `None` for filler dots.
    pub class_index: Option<usize>,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct ClassLayout {
    pub label: String,
    pub color: String,
    pub percentage: f64,
    pub dots: usize,
}

#[derive(Debug, Clone)]
pub struct LabelLayout {
    pub class_index: usize,
    pub range: RowRange,
    pub segments: Vec<Vec<(f32, f32)>>,
    pub stroke_width: f32,
    pub text: TextLayout,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: GridShape,
    /// Tight view box of the drawing, in SVG pixels.
    pub view_box: Bounds,
    pub classes: Vec<ClassLayout>,
    pub dots: Vec<DotLayout>,
    pub labels: Vec<LabelLayout>,
    pub title: Option<TextLayout>,
    pub caption: Option<TextLayout>,
    pub filler_color: String,
}

impl Layout {
    pub fn width(&self) -> f32 {
        self.view_box.width()
    }

    pub fn height(&self) -> f32 {
        self.view_box.height()
    }

    pub fn filler_dots(&self) -> usize {
        self.dots.iter().filter(|dot| dot.class_index.is_none()).count()
    }

    /// Fill-order color sequence, one entry per cell.
    pub fn colors(&self) -> Vec<&str> {
        self.dots.iter().map(|dot| dot.color.as_str()).collect()
    }
}
