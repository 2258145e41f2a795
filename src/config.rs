use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Pixels per inch of the SVG canvas. 72 makes one pixel one point.
    pub dpi: f32,
    /// Data-space margin around the grid on every side.
    pub axis_margin: f32,
    /// Fraction of the figure width/height covered by the plotting area.
    pub axes_fraction_x: f32,
    pub axes_fraction_y: f32,
    pub default_dot_size: f32,
    /// Length of a label bracket dash, in grid units.
    pub dash_width: f32,
    pub label_line_width: f32,
    pub title_offset: f32,
    pub caption_x: f32,
    pub caption_y: f32,
    pub text_line_height: f32,
    /// Padding around the tight bounding box, in inches.
    pub pad_inches: f32,
    pub max_classes_without_colors: usize,
    /// Use the per-character width table instead of loading fonts.
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dpi: 72.0,
            axis_margin: 0.8,
            axes_fraction_x: 0.775,
            axes_fraction_y: 0.77,
            default_dot_size: 1000.0,
            dash_width: 0.3,
            label_line_width: 1.5,
            title_offset: 1.0,
            caption_x: -0.35,
            caption_y: -0.7,
            text_line_height: 1.2,
            pad_inches: 0.1,
            max_classes_without_colors: 10,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub png_dpi: f32,
    pub png_font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            png_dpi: 500.0,
            png_font_family: "DejaVu Serif".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    caption_font_size: Option<NumberOrString>,
    text_color: Option<String>,
    filler_color: Option<String>,
    background: Option<String>,
    palette: Option<Vec<String>>,
    uppercase_title: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    dpi: Option<NumberOrString>,
    axis_margin: Option<NumberOrString>,
    default_dot_size: Option<NumberOrString>,
    dash_width: Option<NumberOrString>,
    label_line_width: Option<NumberOrString>,
    pad_inches: Option<NumberOrString>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    png_dpi: Option<NumberOrString>,
    png_font_family: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme name, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size
            && let Some(size) = v.as_f32()
        {
            config.theme.font_size = size;
        }
        if let Some(v) = vars.caption_font_size
            && let Some(size) = v.as_f32()
        {
            config.theme.caption_font_size = size;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.filler_color {
            config.theme.filler_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = match v.as_str() {
                "" | "transparent" | "none" => None,
                _ => Some(v),
            };
        }
        if let Some(v) = vars.palette
            && !v.is_empty()
        {
            config.theme.palette = v;
        }
        if let Some(v) = vars.uppercase_title {
            config.theme.uppercase_title = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.dpi.and_then(|v| v.as_f32()) {
            config.layout.dpi = v;
        }
        if let Some(v) = layout.axis_margin.and_then(|v| v.as_f32()) {
            config.layout.axis_margin = v;
        }
        if let Some(v) = layout.default_dot_size.and_then(|v| v.as_f32()) {
            config.layout.default_dot_size = v;
        }
        if let Some(v) = layout.dash_width.and_then(|v| v.as_f32()) {
            config.layout.dash_width = v;
        }
        if let Some(v) = layout.label_line_width.and_then(|v| v.as_f32()) {
            config.layout.label_line_width = v;
        }
        if let Some(v) = layout.pad_inches.and_then(|v| v.as_f32()) {
            config.layout.pad_inches = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.png_dpi.and_then(|v| v.as_f32()) {
            config.render.png_dpi = v;
        }
        if let Some(v) = render.png_font_family {
            config.render.png_font_family = v;
        }
    }

    Ok(config)
}
