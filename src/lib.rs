pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::DotPlotError;
pub use ir::{DotPlotSpec, GridShape, RowReversal};
pub use layout::{
    Allocation, Layout, RowRange, allocate_dots, cell_positions, compute_layout,
    resolve_row_ranges,
};
pub use parser::{ParseError, parse_data_shorthand, parse_spec};
pub use render::{render_svg, write_output_svg};
pub use theme::Theme;

#[cfg(feature = "png")]
pub use render::write_output_png;

/// Theme and layout settings for one-call rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Lays out and renders a dot plot to an SVG string.
pub fn render(spec: &DotPlotSpec, options: &RenderOptions) -> Result<String, DotPlotError> {
    let layout = compute_layout(spec, &options.theme, &options.layout)?;
    Ok(render_svg(&layout, &options.theme))
}

/// Parses a JSON/JSON5 dot plot document and renders it to SVG.
pub fn render_document(input: &str, options: &RenderOptions) -> Result<String, DotPlotError> {
    let spec = parse_spec(input)?;
    render(&spec, options)
}
