use dotplot_rs::{RenderOptions, render_document};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DotPlotRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    fast_text: Option<bool>,
}

fn build_render_options(options: DotPlotRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    // There are no system fonts to measure against inside a browser.
    render_options.layout.fast_text_metrics = options.fast_text.unwrap_or(true);

    render_options
}

#[wasm_bindgen(js_name = renderDotPlot)]
pub fn render_dot_plot_svg(document: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<DotPlotRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        DotPlotRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_document(document, &render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}
