use crate::layout::{Layout, TextAnchor, TextLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::{LayoutConfig, RenderConfig};

pub fn render_svg(layout: &Layout, theme: &Theme) -> String {
    let mut svg = String::new();
    let vb = layout.view_box;
    let width = layout.width().max(1.0);
    let height = layout.height().max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{:.2} {:.2} {width:.2} {height:.2}\">",
        vb.min_x, vb.min_y,
    ));

    if let Some(background) = &theme.background {
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
            vb.min_x,
            vb.min_y,
            escape_xml(background)
        ));
    }

    svg.push_str("<g class=\"dots\">");
    for dot in &layout.dots {
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
            dot.x,
            dot.y,
            dot.radius,
            escape_xml(&dot.color)
        ));
    }
    svg.push_str("</g>");

    if !layout.labels.is_empty() {
        svg.push_str("<g class=\"labels\">");
        for label in &layout.labels {
            let color = escape_xml(&layout.classes[label.class_index].color);
            for segment in &label.segments {
                svg.push_str(&format!(
                    "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-linecap=\"square\"/>",
                    points_attr(segment),
                    color,
                    label.stroke_width
                ));
            }
            svg.push_str(&text_svg(&label.text, &theme.font_family));
        }
        svg.push_str("</g>");
    }

    if let Some(title) = &layout.title {
        svg.push_str(&text_svg(title, &theme.font_family));
    }
    if let Some(caption) = &layout.caption {
        svg.push_str(&text_svg(caption, &theme.font_family));
    }

    svg.push_str("</svg>");
    tracing::debug!(bytes = svg.len(), dots = layout.dots.len(), "rendered svg");
    svg
}

fn points_attr(points: &[(f32, f32)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_svg(text: &TextLayout, font_family: &str) -> String {
    let anchor = match text.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
    };
    let mut out = format!(
        "<text text-anchor=\"{anchor}\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\">",
        escape_xml(font_family),
        text.font_size,
        escape_xml(&text.color)
    );
    for (line, y) in text.block.lines.iter().zip(text.line_centers()) {
        out.push_str(&format!(
            "<tspan x=\"{:.2}\" y=\"{y:.2}\">{}</tspan>",
            text.x,
            escape_xml(line)
        ));
    }
    out.push_str("</text>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            tracing::debug!(path = %path.display(), "wrote svg");
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

/// Rasterizes the SVG at `render_cfg.png_dpi`.
#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    layout_cfg: &LayoutConfig,
) -> Result<()> {
    let mut opt = usvg::Options {
        font_family: render_cfg.png_font_family.clone(),
        ..usvg::Options::default()
    };
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = (render_cfg.png_dpi / layout_cfg.dpi.max(1.0)).max(0.01);
    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate {width}x{height} pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    tracing::debug!(path = %output.display(), width, height, "wrote png");
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::DotPlotSpec;
    use crate::layout::compute_layout;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn render_svg_basic() {
        let spec = DotPlotSpec::new([("Alpha", 30.0), ("Beta & Co", 30.0)])
            .with_labels(true)
            .with_title("Shares")
            .with_caption("Source: <survey>");
        let theme = Theme::classic();
        let layout = compute_layout(&spec, &theme, &fast_config()).unwrap();
        let svg = render_svg(&layout, &theme);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 100);
        assert_eq!(svg.matches("fill=\"silver\"").count(), 40);
        assert!(svg.contains("Beta &amp; Co"));
        assert!(svg.contains("Source: &lt;survey&gt;"));
        assert!(svg.contains(">SHARES<"));
        // Classic theme is transparent.
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn background_rect_when_themed() {
        let spec = DotPlotSpec::new([("A", 10.0)]);
        let theme = Theme::modern();
        let layout = compute_layout(&spec, &theme, &fast_config()).unwrap();
        let svg = render_svg(&layout, &theme);
        assert!(svg.contains("<rect"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn points_are_space_separated() {
        assert_eq!(points_attr(&[(1.0, 2.0), (3.5, 4.25)]), "1.00,2.00 3.50,4.25");
    }
}
