use crate::text_metrics;

use super::TextBlock;

pub(super) fn measure_text(
    text: &str,
    font_size: f32,
    line_height: f32,
    font_family: &str,
    fast_metrics: bool,
) -> TextBlock {
    let mut lines: Vec<String> = text.lines().map(|line| line.to_string()).collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines
        .iter()
        .map(|line| text_width(line, font_size, font_family, fast_metrics))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if !fast_metrics
        && let Some(width) = text_metrics::measure_text_width(text, font_size, font_family)
    {
        return width;
    }
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

fn char_width_factor(ch: char) -> f32 {
    // Approximate advances of a Times-like serif face, in ems.
    match ch {
        ' ' => 0.25,
        '.' | ',' | ':' | ';' | '|' | '!' | '\'' | 'i' | 'j' | 'l' => 0.28,
        '(' | ')' | '[' | ']' | 'f' | 't' | 'r' | 'I' => 0.33,
        'm' | 'M' | 'W' => 0.89,
        'w' => 0.72,
        '%' => 0.83,
        '0'..='9' => 0.5,
        'A'..='Z' => 0.68,
        'a'..='z' => 0.47,
        _ if ch.is_whitespace() => 0.25,
        _ => 0.6,
    }
}
