use serde::{Deserialize, Serialize};

/// matplotlib's "tab10" qualitative palette.
pub const TAB10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub caption_font_size: f32,
    pub text_color: String,
    pub filler_color: String,
    /// `None` keeps the canvas transparent.
    pub background: Option<String>,
    pub palette: Vec<String>,
    pub uppercase_title: bool,
}

impl Theme {
    /// Serif grey text on a transparent canvas.
    pub fn classic() -> Self {
        Self {
            font_family: "\"DejaVu Serif\", \"Times New Roman\", serif".to_string(),
            font_size: 16.0,
            caption_font_size: 11.0,
            text_color: "grey".to_string(),
            filler_color: "silver".to_string(),
            background: None,
            palette: TAB10.iter().map(|c| c.to_string()).collect(),
            uppercase_title: true,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            caption_font_size: 11.0,
            text_color: "#4A5568".to_string(),
            filler_color: "#E2E8F0".to_string(),
            background: Some("#FFFFFF".to_string()),
            palette: vec![
                "#4C78A8".to_string(),
                "#F58518".to_string(),
                "#54A24B".to_string(),
                "#E45756".to_string(),
                "#72B7B2".to_string(),
                "#B279A2".to_string(),
                "#FF9DA6".to_string(),
                "#9D755D".to_string(),
                "#BAB0AC".to_string(),
                "#EECA3B".to_string(),
            ],
            uppercase_title: true,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
