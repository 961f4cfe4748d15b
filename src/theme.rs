use serde::{Deserialize, Serialize};

/// Visual settings that never affect geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub root_font_size: f64,
    pub min_font_size: f64,
    /// Fill per nesting level; levels past the end reuse the last entry.
    pub level_colors: Vec<String>,
    pub leaf_color: String,
    pub stroke_color: String,
    pub text_color: String,
    pub background: String,
    pub corner_radius: f64,
}

impl Theme {
    pub fn muted() -> Self {
        Self {
            font_family: "Arial".to_string(),
            root_font_size: 20.0,
            min_font_size: 12.0,
            level_colors: vec![
                "#5B8C85".to_string(),
                "#6B5B95".to_string(),
                "#806D5B".to_string(),
                "#5B7065".to_string(),
                "#8B635C".to_string(),
                "#707C8C".to_string(),
                "#7C6D78".to_string(),
            ],
            leaf_color: "#E0E0E0".to_string(),
            stroke_color: "#333333".to_string(),
            text_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
            corner_radius: 5.0,
        }
    }

    pub fn fill_for(&self, level: usize, is_leaf: bool) -> &str {
        if is_leaf {
            return &self.leaf_color;
        }
        self.level_colors
            .get(level)
            .or_else(|| self.level_colors.last())
            .map(String::as_str)
            .unwrap_or(&self.leaf_color)
    }

    /// Shrinks two points per level; leaves sit two points below their level.
    pub fn font_size_for(&self, level: usize, is_leaf: bool) -> f64 {
        let base = self.root_font_size - level as f64 * 2.0;
        let size = if is_leaf { base - 2.0 } else { base };
        size.max(self.min_font_size)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::muted()
    }
}
