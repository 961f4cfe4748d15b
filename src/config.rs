use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Upper bound on the exhaustive ordering search. `10!` orderings is the most a
/// settings file may ask for.
pub const MAX_PERMUTATION_THRESHOLD: usize = 10;

/// How grid cells are sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellSizing {
    /// Every cell takes the size of the largest child.
    Uniform,
    /// Rows take their tallest child, columns their widest.
    Adaptive,
}

/// How a candidate arrangement is scored. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMetric {
    /// Squared distance from the target aspect ratio.
    AspectRatio,
    /// Aspect distance plus `area_penalty_factor` times the box area.
    Composite,
}

/// Child order tried when there are too many children to permute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingHeuristic {
    AreaDescending,
    InputOrder,
}

/// Everything that influences geometry. Colours and fonts live in [`Theme`] so
/// that changing them never changes the [`Fingerprint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub box_min_width: f64,
    pub box_min_height: f64,
    pub horizontal_gap_factor: f64,
    pub vertical_gap_factor: f64,
    pub padding: f64,
    pub top_padding: f64,
    pub target_aspect_ratio: f64,
    pub cell_sizing: CellSizing,
    pub score_metric: ScoreMetric,
    pub area_penalty_factor: f64,
    pub permutation_threshold: usize,
    pub ordering_heuristic: OrderingHeuristic,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_min_width: 120.0,
            box_min_height: 80.0,
            horizontal_gap_factor: 0.05,
            vertical_gap_factor: 0.05,
            padding: 30.0,
            top_padding: 40.0,
            target_aspect_ratio: 1.0,
            cell_sizing: CellSizing::Uniform,
            score_metric: ScoreMetric::AspectRatio,
            area_penalty_factor: 0.001,
            permutation_threshold: 8,
            ordering_heuristic: OrderingHeuristic::AreaDescending,
        }
    }
}

impl LayoutConfig {
    pub fn effective_permutation_threshold(&self) -> usize {
        self.permutation_threshold.min(MAX_PERMUTATION_THRESHOLD)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(self)
    }
}

/// Digest of the geometry-relevant settings, used as the cache key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub u64);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Hashes the canonical (sorted-key) JSON form of `config`, so the digest
/// depends only on field values and never on declaration or insertion order.
///
/// The digest comes from `DefaultHasher`, whose algorithm may change between
/// Rust releases: it is stable within one build only and must not be
/// persisted.
pub fn fingerprint(config: &LayoutConfig) -> Fingerprint {
    // serde_json::Map is ordered by key without the preserve_order feature.
    // Converting to a Value cannot fail here: every field is a number or a
    // unit enum variant, and non-finite floats become null.
    let canonical = serde_json::to_value(config)
        .map(|value| value.to_string())
        .unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    Fingerprint(hasher.finish())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub layout: LayoutConfig,
    pub theme: Theme,
    /// Deepest level kept before layout. The root is level 0.
    pub max_level: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            theme: Theme::default(),
            max_level: Some(6),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    box_min_width: Option<f64>,
    box_min_height: Option<f64>,
    horizontal_gap_factor: Option<f64>,
    vertical_gap_factor: Option<f64>,
    padding: Option<f64>,
    top_padding: Option<f64>,
    target_aspect_ratio: Option<f64>,
    cell_sizing: Option<CellSizing>,
    score_metric: Option<ScoreMetric>,
    area_penalty_factor: Option<f64>,
    permutation_threshold: Option<usize>,
    ordering_heuristic: Option<OrderingHeuristic>,
    // Flat switches used by older settings files.
    uniform_cells: Option<bool>,
    composite_metric: Option<bool>,
    sort_heuristic_by_area: Option<bool>,
    max_level: Option<usize>,
    root_font_size: Option<f64>,
    font_family: Option<String>,
    color_0: Option<String>,
    color_1: Option<String>,
    color_2: Option<String>,
    color_3: Option<String>,
    color_4: Option<String>,
    color_5: Option<String>,
    color_6: Option<String>,
    color_leaf: Option<String>,
    stroke_color: Option<String>,
    text_color: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a settings document (JSON or JSON5) and merges it over the defaults.
/// Unknown keys are ignored so a full application settings file can be passed
/// as is.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();
    let layout = &mut config.layout;

    if let Some(v) = parsed.box_min_width {
        layout.box_min_width = v;
    }
    if let Some(v) = parsed.box_min_height {
        layout.box_min_height = v;
    }
    if let Some(v) = parsed.horizontal_gap_factor {
        layout.horizontal_gap_factor = v;
    }
    if let Some(v) = parsed.vertical_gap_factor {
        layout.vertical_gap_factor = v;
    }
    if let Some(v) = parsed.padding {
        layout.padding = v;
    }
    if let Some(v) = parsed.top_padding {
        layout.top_padding = v;
    }
    if let Some(v) = parsed.target_aspect_ratio {
        layout.target_aspect_ratio = v;
    }
    if let Some(v) = parsed.area_penalty_factor {
        layout.area_penalty_factor = v;
    }
    if let Some(v) = parsed.permutation_threshold {
        layout.permutation_threshold = v;
    }

    if let Some(uniform) = parsed.uniform_cells {
        layout.cell_sizing = if uniform {
            CellSizing::Uniform
        } else {
            CellSizing::Adaptive
        };
    }
    if let Some(v) = parsed.cell_sizing {
        layout.cell_sizing = v;
    }
    if let Some(composite) = parsed.composite_metric {
        layout.score_metric = if composite {
            ScoreMetric::Composite
        } else {
            ScoreMetric::AspectRatio
        };
    }
    if let Some(v) = parsed.score_metric {
        layout.score_metric = v;
    }
    if let Some(sort) = parsed.sort_heuristic_by_area {
        layout.ordering_heuristic = if sort {
            OrderingHeuristic::AreaDescending
        } else {
            OrderingHeuristic::InputOrder
        };
    }
    if let Some(v) = parsed.ordering_heuristic {
        layout.ordering_heuristic = v;
    }

    if let Some(v) = parsed.max_level {
        config.max_level = Some(v);
    }

    let theme = &mut config.theme;
    if let Some(v) = parsed.root_font_size {
        theme.root_font_size = v;
    }
    if let Some(v) = parsed.font_family {
        theme.font_family = v;
    }
    let levels = [
        parsed.color_0,
        parsed.color_1,
        parsed.color_2,
        parsed.color_3,
        parsed.color_4,
        parsed.color_5,
        parsed.color_6,
    ];
    for (slot, value) in theme.level_colors.iter_mut().zip(levels) {
        if let Some(v) = value {
            *slot = v;
        }
    }
    if let Some(v) = parsed.color_leaf {
        theme.leaf_color = v;
    }
    if let Some(v) = parsed.stroke_color {
        theme.stroke_color = v;
    }
    if let Some(v) = parsed.text_color {
        theme.text_color = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_for_equal_configs() {
        let a = LayoutConfig::default();
        let b = LayoutConfig::default();
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).to_string().len(), 16);
    }

    #[test]
    fn canonical_form_is_a_sorted_object_of_every_field() {
        let config = LayoutConfig {
            padding: f64::NAN,
            ..LayoutConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 12);
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(value["padding"].is_null());
        assert_ne!(fingerprint(&config), fingerprint(&LayoutConfig::default()));
    }

    #[test]
    fn fingerprint_tracks_geometry_fields() {
        let base = LayoutConfig::default();
        let mut wider = base.clone();
        wider.box_min_width += 1.0;
        let mut adaptive = base.clone();
        adaptive.cell_sizing = CellSizing::Adaptive;
        assert_ne!(fingerprint(&base), fingerprint(&wider));
        assert_ne!(fingerprint(&base), fingerprint(&adaptive));
    }

    #[test]
    fn fingerprint_ignores_theme_and_key_order() {
        let a = parse_config(r##"{"padding": 12, "top_padding": 20, "color_0": "#000000"}"##).unwrap();
        let b = parse_config(r##"{"top_padding": 20, "color_0": "#ffffff", "padding": 12}"##).unwrap();
        assert_ne!(a.theme.level_colors[0], b.theme.level_colors[0]);
        assert_eq!(a.layout.fingerprint(), b.layout.fingerprint());
    }

    #[test]
    fn legacy_switches_map_to_strategies() {
        let config = parse_config(
            r#"{
                // older settings files use flat switches
                uniform_cells: false,
                composite_metric: true,
                sort_heuristic_by_area: false,
                max_level: 3,
            }"#,
        )
        .unwrap();
        assert_eq!(config.layout.cell_sizing, CellSizing::Adaptive);
        assert_eq!(config.layout.score_metric, ScoreMetric::Composite);
        assert_eq!(config.layout.ordering_heuristic, OrderingHeuristic::InputOrder);
        assert_eq!(config.max_level, Some(3));
    }

    #[test]
    fn explicit_strategy_wins_over_legacy_switch() {
        let config =
            parse_config(r#"{"uniform_cells": false, "cell_sizing": "uniform"}"#).unwrap();
        assert_eq!(config.layout.cell_sizing, CellSizing::Uniform);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = parse_config(r#"{"padding": 10, "font_size": 10, "context_tree": true}"#).unwrap();
        assert_eq!(config.layout.padding, 10.0);
        assert_eq!(config.layout.top_padding, 40.0);
    }

    #[test]
    fn threshold_is_capped() {
        let config = parse_config(r#"{"permutation_threshold": 40}"#).unwrap();
        assert_eq!(config.layout.permutation_threshold, 40);
        assert_eq!(
            config.layout.effective_permutation_threshold(),
            MAX_PERMUTATION_THRESHOLD
        );
    }
}
