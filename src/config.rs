use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    pub radius: f32,
    pub name_band_height: f32,
    pub corner_radius: f32,
    pub stroke_width: f32,
    pub name_padding: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            radius: 64.0,
            name_band_height: 40.0,
            corner_radius: 8.0,
            stroke_width: 2.0,
            name_padding: 12.0,
        }
    }
}

impl CardConfig {
    /// Narrowest card: the image circle plus its border.
    pub fn min_width(&self) -> f32 {
        self.radius * 2.0
    }

    pub fn height(&self) -> f32 {
        self.radius * 2.0 + self.name_band_height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacingConfig {
    pub minimum_gap: f32,
    pub vertical_gap: f32,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            minimum_gap: 200.0,
            vertical_gap: 200.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    pub stroke_width: f32,
    pub highlight_stroke_width: f32,
    pub dash: [f32; 2],
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            stroke_width: 3.0,
            highlight_stroke_width: 5.0,
            dash: [5.0, 5.0],
        }
    }
}

/// Which relationship of an anchor with several becomes the primary one.
///
/// `ChildrenFirst` orders partner-less relationships ahead of partnered
/// ones and marks every partner-less relationship with children primary in
/// addition to the first partnered relationship. `MarriedFirst` orders
/// married relationships ahead and marks only the first partnered
/// relationship primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryPolicy {
    #[default]
    ChildrenFirst,
    MarriedFirst,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub card: CardConfig,
    pub spacing: SpacingConfig,
    pub line: LineConfig,
    pub primary_policy: PrimaryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl SurfaceConfig {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub surface: SurfaceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::modern(),
            layout: LayoutConfig::default(),
            surface: SurfaceConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    highlight_color: Option<String>,
    connector_color: Option<String>,
    card: Option<CardSection>,
    spacing: Option<SpacingSection>,
    line: Option<LineSection>,
    surface: Option<SurfaceSection>,
    primary_policy: Option<PrimaryPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardSection {
    radius: Option<f32>,
    name_band_height: Option<f32>,
    corner_radius: Option<f32>,
    stroke_width: Option<f32>,
    name_padding: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpacingSection {
    minimum_gap: Option<f32>,
    vertical_gap: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineSection {
    stroke_width: Option<f32>,
    highlight_stroke_width: Option<f32>,
    dash: Option<[f32; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurfaceSection {
    width: Option<f32>,
    height: Option<f32>,
}

/// Parses a configuration document. JSON5 and plain JSON are both accepted.
pub fn config_from_str(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "classic" {
            config.theme = Theme::classic();
        } else if theme_name == "modern" || theme_name == "default" {
            config.theme = Theme::modern();
        }
    }
    if let Some(v) = parsed.font_family {
        config.theme.font_family = v;
    }
    if let Some(v) = parsed.font_size {
        config.theme.font_size = v;
    }
    if let Some(v) = parsed.highlight_color {
        config.theme.highlight_color = v;
    }
    if let Some(v) = parsed.connector_color {
        config.theme.connector_color = v;
    }

    if let Some(card) = parsed.card {
        if let Some(v) = card.radius {
            config.layout.card.radius = v;
        }
        if let Some(v) = card.name_band_height {
            config.layout.card.name_band_height = v;
        }
        if let Some(v) = card.corner_radius {
            config.layout.card.corner_radius = v;
        }
        if let Some(v) = card.stroke_width {
            config.layout.card.stroke_width = v;
        }
        if let Some(v) = card.name_padding {
            config.layout.card.name_padding = v;
        }
    }
    if let Some(spacing) = parsed.spacing {
        if let Some(v) = spacing.minimum_gap {
            config.layout.spacing.minimum_gap = v;
        }
        if let Some(v) = spacing.vertical_gap {
            config.layout.spacing.vertical_gap = v;
        }
    }
    if let Some(line) = parsed.line {
        if let Some(v) = line.stroke_width {
            config.layout.line.stroke_width = v;
        }
        if let Some(v) = line.highlight_stroke_width {
            config.layout.line.highlight_stroke_width = v;
        }
        if let Some(v) = line.dash {
            config.layout.line.dash = v;
        }
    }
    if let Some(surface) = parsed.surface {
        if let Some(v) = surface.width {
            config.surface.width = v;
        }
        if let Some(v) = surface.height {
            config.surface.height = v;
        }
    }
    if let Some(policy) = parsed.primary_policy {
        config.layout.primary_policy = policy;
    }

    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    config_from_str(&contents)
}
