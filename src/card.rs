use crate::assets::ImageAsset;
use crate::config::Config;
use crate::ir::Person;
use crate::theme::Theme;

/// Opaque rendered card: the layout consumes only its dimensions, the
/// embedder draws the rest from the exposed parts.
#[derive(Debug, Clone)]
pub struct CardVisual {
    pub width: f32,
    pub height: f32,
    pub stroke: String,
    pub label: String,
    pub image: ImageAsset,
}

pub trait CardRenderer {
    fn render(&self, person: &Person, image: &ImageAsset, config: &Config) -> CardVisual;
}

/// Default renderer: portrait circle over a name band, card width grown to
/// fit the measured name and never narrower than the portrait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCardRenderer;

impl CardRenderer for TextCardRenderer {
    fn render(&self, person: &Person, image: &ImageAsset, config: &Config) -> CardVisual {
        let card = &config.layout.card;
        let name_width = measure_name(&person.name, &config.theme);
        let width = card.min_width().max(name_width + 2.0 * card.name_padding);
        CardVisual {
            width,
            height: card.height(),
            stroke: config.theme.gender_stroke(person.gender).to_string(),
            label: person.name.clone(),
            image: image.clone(),
        }
    }
}

fn measure_name(name: &str, theme: &Theme) -> f32 {
    #[cfg(feature = "font-metrics")]
    if let Some(width) =
        crate::text_metrics::measure_text_width(name, theme.font_size, &theme.font_family)
    {
        return width;
    }
    fallback_name_width(name, theme.font_size)
}

fn fallback_name_width(name: &str, font_size: f32) -> f32 {
    name.chars().map(char_width_factor).sum::<f32>() * font_size
}

fn char_width_factor(ch: char) -> f32 {
    match ch {
        'i' | 'j' | 'l' | 'I' | '.' | ',' | '\'' | '!' | ':' | ';' | '|' => 0.30,
        ' ' | 'f' | 't' | 'r' | '(' | ')' | '[' | ']' => 0.38,
        'm' | 'w' | 'M' | 'W' | '@' => 0.88,
        'A'..='Z' | '0'..='9' => 0.66,
        _ => 0.56,
    }
}
