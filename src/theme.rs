use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: String,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub card_fill: String,
    pub card_text_color: String,
    pub card_stroke: String,
    pub female_card_stroke: String,
    pub male_card_stroke: String,
    pub card_shadow: Shadow,
    pub connector_color: String,
    pub connector_opacity: f32,
    pub highlight_color: String,
    pub highlight_shadow_blur: f32,
}

impl Theme {
    /// Default palette: deep-orange highlight on white cards.
    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 18.0,
            background: "#FFFFFF".to_string(),
            card_fill: "#FFFFFF".to_string(),
            card_text_color: "#333333".to_string(),
            card_stroke: "#A0D2EB".to_string(),
            female_card_stroke: "#FF9EAA".to_string(),
            male_card_stroke: "#A0D2EB".to_string(),
            card_shadow: Shadow {
                color: "rgba(0,0,0,0.3)".to_string(),
                blur: 5.0,
                offset_x: 0.0,
                offset_y: 2.0,
            },
            connector_color: "black".to_string(),
            connector_opacity: 0.8,
            highlight_color: "#FF5722".to_string(),
            highlight_shadow_blur: 10.0,
        }
    }

    /// Earlier palette with the blue highlight.
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            highlight_color: "#3498db".to_string(),
            ..Self::modern()
        }
    }

    pub fn highlight_shadow(&self) -> Shadow {
        Shadow {
            color: self.highlight_color.clone(),
            blur: self.highlight_shadow_blur,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn gender_stroke(&self, gender: Option<crate::ir::Gender>) -> &str {
        match gender {
            Some(crate::ir::Gender::Female) => &self.female_card_stroke,
            Some(crate::ir::Gender::Male) => &self.male_card_stroke,
            None => &self.card_stroke,
        }
    }
}
