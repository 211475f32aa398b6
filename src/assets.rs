use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image `{0}` not found")]
    NotFound(String),
    #[error("image `{reference}` could not be decoded: {detail}")]
    Decode { reference: String, detail: String },
}

/// Intrinsic edge length of the built-in placeholder portrait.
pub const PLACEHOLDER_EDGE: u32 = 512;

/// A resolved image: its source reference (none for the placeholder) and
/// intrinsic pixel dimensions. The embedder keeps the decoded bitmap; the
/// layout only needs dimensions to derive the portrait scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub reference: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl ImageAsset {
    pub fn new(reference: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            reference: Some(reference.into()),
            width,
            height,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            reference: None,
            width: PLACEHOLDER_EDGE,
            height: PLACEHOLDER_EDGE,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.reference.is_none()
    }
}

/// Resolves an image reference to a displayable asset. A failed load never
/// aborts tree construction; the caller substitutes the placeholder.
pub trait AssetLoader {
    fn load(&self, reference: &str) -> Result<ImageAsset, AssetError>;
}

/// Loader that resolves every reference to the placeholder portrait.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderAssets;

impl AssetLoader for PlaceholderAssets {
    fn load(&self, _reference: &str) -> Result<ImageAsset, AssetError> {
        Ok(ImageAsset::placeholder())
    }
}

/// Loader over a preloaded reference table, for embedders that fetch and
/// decode images before handing control to the tree.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    images: BTreeMap<String, ImageAsset>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, width: u32, height: u32) {
        let reference = reference.into();
        let asset = ImageAsset::new(reference.clone(), width, height);
        self.images.insert(reference, asset);
    }
}

impl AssetLoader for StaticAssets {
    fn load(&self, reference: &str) -> Result<ImageAsset, AssetError> {
        self.images
            .get(reference)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_assets_resolve_known_references() {
        let mut assets = StaticAssets::new();
        assets.insert("portraits/rosa.png", 640, 640);
        let asset = assets.load("portraits/rosa.png").unwrap();
        assert_eq!(asset.width, 640);
        assert!(!asset.is_placeholder());
    }

    #[test]
    fn static_assets_report_missing_references() {
        let assets = StaticAssets::new();
        assert!(matches!(
            assets.load("portraits/missing.png"),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn placeholder_has_square_dimensions() {
        let placeholder = ImageAsset::placeholder();
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.width, placeholder.height);
    }
}
