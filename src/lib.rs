pub mod assets;
pub mod card;
pub mod config;
pub mod highlight;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod scene;
#[cfg(feature = "font-metrics")]
pub mod text_metrics;
pub mod theme;
pub mod view;

pub use view::TreeView;
