pub mod chart;
pub mod config;
pub mod dial_codes;
pub mod error;
pub mod export;
pub mod model;
pub mod preferences;
pub mod search;
pub mod state;
pub mod tree;
pub mod viewport;

pub use chart::*;
pub use config::ChartConfig;
pub use error::*;
pub use model::*;
pub use state::TreeViewState;
pub use tree::{resolve, DepthLimit, RootSelector, VisibleNode, VisibleNodes};
pub use viewport::{Viewport, ViewportConfig};
