pub mod aggregate;
pub mod app;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod selectors;
pub mod source;
pub mod state;
pub mod ui;

pub use aggregate::{recompute, TrendScope};
pub use app::router;
pub use config::Config;
pub use dataset::Dataset;
pub use selectors::Selection;
pub use source::load_dataset;
pub use state::AppState;
