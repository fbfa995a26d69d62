pub mod app;
pub mod calendar;
pub mod client;
pub mod config;
pub mod errors;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod refresh;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use refresh::RefreshTask;
pub use state::AppState;
