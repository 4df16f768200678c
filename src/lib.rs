pub mod app;
pub mod config;
pub mod entry_log;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod share;
pub mod state;
pub mod stats;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
