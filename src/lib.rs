pub mod app;
pub mod chart;
pub mod chat;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod pointer;
pub mod report;
pub mod state;
pub mod storage;
pub mod views;

pub use app::router;
pub use config::Config;
pub use state::AppState;
