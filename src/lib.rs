pub mod app;
pub mod config;
pub mod error;
pub mod files;
pub mod state;
pub mod telemetry;
pub mod users;
