//! Infrastructure layer: SQLite schema, JWT auth, env config, the SeaORM
//! reference-data repositories, demo seeding, and router assembly.

pub mod auth;
pub mod config;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;
