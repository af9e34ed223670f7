pub mod api;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
pub mod utils;
