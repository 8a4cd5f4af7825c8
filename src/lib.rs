pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod sanitize;
pub mod state;
pub mod store;
pub mod todos;
pub mod users;
