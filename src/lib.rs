pub mod config;
pub mod export;
pub mod graph;
pub mod handlers;
pub mod observability;
pub mod store;
