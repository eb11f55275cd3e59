pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
