pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod query;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
