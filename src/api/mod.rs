// API routes and handlers

pub mod error;
pub mod health;
pub mod members;
pub mod routes;
pub mod workout_sessions;

pub use error::ApiError;
pub use routes::{create_routes, AppState};
