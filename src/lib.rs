//! Member and workout-session records for a fitness center, served over HTTP.
//!
//! Handlers in [`api`] validate wire JSON through [`models`] and hand typed
//! payloads to the storage ports in [`services`].

pub mod api;
pub mod config;
pub mod models;
pub mod services;
