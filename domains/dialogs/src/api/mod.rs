//! API layer for the Dialogs domain
//!
//! Contains the surface errors, HTTP handlers, pipelines, and routes.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::DialogsState;
