//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod events;
pub mod health;
pub mod missed;
pub mod rooms;
