//! WebSocket Presence Endpoint
//!
//! A connected socket is how a user becomes present and receives pushes.

pub mod handler;

pub use handler::ws_handler;
