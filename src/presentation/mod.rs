//! Presentation Layer
//!
//! HTTP routes and the WebSocket presence endpoint.

pub mod http;
pub mod middleware;
pub mod websocket;
