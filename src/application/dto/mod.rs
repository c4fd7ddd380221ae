//! Data Transfer Objects
//!
//! Request and response types for the HTTP surface.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
