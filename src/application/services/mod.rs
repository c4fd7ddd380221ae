//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **Authenticator**: Token validation
//! - **FanoutDispatcher**: Best-effort push of new content to present users
//! - **UnreadReconciler**: Missed counts and read markers
//! - **PresenceHub**: Connection lifecycle and the hooks the backend calls

pub mod auth_service;
pub mod fanout_service;
pub mod presence_service;
pub mod unread_service;

// Re-export auth service types
pub use auth_service::{AuthError, Authenticator, Claims, JwtAuthenticator};

// Re-export fan-out service types
pub use fanout_service::{DeliveryReport, FanoutDispatcher, FanoutError};

// Re-export presence service types
pub use presence_service::PresenceHub;

// Re-export unread service types
pub use unread_service::UnreadReconciler;
