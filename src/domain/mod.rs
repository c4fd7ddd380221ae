//! # Domain Layer
//!
//! Core types of the presence subsystem. Independent of HTTP and SQL.
//!
//! ## Structure
//!
//! - **entities**: Sessions, rooms, read markers, push events
//! - Store traits (`SocialGraphRepository`, `ReadMarkerRepository`,
//!   `ContentRepository`) define the durable capabilities the subsystem consumes
//!
//! ## Design Principles
//!
//! - Registries hold snapshots and handles, never authoritative state
//! - Store traits are implemented in the infrastructure layer

pub mod entities;

pub use entities::*;
