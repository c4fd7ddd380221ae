//! # Social Presence Library
//!
//! Presence and fan-out subsystem of a social-media backend:
//! - In-memory registry of live client connections
//! - Room membership cache over the social graph store
//! - Best-effort push of new posts, comments and chat messages to online users
//! - Pull-based unread-count reconciliation against stored read markers
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Sessions, rooms, read markers, push events and store traits
//! - **Application Layer**: Authenticator, fan-out dispatcher, unread reconciler, presence hub
//! - **Infrastructure Layer**: PostgreSQL stores, in-memory registries, metrics
//! - **Presentation Layer**: HTTP handlers and the WebSocket presence endpoint
//!
//! ## Module Structure
//!
//! ```text
//! social_presence/
//! +-- config/         Configuration management
//! +-- domain/         Entities and store traits
//! +-- application/    Application services
//! +-- infrastructure/ Database stores, registries and metrics
//! +-- presentation/   HTTP routes and WebSocket handler
//! +-- shared/         Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
