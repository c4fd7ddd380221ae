//! Repository Implementations
//!
//! PostgreSQL implementations of the store traits consumed by the presence
//! subsystem.

mod content_repository;
mod graph_repository;
mod read_marker_repository;

pub use content_repository::PgContentRepository;
pub use graph_repository::PgGraphRepository;
pub use read_marker_repository::PgReadMarkerRepository;
