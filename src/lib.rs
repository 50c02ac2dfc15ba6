//! Bulk employee ingestion service for the StaffHub HR administration suite.
//!
//! This crate is the spreadsheet-driven batch importer: collision-free
//! per-tenant employee codes, staged row validation, and best-effort
//! partial-commit ingestion, behind a small tenant-scoped HTTP surface.

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod importer;
pub mod infrastructure;
pub mod interface;
pub mod sequence;
pub mod state;

// Re-export the types a typical embedder wires together.
pub use app::build_router;
pub use application::import_service::{FileUpload, ImportLimits, ImportService};
pub use config::AppConfig;
pub use domain::{DomainError, TenantId};
pub use sequence::{InMemorySequenceStore, SequenceStore};
pub use state::AppState;
