//! Infrastructure implementations for the Opsdesk inbox core.
//!
//! This crate provides the concrete data sources behind
//! [`opsdesk_core::inbox::InboxDataSource`] - an in-memory fixture and the
//! live HTTP client - plus configuration loading.

mod config_loader;
mod fixture_inbox_repository;
mod http_inbox_repository;

// Re-export public API
pub use config_loader::{default_config_path, load_config};
pub use fixture_inbox_repository::FixtureInboxRepository;
pub use http_inbox_repository::HttpInboxRepository;
