//! # StudyHub Coordination Service
//!
//! Backend service for subject-based study groups: users register, create and
//! join capacity-bounded groups, exchange messages and shared materials, and
//! an administrator moderates group creation through an approve/reject
//! workflow.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, invariants and typed errors
//! - **application**: Business logic and use-case services
//! - **infrastructure**: External concerns (storage, database, crypto)
//! - **interfaces**: REST API (axum) with OpenAPI documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export storage types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig, DatabaseStorage};
pub use infrastructure::storage::{InMemoryStorage, Storage};

// Re-export API router
pub use interfaces::http::create_api_router;
