//! # Job Board Service
//!
//! Backend for a small job board: user registration, JWT authentication
//! and profile management over a pluggable SQL store.
//!
//! ## Architecture
//!
//! The project follows a conventional layered layout:
//!
//! - **domain**: Core entities, DTOs and the repository trait
//! - **application**: Business logic (auth and profile services)
//! - **infrastructure**: External concerns (crypto, database, migrations)
//! - **interfaces**: Inbound adapters (REST API, middleware, Swagger docs)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
