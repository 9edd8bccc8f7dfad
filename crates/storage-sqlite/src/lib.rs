//! SQLite storage implementation for FX deals.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `fxdeals-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that serializes all writes
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//!     core (domain)        server (http)
//!           │                    │
//!           └─────────┬──────────┘
//!                     │
//!                     ▼
//!          storage-sqlite (this crate)
//!                     │
//!                     ▼
//!                 SQLite DB
//! ```

// Linked only for its bundled SQLite build.
use rusqlite as _;

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod deals;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from fxdeals-core for convenience
pub use fxdeals_core::errors::{DatabaseError, Error, Result};
