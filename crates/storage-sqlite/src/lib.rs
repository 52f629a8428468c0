//! SQLite storage implementation for Tokenwatch.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the history repository trait defined in `tokenwatch-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The wallet balance repository
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod balances;
pub mod db;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export the repository
pub use balances::WalletBalanceRepository;

// Re-export from tokenwatch-core for convenience
pub use tokenwatch_core::errors::{DatabaseError, Error, Result};
