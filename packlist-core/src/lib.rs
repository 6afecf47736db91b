//! Core library for Packlist.
//!
//! This crate provides the domain models, the derived packing statistics and
//! the database operations for Packlist, independent of any transport layer.
//!
//! # Usage
//!
//! ```no_run
//! use packlist_core::db::Database;
//! use packlist_core::models::*;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let trip = db.create_trip(CreateTripInput { name: "Ski Trip".into() })?;
//! let trips = db.get_trip_trees()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod models;
pub mod stats;

// Re-export commonly used types at crate root
pub use db::Database;
pub use stats::PackingStats;
