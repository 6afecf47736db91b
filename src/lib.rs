//! Packlist: shared packing lists over a small JSON API.
//!
//! - [`api`] serves trips, categories and items over HTTP.
//! - [`client`] calls that API and normalizes every outcome to an [`Envelope`].
//! - [`view`] keeps a polled mirror of the server state and renders it.

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod view;

pub use envelope::Envelope;
pub use packlist_core::{db, models, stats};
