//! Recipe sharing backend core.
//!
//! Entity schema for recipes, bookmarks, comments and likes over SQLite (diesel), and the
//! representation layer that turns them into JSON for a given requesting identity.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod store;
pub mod telemetry;

pub use auth::Identity;
pub use config::Config;
pub use error::{Error, FieldError, Result};
