//! # Polimoney Common Library
//!
//! Shared code for the Polimoney master-data tooling:
//! - Database initialization and schema
//! - Row models for municipalities, districts and master metadata
//! - Freshness marker access
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
