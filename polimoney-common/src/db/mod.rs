//! Database models and queries

pub mod init;
pub mod metadata;
pub mod models;

pub use init::*;
pub use metadata::*;
pub use models::*;
