//! polimoney-master library - electoral district master data
//!
//! Derives every electoral district record from compiled reference tables
//! and the municipality registry, and rebuilds the `districts` table.
//!
//! - [`reference`]: prefecture, lower-house and upper-house tables
//! - [`districts`]: the six district generators (HR, HC, PG, PA, GM, CM)
//! - [`fetcher`]: paginated municipality registry reader
//! - [`reconcile`]: wipe-and-rebuild driver with an aggregated report
//! - [`import`]: municipality CSV importer

pub mod db;
pub mod districts;
pub mod fetcher;
pub mod import;
pub mod pagination;
pub mod reconcile;
pub mod reference;
pub mod status;

pub use db::{MasterStore, SqliteMasterStore};
pub use districts::{District, DistrictType};
pub use reconcile::{ReconcileReport, Reconciler};
