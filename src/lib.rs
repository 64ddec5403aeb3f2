//! # Gallery Metadata
//!
//! Fills in derived image metadata for gallery catalog panels.
//!
//! For every panel missing any tracked field this crate computes:
//! - Pixel dimensions (`width`, `height`)
//! - Perceptual hashes (`phash`, `ahash`, `dhash`) for near-duplicate lookup
//! - The three dominant colors in CIE Lab (`dominantColors`)
//! - A colorfulness score from the spread of a*/b* (`colorfulness`)
//!
//! and writes the catalog back only if at least one panel changed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gallery_metadata::{enrich, EnrichConfig, RunOutcome};
//!
//! let config = EnrichConfig::for_paths("public/data/gallery.json", "public");
//! let summary = enrich::run(&config)?;
//! if summary.outcome == RunOutcome::NoChanges {
//!     println!("nothing to commit");
//! }
//! # Ok::<(), gallery_metadata::MetadataError>(())
//! ```

pub mod error;
pub mod constants;
pub mod config;
pub mod image_loader;
pub mod color;
pub mod hashing;
pub mod registry;
pub mod catalog;
pub mod enrich;

pub use catalog::{Catalog, Panel};
pub use config::EnrichConfig;
pub use enrich::{ItemOutcome, ItemStatus, RunOutcome, RunSummary};
pub use error::{MetadataError, Result};
pub use registry::{FieldRegistry, ImageSample, MetadataRecord};
