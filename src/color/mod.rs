//! Color analysis and conversion module
//!
//! This module handles sRGB to Lab conversion, k-means clustering of Lab
//! pixels, and the dominant color and colorfulness statistics built on them.

pub mod conversion;
pub mod kmeans;
pub mod analysis;

pub use conversion::ColorConverter;
pub use analysis::{ColorAnalyzer, DominantColor};
pub use kmeans::{Cluster, KMeans};
