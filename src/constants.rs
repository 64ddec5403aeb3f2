//! Field names and default parameters for catalog enrichment
//!
//! Values here only seed [`crate::config::EnrichConfig::default_gallery`]
//! and the default [`crate::registry::FieldRegistry`]. Nothing reads them
//! as ambient state during a run.

/// Catalog field names written by the default registry
pub mod fields {
    pub const IMAGE: &str = "image";
    pub const PANELS: &str = "panels";

    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const PHASH: &str = "phash";
    pub const AHASH: &str = "ahash";
    pub const DHASH: &str = "dhash";
    pub const DOMINANT_COLORS: &str = "dominantColors";
    pub const COLORFULNESS: &str = "colorfulness";

    /// Tracked metadata fields, in the order they are merged into a panel
    pub const TRACKED: [&str; 7] = [
        WIDTH,
        HEIGHT,
        PHASH,
        AHASH,
        DHASH,
        DOMINANT_COLORS,
        COLORFULNESS,
    ];
}

/// Default locations, relative to the working directory
pub mod paths {
    pub const CATALOG: &str = "public/data/gallery.json";
    pub const IMAGE_ROOT: &str = "public";
}

/// Thumbnail used for color statistics
pub mod thumbnail {
    /// Longest side of the downsampled image in pixels
    pub const MAX_SIDE: u32 = 64;
}

/// Dominant color clustering
pub mod clustering {
    /// Number of dominant colors reported per image
    pub const CLUSTERS: usize = 3;

    /// Fixed seed so repeated runs give identical colors
    pub const SEED: u64 = 42;

    pub const MAX_ITERATIONS: usize = 300;

    /// Stop once no centroid moves more than this (squared Lab distance)
    pub const TOLERANCE: f32 = 1e-4;
}

/// Perceptual hashing
pub mod hashing {
    /// Hash grid side; 8 gives 64-bit hashes (16 hex characters)
    pub const HASH_SIZE: u32 = 8;
}

/// Decimal places kept for Lab channels and colorfulness
pub const ROUND_DECIMALS: i32 = 1;
