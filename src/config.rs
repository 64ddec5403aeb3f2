//! Configuration for an enrichment run.
//!
//! Every tunable the pass depends on lives here and is handed to
//! [`crate::enrich::run`] explicitly, so a run can point at any catalog and
//! image root.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use gallery_metadata::EnrichConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = EnrichConfig::from_json_file(Path::new("enrich.json"))?;
//!
//! // Or use defaults
//! let config = EnrichConfig::default_gallery();
//! # Ok::<(), gallery_metadata::MetadataError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`ThumbnailConfig`]: downsampling bound for color statistics
//! - [`ClusteringConfig`]: dominant color k-means parameters
//! - [`HashingConfig`]: perceptual hash size

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{MetadataError, Result};

/// Complete configuration for one enrichment pass.
///
/// Can be serialized to/from JSON so runs are reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Catalog JSON file to enrich in place
    pub catalog_path: PathBuf,

    /// Directory panel `image` paths are resolved against
    pub image_root: PathBuf,

    /// Thumbnail configuration
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,

    /// Dominant color clustering configuration
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Perceptual hash configuration
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// Thumbnail parameters.
///
/// Dominant colors and colorfulness are computed over a downsampled copy of
/// the image to bound clustering cost. Images already within the bound are
/// used as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Longest side in pixels
    pub max_side: u32,
}

/// K-means parameters for dominant color extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Number of clusters (dominant colors reported)
    pub clusters: usize,

    /// RNG seed for centroid initialisation
    pub seed: u64,

    /// Iteration cap
    pub max_iterations: usize,

    /// Convergence threshold on squared centroid movement
    pub tolerance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Hash grid side; the hash has `hash_size * hash_size` bits
    pub hash_size: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_side: constants::thumbnail::MAX_SIDE,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            clusters: constants::clustering::CLUSTERS,
            seed: constants::clustering::SEED,
            max_iterations: constants::clustering::MAX_ITERATIONS,
            tolerance: constants::clustering::TOLERANCE,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            hash_size: constants::hashing::HASH_SIZE,
        }
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self::default_gallery()
    }
}

impl EnrichConfig {
    /// Default configuration for the site layout (`public/data/gallery.json`, images under `public/`)
    pub fn default_gallery() -> Self {
        Self {
            catalog_path: PathBuf::from(constants::paths::CATALOG),
            image_root: PathBuf::from(constants::paths::IMAGE_ROOT),
            thumbnail: ThumbnailConfig::default(),
            clustering: ClusteringConfig::default(),
            hashing: HashingConfig::default(),
        }
    }

    /// Default parameters pointed at a specific catalog and image root
    pub fn for_paths(catalog_path: impl Into<PathBuf>, image_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            image_root: image_root.into(),
            ..Self::default_gallery()
        }
    }

    /// Reject parameter values no computation can work with
    pub fn validate(&self) -> Result<()> {
        if self.thumbnail.max_side == 0 {
            return Err(MetadataError::invalid_parameter("thumbnail.max_side", 0));
        }
        if self.clustering.clusters == 0 {
            return Err(MetadataError::invalid_parameter("clustering.clusters", 0));
        }
        if self.clustering.max_iterations == 0 {
            return Err(MetadataError::invalid_parameter("clustering.max_iterations", 0));
        }
        if self.clustering.tolerance.is_nan() || self.clustering.tolerance < 0.0 {
            return Err(MetadataError::invalid_parameter(
                "clustering.tolerance",
                self.clustering.tolerance,
            ));
        }
        if self.hashing.hash_size == 0 {
            return Err(MetadataError::invalid_parameter("hashing.hash_size", 0));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MetadataError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| MetadataError::Config {
            message: format!("cannot parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| MetadataError::Config {
            message: format!("cannot write {}: {}", path.display(), e),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gallery_paths() {
        let config = EnrichConfig::default_gallery();
        assert_eq!(config.catalog_path, PathBuf::from("public/data/gallery.json"));
        assert_eq!(config.image_root, PathBuf::from("public"));
        assert_eq!(config.thumbnail.max_side, 64);
        assert_eq!(config.clustering.clusters, 3);
        assert_eq!(config.clustering.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_section_defaults() {
        let json = r#"{ "catalog_path": "data/g.json", "image_root": "img" }"#;
        let config: EnrichConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.catalog_path, PathBuf::from("data/g.json"));
        assert_eq!(config.clustering, ClusteringConfig::default());
        assert_eq!(config.hashing.hash_size, 8);
    }

    #[test]
    fn test_validate_rejects_zero_clusters() {
        let mut config = EnrichConfig::default_gallery();
        config.clustering.clusters = 0;

        match config.validate() {
            Err(MetadataError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, "clustering.clusters");
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrich.json");

        let mut config = EnrichConfig::for_paths("a/gallery.json", "a");
        config.thumbnail.max_side = 32;
        config.to_json_file(&path).unwrap();

        let loaded = EnrichConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_config_file() {
        let result = EnrichConfig::from_json_file(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(MetadataError::Config { .. })));
    }
}
