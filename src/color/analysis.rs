//! Dominant color and colorfulness analysis
//!
//! Both statistics run over the Lab pixels of a downsampled thumbnail:
//! - Dominant colors: k-means cluster centers, most populous first
//! - Colorfulness: spread of the chromatic channels a* and b*
//!
//! Colorfulness measures variance, not mean chroma. A scan of yellowed
//! paper has a strongly tinted mean but almost no spread and must score
//! near zero, while a page with several distinct hues scores high.

use palette::Lab;

use crate::color::kmeans::KMeans;
use crate::config::ClusteringConfig;
use crate::constants::ROUND_DECIMALS;
use crate::error::{MetadataError, Result};

/// A dominant color with its share of the thumbnail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantColor {
    /// Cluster center in CIE Lab
    pub lab: Lab,
    /// Number of thumbnail pixels in the cluster
    pub population: usize,
}

impl DominantColor {
    /// `[L, a, b]` rounded for storage in the catalog
    pub fn rounded(&self) -> [f64; 3] {
        [
            round_to(self.lab.l as f64, ROUND_DECIMALS),
            round_to(self.lab.a as f64, ROUND_DECIMALS),
            round_to(self.lab.b as f64, ROUND_DECIMALS),
        ]
    }
}

/// Color analyzer for dominant colors and colorfulness
pub struct ColorAnalyzer {
    kmeans: KMeans,
}

impl Default for ColorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorAnalyzer {
    /// Create a color analyzer with default clustering parameters
    pub fn new() -> Self {
        Self::with_config(&ClusteringConfig::default())
    }

    pub fn with_config(config: &ClusteringConfig) -> Self {
        Self {
            kmeans: KMeans::from_config(config),
        }
    }

    /// Extract dominant colors, most populous first
    ///
    /// # Arguments
    ///
    /// * `pixels` - Lab pixels of the thumbnail
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Clustering` if there are fewer pixels than
    /// clusters.
    pub fn dominant_colors(&self, pixels: &[Lab]) -> Result<Vec<DominantColor>> {
        let clusters = self.kmeans.fit(pixels)?;
        Ok(clusters
            .into_iter()
            .map(|c| DominantColor {
                lab: c.centroid,
                population: c.population,
            })
            .collect())
    }

    /// Root mean square of the a* and b* standard deviations
    ///
    /// `sqrt((σa² + σb²) / 2)` with population standard deviations. The L*
    /// channel does not contribute.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Processing` for an empty pixel set.
    pub fn colorfulness(&self, pixels: &[Lab]) -> Result<f64> {
        if pixels.is_empty() {
            return Err(MetadataError::Processing(
                "no pixels to measure colorfulness".into(),
            ));
        }

        let var_a = variance(pixels.iter().map(|p| p.a as f64));
        let var_b = variance(pixels.iter().map(|p| p.b as f64));

        Ok(((var_a + var_b) / 2.0).sqrt())
    }
}

/// Population variance
fn variance(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let (sum, count) = values.clone().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return 0.0;
    }
    let mean = sum / count as f64;
    values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
