//! Seeded k-means over Lab pixels
//!
//! Centroids are initialised with k-means++ driven by a `Pcg64` seeded from
//! the configuration, so the same pixels always produce the same clusters.
//! Lloyd iterations then run until no centroid moves more than the
//! tolerance or the iteration cap is hit.

use palette::Lab;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::color::conversion::distance_squared;
use crate::config::ClusteringConfig;
use crate::error::{MetadataError, Result};

/// One cluster of the final partition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    /// Mean color of the member pixels
    pub centroid: Lab,
    /// Number of member pixels
    pub population: usize,
}

/// K-means clustering with a fixed cluster count and seed
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    seed: u64,
    max_iterations: usize,
    tolerance: f32,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        let defaults = ClusteringConfig::default();
        Self {
            k,
            seed,
            max_iterations: defaults.max_iterations,
            tolerance: defaults.tolerance,
        }
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self {
            k: config.clusters,
            seed: config.seed,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }

    /// Partition `points` into `k` clusters
    ///
    /// Clusters are returned sorted by descending population; equal
    /// populations keep their initialisation order. A cluster that ends up
    /// empty keeps its last centroid and reports population 0.
    ///
    /// # Errors
    ///
    /// `MetadataError::Clustering` if there are fewer points than clusters.
    pub fn fit(&self, points: &[Lab]) -> Result<Vec<Cluster>> {
        if self.k == 0 {
            return Err(MetadataError::invalid_parameter("clusters", 0));
        }
        if points.len() < self.k {
            return Err(MetadataError::Clustering {
                reason: format!(
                    "{} pixel(s) is fewer than {} clusters",
                    points.len(),
                    self.k
                ),
            });
        }

        let mut rng = Pcg64::seed_from_u64(self.seed);
        let mut centroids = self.init_plus_plus(points, &mut rng);

        for _iteration in 0..self.max_iterations {
            let mut sums = vec![[0.0f64; 3]; self.k];
            let mut counts = vec![0usize; self.k];

            for point in points {
                let nearest = nearest_centroid(*point, &centroids);
                sums[nearest][0] += point.l as f64;
                sums[nearest][1] += point.a as f64;
                sums[nearest][2] += point.b as f64;
                counts[nearest] += 1;
            }

            let mut max_shift = 0.0f32;
            for (idx, centroid) in centroids.iter_mut().enumerate() {
                if counts[idx] == 0 {
                    continue;
                }
                let n = counts[idx] as f64;
                let updated = Lab::new(
                    (sums[idx][0] / n) as f32,
                    (sums[idx][1] / n) as f32,
                    (sums[idx][2] / n) as f32,
                );
                max_shift = max_shift.max(distance_squared(*centroid, updated));
                *centroid = updated;
            }

            if max_shift <= self.tolerance {
                break;
            }
        }

        let mut populations = vec![0usize; self.k];
        for point in points {
            populations[nearest_centroid(*point, &centroids)] += 1;
        }

        let mut clusters: Vec<Cluster> = centroids
            .into_iter()
            .zip(populations)
            .map(|(centroid, population)| Cluster { centroid, population })
            .collect();
        clusters.sort_by(|a, b| b.population.cmp(&a.population));

        Ok(clusters)
    }

    /// K-means++: each further centroid is drawn with probability
    /// proportional to its squared distance from the nearest chosen one
    fn init_plus_plus(&self, points: &[Lab], rng: &mut Pcg64) -> Vec<Lab> {
        let mut centroids = Vec::with_capacity(self.k);
        centroids.push(points[rng.gen_range(0..points.len())]);

        let mut min_dist: Vec<f64> = points
            .iter()
            .map(|p| distance_squared(*p, centroids[0]) as f64)
            .collect();

        while centroids.len() < self.k {
            let total: f64 = min_dist.iter().sum();

            // All points coincide with a centroid already; any pick is as good
            let chosen = if total <= 0.0 {
                rng.gen_range(0..points.len())
            } else {
                let target = rng.gen::<f64>() * total;
                let mut acc = 0.0;
                min_dist
                    .iter()
                    .position(|d| {
                        acc += d;
                        acc > target
                    })
                    .unwrap_or(points.len() - 1)
            };

            let centroid = points[chosen];
            centroids.push(centroid);

            for (dist, point) in min_dist.iter_mut().zip(points) {
                *dist = dist.min(distance_squared(*point, centroid) as f64);
            }
        }

        centroids
    }
}

fn nearest_centroid(point: Lab, centroids: &[Lab]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = distance_squared(point, *centroid);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best
}
