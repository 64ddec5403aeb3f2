//! Named metadata field computers
//!
//! A [`FieldRegistry`] maps catalog field names to compute functions. The
//! set of registered names is also the set of tracked fields used to decide
//! whether a panel needs an update, so adding a field is a single
//! [`FieldRegistry::register`] call.
//!
//! Every computer receives the same [`ImageSample`]: the image is decoded
//! once per panel, and the Lab thumbnail is built on first use and shared.

use std::cell::OnceCell;
use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use log::debug;
use palette::Lab;
use serde_json::{json, Map, Value};

use crate::color::{ColorAnalyzer, ColorConverter};
use crate::config::EnrichConfig;
use crate::constants::{fields, ROUND_DECIMALS};
use crate::error::Result;
use crate::hashing::{HashKind, PerceptualHasher};
use crate::image_loader;
use crate::color::analysis::round_to;

/// Computed fields for one image, in registration order
pub type MetadataRecord = Map<String, Value>;

/// Compute function for a single field
pub type ComputeFn = Box<dyn Fn(&ImageSample) -> Result<Value>>;

/// A decoded image plus lazily derived views of it
pub struct ImageSample {
    image: DynamicImage,
    thumbnail_side: u32,
    thumbnail_lab: OnceCell<Vec<Lab>>,
}

impl ImageSample {
    pub fn new(image: DynamicImage, thumbnail_side: u32) -> Self {
        Self {
            image,
            thumbnail_side,
            thumbnail_lab: OnceCell::new(),
        }
    }

    /// Decode the image at `path`
    pub fn open(path: &Path, thumbnail_side: u32) -> Result<Self> {
        Ok(Self::new(image_loader::load_image(path)?, thumbnail_side))
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Lab pixels of the downsampled thumbnail, row-major
    pub fn thumbnail_lab(&self) -> &[Lab] {
        self.thumbnail_lab.get_or_init(|| {
            let thumb = image_loader::downsample(&self.image, self.thumbnail_side);
            ColorConverter::new().image_to_lab(&thumb)
        })
    }
}

struct FieldEntry {
    name: String,
    compute: ComputeFn,
}

/// Ordered field name → compute function table
pub struct FieldRegistry {
    entries: Vec<FieldEntry>,
    thumbnail_side: u32,
}

impl FieldRegistry {
    /// An empty registry; images are thumbnailed to `thumbnail_side`
    pub fn empty(thumbnail_side: u32) -> Self {
        Self {
            entries: Vec::new(),
            thumbnail_side,
        }
    }

    /// Registry for the standard gallery fields
    ///
    /// `width`, `height`, `phash`, `ahash`, `dhash`, `dominantColors`,
    /// `colorfulness`, parameterised by `config`.
    pub fn standard(config: &EnrichConfig) -> Self {
        let mut registry = Self::empty(config.thumbnail.max_side);

        registry.register(fields::WIDTH, |sample| Ok(json!(sample.image().width())));
        registry.register(fields::HEIGHT, |sample| Ok(json!(sample.image().height())));

        for kind in HashKind::ALL {
            let hasher = PerceptualHasher::new(kind, config.hashing.hash_size);
            registry.register(kind.field_name(), move |sample| {
                Ok(Value::String(hasher.hash_hex(sample.image())))
            });
        }

        let analyzer = ColorAnalyzer::with_config(&config.clustering);
        registry.register(fields::DOMINANT_COLORS, move |sample| {
            let colors = analyzer.dominant_colors(sample.thumbnail_lab())?;
            let triples: Vec<[f64; 3]> = colors.iter().map(|c| c.rounded()).collect();
            Ok(json!(triples))
        });

        let analyzer = ColorAnalyzer::with_config(&config.clustering);
        registry.register(fields::COLORFULNESS, move |sample| {
            let score = analyzer.colorfulness(sample.thumbnail_lab())?;
            Ok(json!(round_to(score, ROUND_DECIMALS)))
        });

        registry
    }

    /// Add a computer for `name`, replacing any existing one in place
    pub fn register<F>(&mut self, name: impl Into<String>, compute: F) -> &mut Self
    where
        F: Fn(&ImageSample) -> Result<Value> + 'static,
    {
        let name = name.into();
        let compute: ComputeFn = Box::new(compute);
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.compute = compute,
            None => self.entries.push(FieldEntry { name, compute }),
        }
        self
    }

    /// Names of the tracked fields, in registration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode `image_path` and run every registered computer
    ///
    /// # Errors
    ///
    /// The first error from decoding or from any computer; no partial
    /// record is returned.
    pub fn compute(&self, image_path: &Path) -> Result<MetadataRecord> {
        let sample = ImageSample::open(image_path, self.thumbnail_side)?;
        self.compute_sample(&sample)
    }

    /// Run every registered computer over an already decoded sample
    pub fn compute_sample(&self, sample: &ImageSample) -> Result<MetadataRecord> {
        let mut record = MetadataRecord::new();
        for entry in &self.entries {
            let started = Instant::now();
            let value = (entry.compute)(sample)?;
            debug!("{} computed in {:?}", entry.name, started.elapsed());
            record.insert(entry.name.clone(), value);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use image::{Rgb, RgbImage};

    fn three_blocks() -> DynamicImage {
        let img = RgbImage::from_fn(60, 20, |x, _| match x / 20 {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_standard_field_order() {
        let registry = FieldRegistry::standard(&EnrichConfig::default_gallery());
        let names: Vec<&str> = registry.field_names().collect();
        assert_eq!(names, fields::TRACKED.to_vec());
    }

    #[test]
    fn test_standard_compute_sample() {
        let registry = FieldRegistry::standard(&EnrichConfig::default_gallery());
        let sample = ImageSample::new(three_blocks(), 64);

        let record = registry.compute_sample(&sample).unwrap();

        assert_eq!(record["width"], json!(60));
        assert_eq!(record["height"], json!(20));
        assert_eq!(record["phash"].as_str().unwrap().len(), 16);
        assert_eq!(record["dominantColors"].as_array().unwrap().len(), 3);
        assert!(record["colorfulness"].as_f64().unwrap() > 20.0);
    }

    #[test]
    fn test_thumbnail_is_bounded() {
        let big = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 150, Rgb([1, 2, 3])));
        let sample = ImageSample::new(big, 64);
        assert_eq!(sample.thumbnail_lab().len(), 64 * 32);
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = FieldRegistry::empty(64);
        registry.register("width", |_| Ok(json!(1)));
        registry.register("answer", |_| Ok(json!(42)));
        registry.register("width", |_| Ok(json!(2)));

        assert_eq!(registry.len(), 2);
        let record = registry
            .compute_sample(&ImageSample::new(three_blocks(), 64))
            .unwrap();
        assert_eq!(record["width"], json!(2));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["width", "answer"]);
    }

    #[test]
    fn test_compute_propagates_first_error() {
        let mut registry = FieldRegistry::empty(64);
        registry.register("ok", |_| Ok(json!(true)));
        registry.register("broken", |_| Err(MetadataError::Processing("boom".into())));

        let result = registry.compute_sample(&ImageSample::new(three_blocks(), 64));
        assert!(matches!(result, Err(MetadataError::Processing(_))));
    }

    #[test]
    fn test_compute_missing_file() {
        let registry = FieldRegistry::standard(&EnrichConfig::default_gallery());
        assert!(registry.compute(Path::new("no/such/image.png")).is_err());
    }
}
