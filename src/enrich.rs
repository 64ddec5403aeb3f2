//! The enrichment pass
//!
//! One sequential sweep over the catalog: panels missing any tracked field
//! get every registered field recomputed from their image, and the catalog
//! is written back once at the end if anything changed.
//!
//! Failures on a single panel (missing file, undecodable image, clustering
//! failure) are logged, counted and skipped. Only catalog-level problems
//! end the run with an error.

use log::{debug, error, info, warn};
use serde_json::Value;

use crate::catalog::{Catalog, Panel};
use crate::config::EnrichConfig;
use crate::constants::fields;
use crate::error::{MetadataError, Result};
use crate::registry::{FieldRegistry, MetadataRecord};

/// Whether the catalog file was rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing was updated; the file is untouched
    NoChanges,
    /// At least one panel was updated and the file was rewritten
    ChangesWritten,
}

/// What happened to one panel that needed an update
#[derive(Debug, Clone, PartialEq)]
pub enum ItemStatus {
    Updated,
    MissingImage,
    Failed(String),
}

/// Per-panel result, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    /// Index of the panel in the catalog
    pub index: usize,
    /// The panel's `image` value, if it had one
    pub image: Option<String>,
    pub status: ItemStatus,
}

/// Result of a completed pass
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub updated: usize,
    pub errors: usize,
    pub outcome: RunOutcome,
    /// Only panels that needed an update appear here
    pub items: Vec<ItemOutcome>,
}

impl RunSummary {
    /// One-line report printed at the end of a run
    pub fn summary_line(&self) -> String {
        match self.outcome {
            RunOutcome::NoChanges => "No panels needed updating.".to_string(),
            RunOutcome::ChangesWritten => {
                format!("Updated {} panel(s). Errors: {}.", self.updated, self.errors)
            }
        }
    }
}

/// Enrich the catalog at `config.catalog_path` with the standard fields
///
/// # Errors
///
/// Catalog-level failures only: missing or malformed catalog, invalid
/// configuration, or a failed write.
///
/// # Example
///
/// ```rust,no_run
/// use gallery_metadata::{enrich, EnrichConfig};
///
/// let summary = enrich::run(&EnrichConfig::default_gallery())?;
/// println!("updated {} panel(s), {} error(s)", summary.updated, summary.errors);
/// # Ok::<(), gallery_metadata::MetadataError>(())
/// ```
pub fn run(config: &EnrichConfig) -> Result<RunSummary> {
    config.validate()?;
    let registry = FieldRegistry::standard(config);
    run_with_registry(config, &registry)
}

/// Enrich the catalog using a caller-supplied registry
///
/// The registry's field names define which fields are tracked.
pub fn run_with_registry(config: &EnrichConfig, registry: &FieldRegistry) -> Result<RunSummary> {
    let mut catalog = Catalog::load(&config.catalog_path)?;
    let tracked: Vec<&str> = registry.field_names().collect();

    let mut updated = 0;
    let mut errors = 0;
    let mut items = Vec::new();

    for (index, panel) in catalog.panels_mut().iter_mut().enumerate() {
        if !panel.needs_update(tracked.iter().copied()) {
            continue;
        }

        let image = panel.image().map(str::to_owned);
        let status = match process_panel(config, registry, panel) {
            Ok(record) => {
                info!("  OK: {}", describe_success(image.as_deref().unwrap_or("?"), &record));
                panel.merge(record);
                updated += 1;
                ItemStatus::Updated
            }
            Err(MetadataError::MissingImage { .. }) => {
                warn!("  SKIP (file not found): {}", image.as_deref().unwrap_or("?"));
                errors += 1;
                ItemStatus::MissingImage
            }
            Err(e) => {
                error!("  ERROR: {} → {}", image.as_deref().unwrap_or("<no image>"), e);
                errors += 1;
                ItemStatus::Failed(e.to_string())
            }
        };

        items.push(ItemOutcome { index, image, status });
    }

    if updated == 0 {
        return Ok(RunSummary {
            updated,
            errors,
            outcome: RunOutcome::NoChanges,
            items,
        });
    }

    catalog.save()?;
    debug!("wrote {}", config.catalog_path.display());

    Ok(RunSummary {
        updated,
        errors,
        outcome: RunOutcome::ChangesWritten,
        items,
    })
}

fn process_panel(
    config: &EnrichConfig,
    registry: &FieldRegistry,
    panel: &Panel,
) -> Result<MetadataRecord> {
    let relative = panel.image().ok_or_else(|| {
        MetadataError::Processing("panel has no `image` field".into())
    })?;

    let path = config.image_root.join(relative);
    if !path.exists() {
        return Err(MetadataError::MissingImage { path });
    }

    registry.compute(&path)
}

fn describe_success(image: &str, record: &MetadataRecord) -> String {
    let mut line = image.to_string();
    if let (Some(w), Some(h)) = (record.get(fields::WIDTH), record.get(fields::HEIGHT)) {
        line.push_str(&format!(" → {}x{}", w, h));
    }
    if let Some(Value::String(phash)) = record.get(fields::PHASH) {
        line.push_str(&format!(" phash={}", phash));
    }
    if let Some(c) = record.get(fields::COLORFULNESS) {
        line.push_str(&format!(" colorfulness={}", c));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn record(pairs: &[(&str, Value)]) -> MetadataRecord {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        map
    }

    #[test]
    fn test_describe_success() {
        let r = record(&[
            ("width", json!(640)),
            ("height", json!(480)),
            ("phash", json!("c3c3")),
            ("colorfulness", json!(12.5)),
        ]);
        assert_eq!(
            describe_success("panels/1.png", &r),
            "panels/1.png → 640x480 phash=c3c3 colorfulness=12.5"
        );
    }

    #[test]
    fn test_describe_success_custom_fields() {
        let r = record(&[("checksum", json!("abc"))]);
        assert_eq!(describe_success("a.png", &r), "a.png");
    }

    #[test]
    fn test_summary_line() {
        let mut summary = RunSummary {
            updated: 0,
            errors: 2,
            outcome: RunOutcome::NoChanges,
            items: Vec::new(),
        };
        assert_eq!(summary.summary_line(), "No panels needed updating.");

        summary.updated = 3;
        summary.outcome = RunOutcome::ChangesWritten;
        assert_eq!(summary.summary_line(), "Updated 3 panel(s). Errors: 2.");
    }

    #[test]
    fn test_any_compute_error_is_counted_per_panel() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("gallery.json");
        for name in ["a.png", "b.png"] {
            image::RgbImage::new(4, 4).save(dir.path().join(name)).unwrap();
        }
        std::fs::write(&catalog, r#"{"panels": [{"image": "a.png"}, {"image": "b.png"}]}"#).unwrap();

        let mut registry = FieldRegistry::empty(64);
        registry.register("checked", |_sample: &crate::registry::ImageSample| {
            Err(MetadataError::InvalidCatalog { reason: "raised by a field".into() })
        });
        let config = EnrichConfig::for_paths(&catalog, dir.path());

        let summary = run_with_registry(&config, &registry).unwrap();

        assert_eq!(summary.errors, 2);
        assert_eq!(summary.items.len(), 2);
        assert!(summary.items.iter().all(|i| matches!(i.status, ItemStatus::Failed(_))));
    }

    #[test]
    fn test_run_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let config = EnrichConfig::for_paths(dir.path().join("gallery.json"), dir.path());

        let result = run(&config);
        assert!(matches!(result, Err(MetadataError::CatalogNotFound { .. })));
    }

    #[test]
    fn test_run_panel_without_image_field() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("gallery.json");
        std::fs::write(&catalog, r#"{"panels": [{"title": "orphan"}]}"#).unwrap();

        let summary = run(&EnrichConfig::for_paths(&catalog, dir.path())).unwrap();

        assert_eq!(summary.errors, 1);
        assert_eq!(summary.outcome, RunOutcome::NoChanges);
        assert!(matches!(summary.items[0].status, ItemStatus::Failed(_)));
        assert_eq!(summary.items[0].image, None);
    }
}
