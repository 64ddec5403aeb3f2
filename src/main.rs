// CLI entry for gallery-metadata
use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use gallery_metadata::{enrich, EnrichConfig};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "gallery-metadata",
    version,
    about = "Compute dimensions, perceptual hashes, dominant colors and colorfulness for gallery panels"
)]
struct Cli {
    /// JSON configuration file (paths, thumbnail, clustering, hashing)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Catalog file to enrich [default: public/data/gallery.json]
    #[arg(long, value_hint = ValueHint::FilePath)]
    catalog: Option<PathBuf>,

    /// Directory panel image paths are relative to [default: public]
    #[arg(long = "image-root", value_hint = ValueHint::DirPath)]
    image_root: Option<PathBuf>,
}

fn build_config(cli: &Cli) -> Result<EnrichConfig> {
    let mut cfg = match &cli.config {
        Some(path) => EnrichConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EnrichConfig::default_gallery(),
    };
    if let Some(v) = &cli.catalog { cfg.catalog_path = v.clone(); }
    if let Some(v) = &cli.image_root { cfg.image_root = v.clone(); }
    Ok(cfg)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = build_config(cli)?;
    let summary = enrich::run(&cfg)?;
    println!("{}", summary.summary_line());
    Ok(())
}
