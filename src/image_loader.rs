//! Image loading and downsampling
//!
//! Decoding goes through the `image` crate. The container format is sniffed
//! from the file content, so a PNG saved with a `.jpg` extension still
//! decodes. Every format enabled in the `image` crate's default features is
//! accepted (JPEG, PNG, GIF first frame, WebP, TIFF, BMP, ICO, TGA, PNM,
//! QOI, DDS, HDR, EXR, AVIF).

use crate::error::{MetadataError, Result};
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Open and fully decode an image
///
/// # Errors
///
/// Returns `MetadataError::ImageLoad` if the file cannot be opened, the
/// format cannot be determined, or decoding fails.
///
/// # Example
///
/// ```rust,no_run
/// use gallery_metadata::image_loader::load_image;
/// use std::path::Path;
///
/// let img = load_image(Path::new("public/panels/001.png"))?;
/// println!("Loaded image: {}x{}", img.width(), img.height());
/// # Ok::<(), gallery_metadata::MetadataError>(())
/// ```
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path).map_err(|e| {
        MetadataError::image_load(format!("failed to open {}", path.display()), e)
    })?;

    let reader = reader.with_guessed_format().map_err(|e| {
        MetadataError::image_load(format!("failed to read {}", path.display()), e)
    })?;

    if reader.format().is_none() {
        return Err(MetadataError::ImageLoad {
            message: format!("unrecognized image format: {}", path.display()),
            source: None,
        });
    }

    reader.decode().map_err(|e| {
        MetadataError::image_load(format!("failed to decode {}", path.display()), e)
    })
}

/// Downsample so the longest side is at most `max_side`, keeping aspect ratio
///
/// Images already within the bound are returned unchanged; nothing is
/// upscaled.
pub fn downsample(image: &DynamicImage, max_side: u32) -> DynamicImage {
    if image.width().max(image.height()) <= max_side {
        return image.clone();
    }
    image.thumbnail(max_side, max_side)
}
