//! Color space conversion utilities
//!
//! sRGB (8-bit) to CIE L*a*b* under D65, via `palette`. L* spans [0, 100];
//! a* and b* are roughly [-128, 127].

use image::DynamicImage;
use palette::{FromColor, Lab, Srgb};

/// Converts pixels into CIE Lab
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert RGB (0-255) to Lab color space
    ///
    /// # Arguments
    ///
    /// * `r`, `g`, `b` - RGB values in range [0, 255]
    ///
    /// # Returns
    ///
    /// Lab color in D65 illuminant
    pub fn rgb_to_lab(&self, r: u8, g: u8, b: u8) -> Lab {
        let srgb = Srgb::new(r, g, b).into_format::<f32>();
        Lab::from_color(srgb)
    }

    /// Convert every pixel of `image` to Lab, row-major
    ///
    /// Alpha is discarded; grayscale and 16-bit images are first widened or
    /// narrowed to 8-bit RGB.
    pub fn image_to_lab(&self, image: &DynamicImage) -> Vec<Lab> {
        image
            .to_rgb8()
            .pixels()
            .map(|p| self.rgb_to_lab(p[0], p[1], p[2]))
            .collect()
    }
}

/// Squared Euclidean distance in Lab
pub(crate) fn distance_squared(lab1: Lab, lab2: Lab) -> f32 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    dl * dl + da * da + db * db
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_rgb_to_lab_black() {
        let converter = ColorConverter::new();
        let lab = converter.rgb_to_lab(0, 0, 0);
        assert!(lab.l < 1.0);
    }

    #[test]
    fn test_rgb_to_lab_white() {
        let converter = ColorConverter::new();
        let lab = converter.rgb_to_lab(255, 255, 255);
        assert!(lab.l > 99.0);
        assert!(lab.a.abs() < 1.0);
        assert!(lab.b.abs() < 1.0);
    }

    #[test]
    fn test_rgb_to_lab_primaries() {
        let converter = ColorConverter::new();

        // Reference values: red (53.2, 80.1, 67.2), green (87.7, -86.2, 83.2), blue (32.3, 79.2, -107.9)
        let red = converter.rgb_to_lab(255, 0, 0);
        assert!((red.l - 53.2).abs() < 0.5);
        assert!((red.a - 80.1).abs() < 0.5);
        assert!((red.b - 67.2).abs() < 0.5);

        let green = converter.rgb_to_lab(0, 255, 0);
        assert!((green.l - 87.7).abs() < 0.5);
        assert!(green.a < -80.0);

        let blue = converter.rgb_to_lab(0, 0, 255);
        assert!(blue.b < -100.0);
    }

    #[test]
    fn test_image_to_lab_ignores_alpha() {
        let converter = ColorConverter::new();
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));

        let pixels = converter.image_to_lab(&DynamicImage::ImageRgba8(img));
        assert_eq!(pixels.len(), 2);
        assert!((pixels[0].l - pixels[1].l).abs() < 1e-4);
    }

    #[test]
    fn test_distance_squared() {
        let lab1 = Lab::new(50.0, 0.0, 0.0);
        let lab2 = Lab::new(60.0, 10.0, 10.0);
        assert_eq!(distance_squared(lab1, lab1), 0.0);
        assert!((distance_squared(lab1, lab2) - 300.0).abs() < 1e-3);
    }
}
