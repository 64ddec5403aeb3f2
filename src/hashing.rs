//! Perceptual hashes
//!
//! Three independent fingerprints, each stored as lowercase hex:
//! - `phash`: DCT preprocessing, median threshold (structure / frequency)
//! - `ahash`: mean threshold on a downscaled grayscale image (brightness)
//! - `dhash`: horizontal neighbour comparison (gradients / edges)
//!
//! With the default 8×8 grid each hash is 64 bits, 16 hex characters.
//! Visually similar images give hashes with a small Hamming distance.

use image::DynamicImage;
use image_hasher::{BitOrder, HashAlg, Hasher, HasherConfig};

/// The hash algorithms written to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    Perceptual,
    Average,
    Difference,
}

impl HashKind {
    pub const ALL: [HashKind; 3] = [HashKind::Perceptual, HashKind::Average, HashKind::Difference];

    /// Catalog field this hash is stored under
    pub fn field_name(&self) -> &'static str {
        match self {
            HashKind::Perceptual => crate::constants::fields::PHASH,
            HashKind::Average => crate::constants::fields::AHASH,
            HashKind::Difference => crate::constants::fields::DHASH,
        }
    }

    fn hasher(&self, hash_size: u32) -> Hasher {
        // First bit in the high position of each byte, as imagehash writes it
        let config = HasherConfig::new()
            .hash_size(hash_size, hash_size)
            .bit_order(BitOrder::MsbFirst);
        match self {
            HashKind::Perceptual => config.hash_alg(HashAlg::Median).preproc_dct(),
            HashKind::Average => config.hash_alg(HashAlg::Mean),
            HashKind::Difference => config.hash_alg(HashAlg::Gradient),
        }
        .to_hasher()
    }
}

/// A configured hasher for one [`HashKind`]
pub struct PerceptualHasher {
    hasher: Hasher,
}

impl PerceptualHasher {
    pub fn new(kind: HashKind, hash_size: u32) -> Self {
        Self {
            hasher: kind.hasher(hash_size),
        }
    }

    /// Hash `image` and encode the bits as lowercase hex
    pub fn hash_hex(&self, image: &DynamicImage) -> String {
        let hash = self.hasher.hash_image(image);
        to_hex(hash.as_bytes())
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Number of differing bits between two hex hashes of equal length
///
/// Returns `None` if either string is not valid hex or the lengths differ.
pub fn hamming_distance(a: &str, b: &str) -> Option<u32> {
    if a.len() != b.len() || a.len() % 2 != 0 {
        return None;
    }
    let mut distance = 0;
    for i in (0..a.len()).step_by(2) {
        let x = u8::from_str_radix(a.get(i..i + 2)?, 16).ok()?;
        let y = u8::from_str_radix(b.get(i..i + 2)?, 16).ok()?;
        distance += (x ^ y).count_ones();
    }
    Some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32, invert: bool) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, _| {
            let v = (x * 255 / (width - 1)) as u8;
            let v = if invert { 255 - v } else { v };
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_field_names() {
        assert_eq!(HashKind::Perceptual.field_name(), "phash");
        assert_eq!(HashKind::Average.field_name(), "ahash");
        assert_eq!(HashKind::Difference.field_name(), "dhash");
    }

    #[test]
    fn test_ahash_bit_layout_half_black_half_white() {
        let img = RgbImage::from_fn(64, 64, |x, _| {
            if x < 32 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let hex = PerceptualHasher::new(HashKind::Average, 8).hash_hex(&DynamicImage::ImageRgb8(img));

        // Each row: four dark columns then four bright ones, first column in the high bit
        assert_eq!(hex, "0f0f0f0f0f0f0f0f");
    }

    #[test]
    fn test_hash_is_64_bit_hex() {
        let img = gradient(64, 48, false);
        for kind in HashKind::ALL {
            let hex = PerceptualHasher::new(kind, 8).hash_hex(&img);
            assert_eq!(hex.len(), 16, "{:?} produced {}", kind, hex);
            assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_hash_stable_across_scale() {
        let hasher = PerceptualHasher::new(HashKind::Average, 8);
        let small = hasher.hash_hex(&gradient(64, 64, false));
        let large = hasher.hash_hex(&gradient(256, 256, false));

        assert!(hamming_distance(&small, &large).unwrap() <= 4);
    }

    #[test]
    fn test_hash_differs_for_inverted_image() {
        let hasher = PerceptualHasher::new(HashKind::Difference, 8);
        let forward = hasher.hash_hex(&gradient(64, 64, false));
        let backward = hasher.hash_hex(&gradient(64, 64, true));

        assert!(hamming_distance(&forward, &backward).unwrap() > 16);
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance("00ff", "00ff"), Some(0));
        assert_eq!(hamming_distance("00ff", "01fe"), Some(2));
        assert_eq!(hamming_distance("00", "0000"), None);
        assert_eq!(hamming_distance("zz", "00"), None);
    }
}
