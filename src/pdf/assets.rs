//! Optional brand assets.
//!
//! The brand mark and signature are inputs the deployment may or may not
//! ship. Absence (or an unreadable file) is a sanctioned degradation, not
//! an error: the renderer substitutes spacing for the header mark and
//! omits the watermark and signature entirely.

use printpdf::image_crate::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

pub struct Assets {
    pub logo: Option<DynamicImage>,
    pub signature: Option<DynamicImage>,
}

impl Assets {
    /// No assets at all; rendering must still succeed.
    pub fn none() -> Self {
        Self { logo: None, signature: None }
    }

    pub fn load(dir: &Path) -> Self {
        Self {
            logo: load_image(&dir.join("logo.png")),
            signature: load_image(&dir.join("signature.png")),
        }
    }
}

fn load_image(path: &Path) -> Option<DynamicImage> {
    if !path.exists() {
        tracing::debug!("asset not present, skipping: {}", path.display());
        return None;
    }
    match printpdf::image_crate::open(path) {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!("unreadable asset {}: {}", path.display(), err);
            None
        }
    }
}

/// Composites an image onto a white background at the given strength
/// (1.0 keeps it as-is, 0.1 yields a pale watermark). PDF alpha channels
/// are sidestepped entirely, which also keeps the output byte-stable.
pub fn flatten_onto_white(image: &DynamicImage, strength: f64) -> DynamicImage {
    let rgba = image.to_rgba8();
    let mut flat = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = f64::from(pixel[3]) / 255.0 * strength;
        let blend = |c: u8| -> u8 {
            let v = f64::from(c) * alpha + 255.0 * (1.0 - alpha);
            v.round().clamp(0.0, 255.0) as u8
        };
        flat.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }

    DynamicImage::ImageRgb8(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::image_crate::Rgba;

    #[test]
    fn full_strength_keeps_opaque_pixels() {
        let mut src = printpdf::image_crate::RgbaImage::new(1, 1);
        src.put_pixel(0, 0, Rgba([10, 200, 30, 255]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(src), 1.0).to_rgb8();
        assert_eq!(flat.get_pixel(0, 0).0, [10, 200, 30]);
    }

    #[test]
    fn low_strength_fades_toward_white() {
        let mut src = printpdf::image_crate::RgbaImage::new(1, 1);
        src.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(src), 0.1).to_rgb8();
        // 10% black over white is a light gray
        assert_eq!(flat.get_pixel(0, 0).0, [230, 230, 230]);
    }

    #[test]
    fn transparent_pixels_become_white() {
        let mut src = printpdf::image_crate::RgbaImage::new(1, 1);
        src.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(src), 1.0).to_rgb8();
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn missing_file_yields_none() {
        assert!(load_image(Path::new("/definitely/not/here.png")).is_none());
    }
}
