//! Scannable verification code.
//!
//! Pure function of the input URL plus fixed encoding parameters. The
//! module matrix comes from the `qrcode` crate; the bitmap is expanded
//! here so the module size and quiet-zone margin are explicit.

use printpdf::image_crate::{GrayImage, Luma};
use qrcode::types::Color as Module;
use qrcode::{EcLevel, QrCode};

const MODULE_PX: u32 = 10;
const QUIET_MODULES: u32 = 1;
const DARK: u8 = 0x00;
const LIGHT: u8 = 0xff;

/// Encodes the URL as a grayscale QR bitmap. Fails only if the payload
/// exceeds symbol capacity, which cannot happen for our short fixed URLs.
pub fn verification_code(url: &str) -> Result<GrayImage, qrcode::types::QrError> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let side = (modules + 2 * QUIET_MODULES) * MODULE_PX;
    let mut image = GrayImage::from_pixel(side, side, Luma([LIGHT]));

    for (index, module) in colors.iter().enumerate() {
        if *module != Module::Dark {
            continue;
        }
        let mx = (index as u32 % modules + QUIET_MODULES) * MODULE_PX;
        let my = (index as u32 / modules + QUIET_MODULES) * MODULE_PX;
        for dy in 0..MODULE_PX {
            for dx in 0..MODULE_PX {
                image.put_pixel(mx + dx, my + dy, Luma([DARK]));
            }
        }
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_square_with_quiet_zone() {
        let image = verification_code("https://veridia.io").unwrap();
        assert_eq!(image.width(), image.height());
        // side is always (modules + 2) * 10 px
        assert_eq!(image.width() % MODULE_PX, 0);
        let modules = image.width() / MODULE_PX - 2 * QUIET_MODULES;
        // version 1 is 21 modules; anything smaller is impossible
        assert!(modules >= 21);
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = verification_code("https://veridia.io").unwrap();
        let b = verification_code("https://veridia.io").unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        let image = verification_code("https://veridia.io").unwrap();
        // first module inside the quiet zone belongs to a finder pattern
        let inset = QUIET_MODULES * MODULE_PX + MODULE_PX / 2;
        assert_eq!(image.get_pixel(inset, inset).0[0], DARK);
    }

    #[test]
    fn quiet_zone_is_light() {
        let image = verification_code("https://veridia.io").unwrap();
        assert_eq!(image.get_pixel(0, 0).0[0], LIGHT);
    }
}
