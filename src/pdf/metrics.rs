//! Text measurement for the two builtin faces the certificate uses.
//!
//! Widths come from the Adobe AFM files for Helvetica and Helvetica-Bold
//! (advance widths in 1/1000 em for the printable ASCII range). Characters
//! outside the table fall back to an average advance, which only affects
//! centering slop for exotic names, never correctness.

use printpdf::BuiltinFont;

const FALLBACK_WIDTH: u16 = 556;
const ASCENDER: f64 = 0.718;
const LINE_FACTOR: f64 = 1.15;

/// Advance widths for 0x20..=0x7E, Helvetica regular.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths for 0x20..=0x7E, Helvetica-Bold.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
}

impl FontFace {
    pub fn builtin(self) -> BuiltinFont {
        match self {
            FontFace::Helvetica => BuiltinFont::Helvetica,
            FontFace::HelveticaBold => BuiltinFont::HelveticaBold,
        }
    }

    fn table(self) -> &'static [u16; 95] {
        match self {
            FontFace::Helvetica => &HELVETICA,
            FontFace::HelveticaBold => &HELVETICA_BOLD,
        }
    }
}

/// Width of a single line of text in points at the given size.
pub fn text_width(text: &str, face: FontFace, size: f64) -> f64 {
    let table = face.table();
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (0x20..=0x7e).contains(&code) {
                u32::from(table[(code - 0x20) as usize])
            } else {
                u32::from(FALLBACK_WIDTH)
            }
        })
        .sum();
    f64::from(units) / 1000.0 * size
}

/// Distance from the top of a line to its baseline.
pub fn ascent(size: f64) -> f64 {
    size * ASCENDER
}

/// Vertical space one line of text occupies.
pub fn line_height(size: f64) -> f64 {
    size * LINE_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_width() {
        assert_eq!(text_width("", FontFace::Helvetica, 12.0), 0.0);
    }

    #[test]
    fn afm_spot_values() {
        // 'A' is 667/1000 em in Helvetica, 722/1000 em in the bold face.
        assert!((text_width("A", FontFace::Helvetica, 1000.0) - 667.0).abs() < 1e-9);
        assert!((text_width("A", FontFace::HelveticaBold, 1000.0) - 722.0).abs() < 1e-9);
        // space + digit
        assert!((text_width(" 0", FontFace::Helvetica, 1000.0) - 834.0).abs() < 1e-9);
    }

    #[test]
    fn bold_is_never_narrower() {
        let text = "Certificate of Accomplishment";
        assert!(
            text_width(text, FontFace::HelveticaBold, 12.0)
                >= text_width(text, FontFace::Helvetica, 12.0)
        );
    }

    #[test]
    fn width_scales_linearly_with_size() {
        let at_10 = text_width("Systems Design", FontFace::Helvetica, 10.0);
        let at_20 = text_width("Systems Design", FontFace::Helvetica, 20.0);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-9);
    }

    #[test]
    fn non_ascii_falls_back_instead_of_panicking() {
        let w = text_width("Zoë", FontFace::Helvetica, 12.0);
        assert!(w > 0.0);
    }
}
