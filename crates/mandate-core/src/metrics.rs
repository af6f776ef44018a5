//! Text metrics and encoding for the standard Helvetica faces
//!
//! Widths are the AFM advance widths (1/1000 em) for WinAnsi code points
//! 32..=126. Anything outside that range is measured as a digit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
}

impl FontFace {
    /// Resource name used in page content streams.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"F1",
            FontFace::Bold => b"F2",
        }
    }

    pub fn base_font(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"Helvetica",
            FontFace::Bold => b"Helvetica-Bold",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            FontFace::Regular => &HELVETICA_WIDTHS,
            FontFace::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const BULLET_WIDTH: u16 = 350;
const DASH_WIDTH: u16 = 556;
const DEFAULT_WIDTH: u16 = 556;

/// Map a character to its WinAnsi byte. Unsupported characters become `?`.
fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ => b'?',
    }
}

/// Encode text for a WinAnsi-encoded Type1 font.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn glyph_width(face: FontFace, byte: u8) -> u16 {
    match byte {
        32..=126 => face.widths()[(byte - 32) as usize],
        0x95 => BULLET_WIDTH,
        0x96 => DASH_WIDTH,
        0x97 => 1000,
        _ => DEFAULT_WIDTH,
    }
}

/// Rendered width of `text` in points.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|b| glyph_width(face, b) as u32)
        .sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii_passthrough() {
        assert_eq!(encode_win_ansi("Fee (Rs.)"), b"Fee (Rs.)".to_vec());
    }

    #[test]
    fn test_encode_bullet_and_unknown() {
        assert_eq!(encode_win_ansi("\u{2022} x"), vec![0x95, b' ', b'x']);
        assert_eq!(encode_win_ansi("\u{20b9}5"), b"?5".to_vec());
    }

    #[test]
    fn test_width_of_known_glyphs() {
        // "A" is 667 units in Helvetica, 722 in Helvetica-Bold
        assert!((text_width("A", FontFace::Regular, 10.0) - 6.67).abs() < 1e-4);
        assert!((text_width("A", FontFace::Bold, 10.0) - 7.22).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_not_narrower() {
        let text = "Capital Investment Subsidy";
        let bold = text_width(text, FontFace::Bold, 10.0);
        assert!(bold >= text_width(text, FontFace::Regular, 10.0));
    }

    #[test]
    fn test_width_scales_with_size() {
        let small = text_width("Mandate", FontFace::Regular, 10.0);
        let large = text_width("Mandate", FontFace::Regular, 20.0);
        assert!((large - 2.0 * small).abs() < 1e-3);
    }
}
