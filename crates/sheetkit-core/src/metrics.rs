//! Advance widths for the two standard PDF fonts the sheets use.
//!
//! Widths are in thousandths of an em for the printable ASCII range
//! (0x20..=0x7E), taken from the Adobe core font metrics. Anything
//! outside that range is measured as an average glyph.

use crate::render::Font;

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn glyph_width(font: Font, ch: char) -> u16 {
    let table = match font {
        Font::Helvetica => &HELVETICA,
        Font::HelveticaBold => &HELVETICA_BOLD,
    };
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` in points.
pub fn string_width(text: &str, font: Font, size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(font, ch))).sum();
    f64::from(units) * size / 1000.0
}

/// Greedy word wrap. A single word wider than `max_width` is kept on its own
/// line rather than split.
pub fn wrap_text(text: &str, font: Font, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }

        let candidate = format!("{line} {word}");
        if string_width(&candidate, font, size) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::{string_width, wrap_text};
    use crate::render::Font;

    #[test]
    fn digits_are_half_an_em_wide() {
        let width = string_width("50.0", Font::Helvetica, 10.0);
        assert!((width - (556.0 * 3.0 + 278.0) / 100.0).abs() < 1e-9);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let regular = string_width("Full Paper", Font::Helvetica, 12.0);
        let bold = string_width("Full Paper", Font::HelveticaBold, 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("* Full Paper (05:29 PM)", Font::HelveticaBold, 12.0, 76.0);
        assert_eq!(lines, vec!["* Full Paper", "(05:29 PM)"]);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_text("W3", Font::HelveticaBold, 9.0, 76.0);
        assert_eq!(lines, vec!["W3"]);
        assert!(wrap_text("   ", Font::Helvetica, 9.0, 76.0).is_empty());
    }
}
