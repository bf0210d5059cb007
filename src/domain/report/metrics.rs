//! Text measurement and word wrapping.
//!
//! Widths come from the standard Helvetica metrics so that wrapping matches
//! what the PDF renderer draws with its base-14 font.

/// Millimetres per point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Width used for characters outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

fn glyph_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` in millimetres at `size` points.
pub fn text_width(text: &str, size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| glyph_width(c) as u32).sum();
    units as f64 / 1000.0 * size * MM_PER_PT
}

/// Greedy word wrap to `max_width` millimetres.
///
/// Explicit line breaks are kept (a blank input line yields an empty output
/// line). Runs of whitespace collapse to single spaces. A word wider than the
/// line is split across lines character by character.
pub fn wrap_text(text: &str, max_width: f64, size: f64) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = split_long_word(word, max_width, size);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn split_long_word(word: &str, max_width: f64, size: f64) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for c in word.chars() {
        piece.push(c);
        if text_width(&piece, size) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }

    pieces.push(piece);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_font_size() {
        let small = text_width("Policy", 10.0);
        let large = text_width("Policy", 20.0);
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn narrow_letters_are_narrower() {
        assert!(text_width("iiii", 11.0) < text_width("mmmm", 11.0));
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text("Covered in full", 182.0, 11.0), vec!["Covered in full"]);
    }

    #[test]
    fn long_text_wraps_within_width() {
        let text = "Coverage for out-of-network providers is limited to sixty percent of costs \
                    and applies only after the annual deductible has been met in full.";
        let lines = wrap_text(text, 60.0, 11.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 11.0) <= 60.0, "too wide: {}", line);
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn explicit_breaks_and_blank_lines_are_kept() {
        let lines = wrap_text("first\n\nsecond", 182.0, 11.0);
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 50.0, 9.0), vec![String::new()]);
    }

    #[test]
    fn oversized_word_is_split() {
        let word = "a".repeat(200);
        let lines = wrap_text(&word, 20.0, 9.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(text_width(line, 9.0) <= 20.0);
        }
    }
}
