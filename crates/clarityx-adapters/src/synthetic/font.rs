//! Built-in 5x7 bitmap glyphs.
//!
//! Each glyph is seven rows; the low five bits of a row are its columns,
//! most significant bit on the left.

use image::{Rgb, RgbImage};

/// Glyph width in font cells.
const GLYPH_WIDTH: u32 = 5;
/// Glyph height in font cells.
const GLYPH_HEIGHT: u32 = 7;
/// Blank cells between consecutive glyphs.
const SPACING: u32 = 1;

#[rustfmt::skip]
fn glyph(c: char) -> Option<[u8; GLYPH_HEIGHT as usize]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; 7],
        _ => return None,
    };
    Some(rows)
}

/// Draws `text` with its top-left corner at `(x, y)`, each font cell a
/// `scale`x`scale` block. Unknown characters render as blanks and pixels
/// outside the canvas are clipped.
pub fn draw_text(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let advance = (GLYPH_WIDTH + SPACING) * scale;
    let mut origin_x = x;

    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (row, bits) in (0u32..).zip(rows) {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        fill_cell(canvas, origin_x + col * scale, y + row * scale, scale, color);
                    }
                }
            }
        }
        origin_x = origin_x.saturating_add(advance);
    }
}

fn fill_cell(canvas: &mut RgbImage, x0: u32, y0: u32, scale: u32, color: Rgb<u8>) {
    let x_end = x0.saturating_add(scale).min(canvas.width());
    let y_end = y0.saturating_add(scale).min(canvas.height());
    for y in y0..y_end {
        for x in x0..x_end {
            canvas.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgb<u8> = Rgb([0, 0, 0]);

    fn ink_count(canvas: &RgbImage) -> usize {
        canvas.pixels().filter(|p| **p == INK).count()
    }

    #[test]
    fn test_every_letter_has_a_glyph() {
        for c in ('A'..='Z').chain('0'..='9') {
            let rows = glyph(c).unwrap_or([0; 7]);
            assert!(rows.iter().any(|&r| r != 0), "blank glyph for {c}");
            assert!(rows.iter().all(|&r| r < 0x20), "glyph {c} wider than 5 cells");
        }
    }

    #[test]
    fn test_lowercase_maps_to_uppercase() {
        assert_eq!(glyph('q'), glyph('Q'));
        assert!(glyph('~').is_none());
    }

    #[test]
    fn test_draw_scales_cells() {
        let mut small = RgbImage::from_pixel(20, 20, Rgb([255, 255, 255]));
        let mut big = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));
        draw_text(&mut small, "L", 0, 0, 1, INK);
        draw_text(&mut big, "L", 0, 0, 3, INK);

        // "L" is 7 cells of stem plus 4 more on the base row
        assert_eq!(ink_count(&small), 11);
        assert_eq!(ink_count(&big), 99);
    }

    #[test]
    fn test_glyph_fills_its_cell_box() {
        let mut canvas = RgbImage::from_pixel(30, 30, Rgb([255, 255, 255]));
        draw_text(&mut canvas, "H", 3, 4, 2, INK);

        let right = 3 + GLYPH_WIDTH * 2 - 1;
        let bottom = 4 + GLYPH_HEIGHT * 2 - 1;
        for (x, y) in [(3, 4), (right, 4), (3, bottom), (right, bottom)] {
            assert_eq!(*canvas.get_pixel(x, y), INK, "corner ({x}, {y})");
        }
        assert_ne!(*canvas.get_pixel(right + 1, 4), INK);
        assert_ne!(*canvas.get_pixel(3, bottom + 1), INK);
    }

    #[test]
    fn test_draw_clips_at_edges() {
        let mut canvas = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        draw_text(&mut canvas, "HELLO WORLD", 4, 4, 2, INK);
        assert!(ink_count(&canvas) > 0);
    }
}
