//! 5x7 block font, drawn as one rectangle per horizontal run of lit pixels.

use glam::{vec2, Vec2};

use crate::collision::Rect;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
/// Glyph width plus one column of spacing.
const ADVANCE: usize = GLYPH_WIDTH + 1;

type Glyph = [&'static str; GLYPH_HEIGHT];

const BLANK: Glyph = [".....", ".....", ".....", ".....", ".....", ".....", "....."];

/// Lowercase letters use the uppercase shapes; unknown characters are blank.
pub fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        'A' => [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'B' => ["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."],
        'C' => [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."],
        'D' => ["####.", "#...#", "#...#", "#...#", "#...#", "#...#", "####."],
        'E' => ["#####", "#....", "#....", "####.", "#....", "#....", "#####"],
        'F' => ["#####", "#....", "#....", "####.", "#....", "#....", "#...."],
        'G' => [".###.", "#...#", "#....", "#.###", "#...#", "#...#", ".####"],
        'H' => ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'I' => [".###.", "..#..", "..#..", "..#..", "..#..", "..#..", ".###."],
        'J' => ["..###", "...#.", "...#.", "...#.", "...#.", "#..#.", ".##.."],
        'K' => ["#...#", "#..#.", "#.#..", "##...", "#.#..", "#..#.", "#...#"],
        'L' => ["#....", "#....", "#....", "#....", "#....", "#....", "#####"],
        'M' => ["#...#", "##.##", "#.#.#", "#.#.#", "#...#", "#...#", "#...#"],
        'N' => ["#...#", "#...#", "##..#", "#.#.#", "#..##", "#...#", "#...#"],
        'O' => [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'P' => ["####.", "#...#", "#...#", "####.", "#....", "#....", "#...."],
        'Q' => [".###.", "#...#", "#...#", "#...#", "#.#.#", "#..#.", ".##.#"],
        'R' => ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"],
        'S' => [".####", "#....", "#....", ".###.", "....#", "....#", "####."],
        'T' => ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'U' => ["#...#", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'V' => ["#...#", "#...#", "#...#", "#...#", "#...#", ".#.#.", "..#.."],
        'W' => ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "#.#.#", ".#.#."],
        'X' => ["#...#", "#...#", ".#.#.", "..#..", ".#.#.", "#...#", "#...#"],
        'Y' => ["#...#", "#...#", ".#.#.", "..#..", "..#..", "..#..", "..#.."],
        'Z' => ["#####", "....#", "...#.", "..#..", ".#...", "#....", "#####"],
        '0' => [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."],
        '1' => ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
        '2' => [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
        '3' => ["####.", "....#", "....#", ".###.", "....#", "....#", "####."],
        '4' => ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
        '5' => ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
        '6' => [".###.", "#....", "#....", "####.", "#...#", "#...#", ".###."],
        '7' => ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
        '8' => [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
        '9' => [".###.", "#...#", "#...#", ".####", "....#", "....#", ".###."],
        ':' => [".....", "..#..", "..#..", ".....", "..#..", "..#..", "....."],
        '-' => [".....", ".....", ".....", ".###.", ".....", ".....", "....."],
        '/' => ["....#", "....#", "...#.", "..#..", ".#...", "#....", "#...."],
        '&' => [".##..", "#..#.", "#.#..", ".#...", "#.#.#", "#..#.", ".##.#"],
        '.' => [".....", ".....", ".....", ".....", ".....", ".....", "..#.."],
        ',' => [".....", ".....", ".....", ".....", ".##..", "..#..", ".#..."],
        '!' => ["..#..", "..#..", "..#..", "..#..", "..#..", ".....", "..#.."],
        _ => BLANK,
    }
}

/// Size of one font pixel for a line `size` pixels tall.
pub fn pixel_size(size: f32) -> f32 {
    size / GLYPH_HEIGHT as f32
}

pub fn text_width(text: &str, size: f32) -> f32 {
    let columns = (text.chars().count() * ADVANCE).saturating_sub(1);
    columns as f32 * pixel_size(size)
}

/// Rectangles covering `text` with its top-left corner at `origin`, in a y-down space.
pub fn layout(text: &str, origin: Vec2, size: f32) -> Vec<Rect> {
    let px = pixel_size(size);
    let mut rects = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let left = origin.x + (i * ADVANCE) as f32 * px;
        for (row, line) in glyph(c).iter().enumerate() {
            let y = origin.y + row as f32 * px;
            let mut start = None;
            // Trailing '.' closes a run ending in the last column.
            for (col, lit) in line.bytes().map(|b| b == b'#').chain([false]).enumerate() {
                match (lit, start) {
                    (true, None) => start = Some(col),
                    (false, Some(from)) => {
                        rects.push(Rect::new(
                            vec2(left + from as f32 * px, y),
                            vec2((col - from) as f32 * px, px),
                        ));
                        start = None;
                    }
                    _ => {}
                }
            }
        }
    }
    rects
}

/// Text as rows of `#` and `.`, one line per font row.
pub fn render_ascii(text: &str) -> String {
    (0..GLYPH_HEIGHT)
        .map(|row| {
            text.chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(".")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_rows_are_five_wide() {
        let chars = ('A'..='Z').chain('0'..='9').chain(":-/&.,!".chars());
        for c in chars {
            let glyph = glyph(c);
            assert!(glyph.iter().all(|row| row.len() == GLYPH_WIDTH), "{c:?}");
            assert_ne!(glyph, BLANK, "{c:?}");
        }
        assert_eq!(glyph('r'), glyph('R'));
        assert_eq!(glyph(' '), BLANK);
    }

    #[test]
    fn ascii_rendering() {
        insta::assert_snapshot!(render_ascii("Hi"), @r###"
        #...#..###.
        #...#...#..
        #...#...#..
        #####...#..
        #...#...#..
        #...#...#..
        #...#..###.
        "###);
    }

    #[test]
    fn runs_become_rectangles() {
        let rects = layout("I", vec2(10., 20.), 7.);
        assert_eq!(rects.len(), 7);
        assert_eq!(rects[0], Rect::new(vec2(11., 20.), vec2(3., 1.)));
        assert_eq!(rects[1], Rect::new(vec2(12., 21.), vec2(1., 1.)));
        assert_eq!(rects[6], Rect::new(vec2(11., 26.), vec2(3., 1.)));
    }

    #[test]
    fn width_scales_with_size() {
        assert_eq!(text_width("", 14.), 0.);
        assert_eq!(text_width("A", 7.), 5.);
        assert_eq!(text_width("AB", 14.), 22.);
    }
}
