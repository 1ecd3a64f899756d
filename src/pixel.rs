//! Half-block pixel buffer: every terminal cell shows two stacked pixels.

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Blend towards `b` by `t_256 / 256`.
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = if t_256 > 256 { 256 } else { t_256 as i32 };
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn halve(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const SHADOW: Rgb = Rgb(30, 30, 30);

/// Text drawn over the pixels, in terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub fg: Rgb,
    /// Background; `None` picks up the pixel underneath.
    pub bg: Option<Rgb>,
}

// ── Buffer ──────────────────────────────────────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // terminal rows * 2
    px: Vec<Rgb>,
}

/// Tracks the terminal's current colours so unchanged ones are not re-sent.
struct Pen {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
}

impl Pen {
    fn fg(&mut self, out: &mut impl Write, c: Rgb) -> io::Result<()> {
        if self.fg != Some(c) {
            queue!(out, style::SetForegroundColor(c.term()))?;
            self.fg = Some(c);
        }
        Ok(())
    }

    fn bg(&mut self, out: &mut impl Write, c: Rgb) -> io::Result<()> {
        if self.bg != Some(c) {
            queue!(out, style::SetBackgroundColor(c.term()))?;
            self.bg = Some(c);
        }
        Ok(())
    }

    fn reset(&mut self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, style::ResetColor)?;
        self.fg = None;
        self.bg = None;
        Ok(())
    }
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SHADOW; w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, SHADOW);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn dim(&mut self) {
        for c in &mut self.px {
            *c = c.halve();
        }
    }

    /// Write the frame, then the labels on top.
    pub fn render(&self, out: &mut impl Write, labels: &[Label]) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut pen = Pen { fg: None, bg: None };

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if top == bot {
                    pen.bg(out, top)?;
                    queue!(out, style::Print(' '))?;
                } else {
                    pen.fg(out, top)?;
                    pen.bg(out, bot)?;
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                pen.reset(out)?;
                queue!(out, style::Print("\r\n"))?;
            }
        }

        for label in labels {
            let row = label.row as usize;
            let col = label.col as usize;
            if row >= rows || col >= self.w {
                continue;
            }
            let fits = (self.w - col).min(label.text.chars().count());
            let text: String = label.text.chars().take(fits).collect();
            let bg = label.bg.unwrap_or_else(|| self.get(col, row * 2 + 1));
            queue!(out, cursor::MoveTo(label.col, label.row))?;
            pen.fg(out, label.fg)?;
            pen.bg(out, bg)?;
            queue!(out, style::Print(text))?;
        }

        pen.reset(out)?;
        out.flush()
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// Digit glyph scaled by `s`, with a drop shadow.
fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, s: i32, fg: Rgb) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32 * s;
                let py = y + row as i32 * s;
                buf.fill_rect(px + 1, py + 1, s, s, SHADOW);
                buf.fill_rect(px, py, s, s, fg);
            }
        }
    }
}

/// Number centred on `cx`, top edge at `y`.
pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, scale: i32, fg: Rgb) {
    let s = scale.max(1);
    let text = n.to_string();
    let total_w = (text.len() as i32 * 4 - 1) * s; // 3px per digit + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, b) in text.bytes().enumerate() {
        draw_digit(buf, start_x + i as i32 * 4 * s, y, b - b'0', s, fg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_ignores_out_of_bounds() {
        let mut buf = PixelBuf::new(4, 4);
        buf.set(-1, 0, WHITE);
        buf.set(0, 4, WHITE);
        buf.set(2, 3, WHITE);
        assert_eq!(buf.get(2, 3), WHITE);
        assert_eq!(buf.get(0, 0), SHADOW);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb(0, 100, 200);
        let b = Rgb(200, 100, 0);
        assert_eq!(Rgb::lerp(a, b, 0), a);
        assert_eq!(Rgb::lerp(a, b, 256), b);
        assert_eq!(Rgb::lerp(a, b, 999), b);
        assert_eq!(Rgb::lerp(a, b, 128), Rgb(100, 100, 100));
    }

    #[test]
    fn test_render_emits_half_blocks_and_labels() {
        let mut buf = PixelBuf::new(3, 2);
        buf.set(1, 0, WHITE);
        let mut out = Vec::new();
        let labels = [Label {
            col: 0,
            row: 0,
            text: "Score: 12345".to_string(),
            fg: WHITE,
            bg: None,
        }];
        buf.render(&mut out, &labels).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('\u{2580}'));
        // Clipped to the 3-column width.
        assert!(text.contains("Sco"));
        assert!(!text.contains("Scor"));
    }

    #[test]
    fn test_draw_number_marks_pixels() {
        let mut buf = PixelBuf::new(20, 10);
        draw_number(&mut buf, 10, 0, 7, 1, WHITE);
        let lit = (0..10)
            .flat_map(|y| (0..20).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get(x, y) == WHITE)
            .count();
        // Glyph 7 has seven lit cells.
        assert_eq!(lit, 7);
    }
}
