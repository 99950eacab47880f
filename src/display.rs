//! The `Display` trait: the pixel-rasterization collaborator named in §1 as
//! out of scope for the core, given a concrete boundary so the crate can
//! actually paint something. One implementation is a `ratatui` terminal
//! renderer (grounded on `MathWidget`/`CanvasMathWidget` in the teacher
//! crate); the other is an in-memory buffer used by tests and by headless
//! evaluation.

use ratatui::{buffer::Buffer as RBuffer, layout::Rect, style::Style};

pub trait Display {
    fn set_pixel(&mut self, x: i16, y: i16, on: bool);
    fn fill(&mut self, x: i16, y: i16, w: u16, h: u16, on: bool);
    fn draw_line(&mut self, x1: i16, y1: i16, x2: i16, y2: i16);
    fn draw_image(&mut self, x: i16, y: i16, w: u16, h: u16, bits: &[bool]);
    fn draw_string(&mut self, x: i16, y: i16, s: &[u8], small: bool, inverted: bool);
    fn clear(&mut self);
    fn present(&mut self);
}

/// A 1-bit back-buffer matching the original's 128x64 LCD, scaled down to a
/// width/height the caller chooses. Used for tests and for headless
/// evaluation where no terminal is attached.
#[derive(Debug, Clone)]
pub struct BufferDisplay {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<bool>,
    pub present_count: u32,
}

impl BufferDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, pixels: vec![false; width as usize * height as usize], present_count: 0 }
    }

    fn idx(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || y < 0 || x as u16 >= self.width || y as u16 >= self.height {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }
}

impl Display for BufferDisplay {
    fn set_pixel(&mut self, x: i16, y: i16, on: bool) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = on;
        }
    }

    fn fill(&mut self, x: i16, y: i16, w: u16, h: u16, on: bool) {
        for dy in 0..h as i16 {
            for dx in 0..w as i16 {
                self.set_pixel(x + dx, y + dy, on);
            }
        }
    }

    fn draw_line(&mut self, x1: i16, y1: i16, x2: i16, y2: i16) {
        // Bresenham, sufficient for the horizontal/vertical bars NEDA draws.
        let (mut x, mut y) = (x1, y1);
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, true);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_image(&mut self, x: i16, y: i16, w: u16, h: u16, bits: &[bool]) {
        for row in 0..h {
            for col in 0..w {
                let i = row as usize * w as usize + col as usize;
                if i < bits.len() && bits[i] {
                    self.set_pixel(x + col as i16, y + row as i16, true);
                }
            }
        }
    }

    fn draw_string(&mut self, x: i16, y: i16, s: &[u8], small: bool, inverted: bool) {
        let mut cx = x;
        for &b in s {
            let g = if small { crate::glyph::small_glyph(b) } else { crate::glyph::glyph(b) };
            self.fill(cx, y, g.width, g.height, !inverted);
            cx += g.width as i16 + 1;
        }
    }

    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
    }

    fn present(&mut self) {
        self.present_count += 1;
    }
}

/// Renders directly into a ratatui `Buffer` — each pixel maps to one
/// terminal cell, good enough for the calculator's working resolution.
pub struct TermDisplay<'a> {
    pub buf: &'a mut RBuffer,
    pub area: Rect,
    pub style: Style,
}

impl<'a> Display for TermDisplay<'a> {
    fn set_pixel(&mut self, x: i16, y: i16, on: bool) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (self.area.x + x as u16, self.area.y + y as u16);
        if x < self.area.right() && y < self.area.bottom() {
            let ch = if on { "#" } else { " " };
            self.buf.set_string(x, y, ch, self.style);
        }
    }

    fn fill(&mut self, x: i16, y: i16, w: u16, h: u16, on: bool) {
        for dy in 0..h as i16 {
            for dx in 0..w as i16 {
                self.set_pixel(x + dx, y + dy, on);
            }
        }
    }

    fn draw_line(&mut self, x1: i16, y1: i16, x2: i16, y2: i16) {
        if y1 == y2 {
            let (lo, hi) = (x1.min(x2), x1.max(x2));
            for x in lo..=hi {
                self.set_pixel(x, y1, true);
            }
        } else if x1 == x2 {
            let (lo, hi) = (y1.min(y2), y1.max(y2));
            for y in lo..=hi {
                self.set_pixel(x1, y, true);
            }
        }
    }

    fn draw_image(&mut self, x: i16, y: i16, w: u16, h: u16, bits: &[bool]) {
        for row in 0..h {
            for col in 0..w {
                let i = row as usize * w as usize + col as usize;
                if i < bits.len() && bits[i] {
                    self.set_pixel(x + col as i16, y + row as i16, true);
                }
            }
        }
    }

    fn draw_string(&mut self, x: i16, y: i16, s: &[u8], _small: bool, _inverted: bool) {
        let text: String = s.iter().map(|&b| b as char).collect();
        let (tx, ty) = (self.area.x as i16 + x, self.area.y as i16 + y);
        if tx >= 0 && ty >= 0 {
            self.buf.set_string(tx as u16, ty as u16, text, self.style);
        }
    }

    fn clear(&mut self) {}

    fn present(&mut self) {}
}
