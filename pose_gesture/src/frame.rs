//! Packed ARGB raster and the drawing helpers shared by the camera overlay
//! and the game renderer.
//!
//! Pixels are `0xAARRGGBB`, row-major, which is exactly the buffer layout
//! `minifb` blits.  All drawing clips to the frame; coordinates may be
//! negative or past the edge.

use crate::font::{self, ADVANCE, GLYPH_H, GLYPH_W};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Frame {
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Frame { width, height, pixels: vec![color; width * height] }
    }

    /// Wrap an existing buffer.  `None` if the length does not match.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u32>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Frame { width, height, pixels })
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }
    pub fn pixels_mut(&mut self) -> &mut [u32] { &mut self.pixels }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + w as isize).clamp(0, self.width as isize) as usize;
        let y1 = (y + h as isize).clamp(0, self.height as isize) as usize;
        if x0 >= x1 || y0 >= y1 { return; }
        for row in y0..y1 {
            self.pixels[row * self.width + x0..row * self.width + x1].fill(color);
        }
    }

    /// Rectangle outline, `thickness` pixels drawn inwards.
    pub fn draw_border(&mut self, x: isize, y: isize, w: usize, h: usize, thickness: usize, color: u32) {
        let t = thickness.min(w / 2 + 1).min(h / 2 + 1);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h as isize - t as isize, w, t, color);
        self.fill_rect(x, y, t, h, color);
        self.fill_rect(x + w as isize - t as isize, y, t, h, color);
    }

    /// Full-width horizontal line.
    pub fn draw_hline(&mut self, y: isize, thickness: usize, color: u32) {
        self.fill_rect(0, y, self.width, thickness, color);
    }

    /// Bresenham line, `thickness` pixels square brush.
    pub fn draw_line(&mut self, from: (isize, isize), to: (isize, isize), thickness: usize, color: u32) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = (thickness / 2) as isize;
        loop {
            self.fill_rect(x - half, y - half, thickness.max(1), thickness.max(1), color);
            if x == to.0 && y == to.1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    pub fn fill_disc(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw `text` with the 3×5 font, each font pixel `scale`×`scale`.
    pub fn draw_text(&mut self, text: &str, x: isize, y: isize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let g = font::glyph(ch);
            for (row, &bits) in g.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        self.fill_rect(
                            cx + (col * scale) as isize,
                            y + (row * scale) as isize,
                            scale, scale, color,
                        );
                    }
                }
            }
            cx += (ADVANCE * scale) as isize;
            if cx >= self.width as isize { break; }
        }
    }

    /// Height of one line of text at `scale`.
    pub fn text_height(scale: usize) -> usize { GLYPH_H * scale.max(1) }

    /// Copy `src` into the `w`×`h` box at (`x`, `y`), nearest-neighbour
    /// resampled, optionally flipped left/right.
    pub fn blit_scaled(&mut self, src: &Frame, x: isize, y: isize, w: usize, h: usize, mirror: bool) {
        if src.width == 0 || src.height == 0 || w == 0 || h == 0 { return; }
        for row in 0..h {
            let sy = row * src.height / h;
            for col in 0..w {
                let mut sx = col * src.width / w;
                if mirror { sx = src.width - 1 - sx; }
                let c = src.pixels[sy * src.width + sx];
                self.set_pixel(x + col as isize, y + row as isize, c);
            }
        }
    }

    /// Left/right flipped copy.
    pub fn mirrored(&self) -> Frame {
        let mut out = Frame::new(self.width, self.height, 0);
        for (dst, src) in out.pixels.chunks_mut(self.width.max(1)).zip(self.pixels.chunks(self.width.max(1))) {
            for (d, s) in dst.iter_mut().zip(src.iter().rev()) {
                *d = *s;
            }
        }
        out
    }
}

/// Pack an RGB triple as opaque ARGB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF00_0000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFFFF0000;

    #[test]
    fn from_pixels_checks_length() {
        assert!(Frame::from_pixels(2, 2, vec![0; 4]).is_some());
        assert!(Frame::from_pixels(2, 2, vec![0; 3]).is_none());
    }

    #[test]
    fn fill_rect_clips_at_edges() {
        let mut f = Frame::new(4, 4, 0);
        f.fill_rect(-2, -2, 4, 4, RED);
        assert_eq!(f.pixel(0, 0), Some(RED));
        assert_eq!(f.pixel(1, 1), Some(RED));
        assert_eq!(f.pixel(2, 2), Some(0));
        f.fill_rect(3, 3, 10, 10, RED);
        assert_eq!(f.pixel(3, 3), Some(RED));
    }

    #[test]
    fn fill_rect_fully_outside_is_noop() {
        let mut f = Frame::new(4, 4, 0);
        f.fill_rect(10, 10, 3, 3, RED);
        f.fill_rect(-10, 0, 3, 3, RED);
        assert!(f.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn border_leaves_interior() {
        let mut f = Frame::new(5, 5, 0);
        f.draw_border(0, 0, 5, 5, 1, RED);
        assert_eq!(f.pixel(0, 2), Some(RED));
        assert_eq!(f.pixel(4, 4), Some(RED));
        assert_eq!(f.pixel(2, 2), Some(0));
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut f = Frame::new(10, 10, 0);
        f.draw_line((1, 1), (8, 5), 1, RED);
        assert_eq!(f.pixel(1, 1), Some(RED));
        assert_eq!(f.pixel(8, 5), Some(RED));
    }

    #[test]
    fn text_sets_some_pixels() {
        let mut f = Frame::new(20, 10, 0);
        f.draw_text("1", 0, 0, 1, RED);
        // '1' = 010 / 110 / 010 / 010 / 111
        assert_eq!(f.pixel(1, 0), Some(RED));
        assert_eq!(f.pixel(0, 0), Some(0));
        assert_eq!(f.pixel(0, 4), Some(RED));
    }

    #[test]
    fn mirrored_flips_rows() {
        let f = Frame::from_pixels(3, 1, vec![1, 2, 3]).unwrap();
        assert_eq!(f.mirrored().pixels(), &[3, 2, 1]);
    }

    #[test]
    fn blit_scaled_doubles_and_mirrors() {
        let src = Frame::from_pixels(2, 1, vec![1, 2]).unwrap();
        let mut dst = Frame::new(4, 2, 0);
        dst.blit_scaled(&src, 0, 0, 4, 2, false);
        assert_eq!(&dst.pixels()[..4], &[1, 1, 2, 2]);
        dst.blit_scaled(&src, 0, 0, 4, 2, true);
        assert_eq!(&dst.pixels()[4..], &[2, 2, 1, 1]);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
        assert_eq!(rgb(255, 0, 255), 0xFFFF00FF);
    }
}
