//! Software raster the particles are painted onto.
//!
//! The canvas is never cleared between frames. Each frame lays a translucent
//! fill over everything (the trail) and then paints particles on top, so old
//! paint decays geometrically instead of disappearing.
//!
//! Pixels are stored as premultiplied RGBA floats. Compositing is plain
//! source-over: `dst = src + dst * (1 - src.a)`.

use std::path::Path;

use glam::Vec2;

use crate::error::ExportError;
use crate::palette::Color;

/// One color stop of a radial gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the radius, `0.0..=1.0`.
    pub offset: f32,
    pub rgb: [f32; 3],
    pub alpha: f32,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color, alpha: f32) -> Self {
        Self {
            offset,
            rgb: color.to_f32(),
            alpha,
        }
    }

    /// Fully transparent stop. Interpolation is premultiplied, so this fades
    /// a neighbouring color out without darkening it.
    pub fn transparent(offset: f32) -> Self {
        Self {
            offset,
            rgb: [0.0; 3],
            alpha: 0.0,
        }
    }

    fn premultiplied(&self) -> [f32; 4] {
        [
            self.rgb[0] * self.alpha,
            self.rgb[1] * self.alpha,
            self.rgb[2] * self.alpha,
            self.alpha,
        ]
    }
}

/// Sample premultiplied color at `t` from stops sorted by offset.
fn sample_gradient(stops: &[GradientStop], t: f32) -> [f32; 4] {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return [0.0; 4],
    };
    if t <= first.offset {
        return first.premultiplied();
    }
    if t >= last.offset {
        return last.premultiplied();
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let f = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            let (pa, pb) = (a.premultiplied(), b.premultiplied());
            return [
                pa[0] + (pb[0] - pa[0]) * f,
                pa[1] + (pb[1] - pa[1]) * f,
                pa[2] + (pb[2] - pa[2]) * f,
                pa[3] + (pb[3] - pa[3]) * f,
            ];
        }
    }
    last.premultiplied()
}

/// Radial backdrop shown behind the (initially transparent) canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    pub inner: Color,
    pub outer: Color,
}

impl Backdrop {
    /// Backdrop color at pixel `(x, y)`: `inner` at the center blending to
    /// `outer` at the farthest corner.
    pub fn sample(&self, x: f32, y: f32, width: f32, height: f32) -> [f32; 3] {
        let center = Vec2::new(width * 0.5, height * 0.5);
        let reach = center.length().max(f32::EPSILON);
        let t = (Vec2::new(x, y).distance(center) / reach).min(1.0);
        let (a, b) = (self.inner.to_f32(), self.outer.to_f32());
        [
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ]
    }
}

/// A premultiplied RGBA float raster.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas extent as a vector, the bounds particles bounce within.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Reallocate the backing buffer. Like resizing an HTML canvas, this
    /// discards the existing paint.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, [0.0; 4]);
    }

    /// Erase all paint.
    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    /// Premultiplied RGBA at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Composite a flat color over the whole canvas.
    pub fn fill(&mut self, color: Color, alpha: f32) {
        let rgb = color.to_f32();
        let src = [rgb[0] * alpha, rgb[1] * alpha, rgb[2] * alpha, alpha];
        let keep = 1.0 - alpha;
        for px in &mut self.pixels {
            for c in 0..4 {
                px[c] = src[c] + px[c] * keep;
            }
        }
    }

    /// Fill a disk with a radial gradient.
    ///
    /// The disk has radius `radius`; the gradient runs from the center out to
    /// `gradient_radius`, which may be larger than the disk (the outer stops
    /// are then clipped). Edge pixels get fractional coverage.
    pub fn fill_circle_gradient(
        &mut self,
        center: Vec2,
        radius: f32,
        gradient_radius: f32,
        stops: &[GradientStop],
        global_alpha: f32,
    ) {
        if !(radius > 0.0 && gradient_radius > 0.0 && global_alpha > 0.0) || self.pixels.is_empty() {
            return;
        }
        if !center.is_finite() {
            return;
        }

        let min_x = (center.x - radius - 1.0).floor().max(0.0) as u32;
        let min_y = (center.y - radius - 1.0).floor().max(0.0) as u32;
        let max_x = ((center.x + radius + 1.0).ceil().max(0.0) as u32).min(self.width);
        let max_y = ((center.y + radius + 1.0).ceil().max(0.0) as u32).min(self.height);

        for y in min_y..max_y {
            let row = y as usize * self.width as usize;
            for x in min_x..max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = p.distance(center);
                let coverage = (radius - d + 0.5).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let g = sample_gradient(stops, d / gradient_radius);
                let scale = global_alpha * coverage;
                let src = [g[0] * scale, g[1] * scale, g[2] * scale, g[3] * scale];
                let keep = 1.0 - src[3];
                let dst = &mut self.pixels[row + x as usize];
                for c in 0..4 {
                    dst[c] = src[c] + dst[c] * keep;
                }
            }
        }
    }

    /// Write the raw premultiplied pixels as RGBA8 into `out` (reused between
    /// frames for texture uploads).
    pub fn write_rgba8(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for px in &self.pixels {
            for c in px {
                out.push(to_u8(*c));
            }
        }
    }

    /// Flatten the canvas over `backdrop` into an opaque image.
    pub fn composite(&self, backdrop: &Backdrop) -> image::RgbaImage {
        let (w, h) = (self.width as f32, self.height as f32);
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let px = self.pixels[y as usize * self.width as usize + x as usize];
            let bg = backdrop.sample(x as f32 + 0.5, y as f32 + 0.5, w, h);
            let keep = 1.0 - px[3];
            image::Rgba([
                to_u8(px[0] + bg[0] * keep),
                to_u8(px[1] + bg[1] * keep),
                to_u8(px[2] + bg[2] * keep),
                255,
            ])
        })
    }

    /// Save the canvas, composited over `backdrop`, as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>, backdrop: &Backdrop) -> Result<(), ExportError> {
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::EmptyCanvas);
        }
        self.composite(backdrop).save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::glow_stops;

    const WHITE: Color = Color::rgb(255, 255, 255);

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.pixels().len(), 12);
        assert!(canvas.pixels().iter().all(|p| *p == [0.0; 4]));
        assert!(canvas.pixel(4, 0).is_none());
    }

    #[test]
    fn test_fill_converges_to_trail_color() {
        let mut canvas = Canvas::new(2, 2);
        let trail = Color::rgb(20, 20, 30);
        for _ in 0..400 {
            canvas.fill(trail, 0.08);
        }
        let px = canvas.pixel(1, 1).unwrap();
        let rgb = trail.to_f32();
        assert!((px[3] - 1.0).abs() < 1e-4);
        assert!((px[0] - rgb[0]).abs() < 1e-4);
        assert!((px[2] - rgb[2]).abs() < 1e-4);
    }

    #[test]
    fn test_fill_decays_existing_paint() {
        let mut canvas = Canvas::new(1, 1);
        canvas.fill(WHITE, 1.0);
        canvas.fill(Color::rgb(0, 0, 0), 0.08);
        let px = canvas.pixel(0, 0).unwrap();
        assert!((px[0] - 0.92).abs() < 1e-6);
        assert!((px[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gradient_sampling() {
        let stops = glow_stops(WHITE);
        assert_eq!(sample_gradient(&stops, 0.0), [1.0, 1.0, 1.0, 1.0]);
        let mid = sample_gradient(&stops, 0.35);
        assert!((mid[3] - 0.75).abs() < 1e-6);
        let edge = sample_gradient(&stops, 0.85);
        assert!((edge[3] - 0.25).abs() < 1e-6);
        // Premultiplied: color fades with alpha, never darker than alpha.
        assert!((edge[0] - edge[3]).abs() < 1e-6);
        assert_eq!(sample_gradient(&stops, 2.0), [0.0; 4]);
    }

    #[test]
    fn test_circle_paints_center_not_corners() {
        let mut canvas = Canvas::new(32, 32);
        let color = Color::rgb(255, 0, 0);
        canvas.fill_circle_gradient(Vec2::new(16.0, 16.0), 6.0, 9.0, &glow_stops(color), 0.9);

        let center = canvas.pixel(16, 16).unwrap();
        assert!(center[3] > 0.8);
        assert!(center[0] > 0.8);
        assert_eq!(center[1], 0.0);
        assert_eq!(canvas.pixel(0, 0).unwrap(), [0.0; 4]);
        assert_eq!(canvas.pixel(16, 25).unwrap(), [0.0; 4]);
    }

    #[test]
    fn test_circle_off_canvas_is_clipped() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_circle_gradient(Vec2::new(-50.0, 4.0), 5.0, 7.5, &glow_stops(WHITE), 1.0);
        canvas.fill_circle_gradient(Vec2::new(4.0, 500.0), 5.0, 7.5, &glow_stops(WHITE), 1.0);
        assert!(canvas.pixels().iter().all(|p| *p == [0.0; 4]));

        canvas.fill_circle_gradient(Vec2::new(0.0, 0.0), 3.0, 4.5, &glow_stops(WHITE), 1.0);
        assert!(canvas.pixel(0, 0).unwrap()[3] > 0.0);
    }

    #[test]
    fn test_zero_alpha_draw_is_noop() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_circle_gradient(Vec2::new(4.0, 4.0), 3.0, 4.5, &glow_stops(WHITE), 0.0);
        assert!(canvas.pixels().iter().all(|p| *p == [0.0; 4]));
    }

    #[test]
    fn test_resize_discards_paint() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill(WHITE, 1.0);
        canvas.resize(6, 2);
        assert_eq!(canvas.width(), 6);
        assert_eq!(canvas.pixels().len(), 12);
        assert!(canvas.pixels().iter().all(|p| *p == [0.0; 4]));
    }

    #[test]
    fn test_write_rgba8() {
        let mut canvas = Canvas::new(2, 1);
        canvas.fill(WHITE, 0.5);
        let mut bytes = Vec::new();
        canvas.write_rgba8(&mut bytes);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &[128, 128, 128, 128]);
    }

    #[test]
    fn test_composite_shows_backdrop_through_transparency() {
        let canvas = Canvas::new(3, 3);
        let backdrop = Backdrop {
            inner: Color::rgb(10, 20, 30),
            outer: Color::rgb(10, 20, 30),
        };
        let image = canvas.composite(&backdrop);
        assert_eq!(image.get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_backdrop_gradient_runs_center_to_corner() {
        let backdrop = Backdrop {
            inner: Color::rgb(0, 0, 0),
            outer: Color::rgb(255, 255, 255),
        };
        assert_eq!(backdrop.sample(50.0, 50.0, 100.0, 100.0), [0.0, 0.0, 0.0]);
        let corner = backdrop.sample(0.0, 0.0, 100.0, 100.0);
        assert!((corner[0] - 1.0).abs() < 1e-6);
    }
}
