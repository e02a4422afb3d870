use image::{Rgba, RgbaImage, imageops};
use serde::{Deserialize, Serialize};

use super::SignatureError;
use super::encoding::encode_png_data_url;

/// A position in CSS pixels, relative to the surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D drawing capability the signature pad draws through.
///
/// Path coordinates are CSS pixels; implementations scale them by
/// `pixel_ratio` onto a backing raster of `device_size` pixels.
pub trait DrawingSurface {
    fn device_size(&self) -> (u32, u32);

    fn pixel_ratio(&self) -> f32;

    /// Erase everything.
    fn clear(&mut self);

    /// Start a new path at `at`. Leaves a mark so a tap is visible.
    fn begin_path(&mut self, at: Point);

    /// Extend the open path to `to`, rendering the new segment immediately.
    fn line_to(&mut self, to: Point);

    fn close_path(&mut self);

    /// Replace the contents with `image` scaled to fill the surface.
    fn draw_image(&mut self, image: &RgbaImage);

    /// Serialize the current contents as a PNG data URL.
    fn encode(&self) -> Result<String, SignatureError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StrokeStyle {
    color: Rgba<u8>,
    /// Line width in CSS pixels.
    line_width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba([0, 0, 0, 255]),
            line_width: 2.0,
        }
    }
}

/// In-memory RGBA surface with round caps and joins.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    raster: RgbaImage,
    pixel_ratio: f32,
    style: StrokeStyle,
    // end of the open path, in device pixels
    cursor: Option<(f32, f32)>,
}

impl RasterSurface {
    /// Create a transparent surface for a `css_width` x `css_height` box on a
    /// display with the given pixel ratio.
    pub fn new(css_width: f32, css_height: f32, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let width = device_pixels(css_width, pixel_ratio);
        let height = device_pixels(css_height, pixel_ratio);
        Self {
            raster: RgbaImage::new(width, height),
            pixel_ratio,
            style: StrokeStyle::default(),
            cursor: None,
        }
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// True when no pixel has been inked.
    pub fn is_blank(&self) -> bool {
        self.raster.pixels().all(|p| p.0[3] == 0)
    }

    fn to_device(&self, p: Point) -> (f32, f32) {
        (p.x * self.pixel_ratio, p.y * self.pixel_ratio)
    }

    /// Paint a filled disc of the stroke width centred on `(cx, cy)`.
    fn stamp(&mut self, cx: f32, cy: f32) {
        let radius = self.radius();
        let (width, height) = self.raster.dimensions();
        let min_x = (cx - radius).floor().max(0.0) as u32;
        let min_y = (cy - radius).floor().max(0.0) as u32;
        let max_x = ((cx + radius).ceil().max(0.0) as u32).min(width);
        let max_y = ((cy + radius).ceil().max(0.0) as u32).min(height);
        let r2 = radius * radius;
        for y in min_y..max_y {
            for x in min_x..max_x {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.raster.put_pixel(x, y, self.style.color);
                }
            }
        }
    }

    /// Stroke radius in device pixels.
    fn radius(&self) -> f32 {
        (self.style.line_width * self.pixel_ratio / 2.0).max(0.5)
    }

    /// Stamp discs every half pixel along the part of the segment that can
    /// reach the raster. Off-surface stretches cost nothing.
    fn stroke_segment(&mut self, from: (f32, f32), to: (f32, f32)) {
        let radius = f64::from(self.radius());
        let (width, height) = self.raster.dimensions();
        let bounds = (-radius, -radius, f64::from(width) + radius, f64::from(height) + radius);
        let Some((a, b)) = clip_segment(from, to, bounds) else {
            return;
        };
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let steps = ((dx * dx + dy * dy).sqrt() / 0.5).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            self.stamp((a.0 + dx * t) as f32, (a.1 + dy * t) as f32);
        }
    }
}

/// Liang-Barsky clip of a segment against `(min_x, min_y, max_x, max_y)`.
/// `None` when the segment misses the box or has a non-finite end.
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (x0, y0) = (f64::from(from.0), f64::from(from.1));
    let (x1, y1) = (f64::from(to.0), f64::from(to.1));
    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (x1 - x0, y1 - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, x0 - min_x), (dx, max_x - x0), (-dy, y0 - min_y), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some(((x0 + t0 * dx, y0 + t0 * dy), (x0 + t1 * dx, y0 + t1 * dy)))
}

fn device_pixels(css: f32, pixel_ratio: f32) -> u32 {
    if !css.is_finite() {
        return 1;
    }
    (css * pixel_ratio).round().max(1.0) as u32
}

impl DrawingSurface for RasterSurface {
    fn device_size(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn clear(&mut self) {
        let (width, height) = self.raster.dimensions();
        self.raster = RgbaImage::new(width, height);
        self.cursor = None;
    }

    fn begin_path(&mut self, at: Point) {
        let p = self.to_device(at);
        self.stamp(p.0, p.1);
        self.cursor = Some(p);
    }

    fn line_to(&mut self, to: Point) {
        let p = self.to_device(to);
        // without a current point this acts as a move, like canvas lineTo
        if let Some(from) = self.cursor {
            self.stroke_segment(from, p);
        }
        self.cursor = Some(p);
    }

    fn close_path(&mut self) {
        self.cursor = None;
    }

    fn draw_image(&mut self, image: &RgbaImage) {
        let (width, height) = self.raster.dimensions();
        self.cursor = None;
        self.raster = if image.dimensions() == (width, height) {
            image.clone()
        } else {
            imageops::resize(image, width, height, imageops::FilterType::Triangle)
        };
    }

    fn encode(&self) -> Result<String, SignatureError> {
        encode_png_data_url(&self.raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_size_scales_with_pixel_ratio() {
        let surface = RasterSurface::new(300.0, 150.0, 2.0);
        assert_eq!(surface.device_size(), (600, 300));
    }

    #[test]
    fn invalid_pixel_ratio_falls_back_to_one() {
        let surface = RasterSurface::new(300.0, 150.0, 0.0);
        assert_eq!(surface.device_size(), (300, 150));
        assert_eq!(surface.pixel_ratio(), 1.0);
    }

    #[test]
    fn begin_path_leaves_a_dot() {
        let mut surface = RasterSurface::new(40.0, 20.0, 1.0);
        surface.begin_path(Point::new(10.0, 10.0));
        assert!(!surface.is_blank());
        assert_eq!(surface.raster().get_pixel(10, 10).0[3], 255);
    }

    #[test]
    fn line_to_inks_the_segment() {
        let mut surface = RasterSurface::new(100.0, 20.0, 1.0);
        surface.begin_path(Point::new(5.0, 10.0));
        surface.line_to(Point::new(95.0, 10.0));
        for x in [5, 30, 50, 70, 94] {
            assert_eq!(surface.raster().get_pixel(x, 10).0[3], 255, "x = {x}");
        }
    }

    #[test]
    fn strokes_near_the_edge_are_clipped() {
        let mut surface = RasterSurface::new(10.0, 10.0, 1.0);
        surface.begin_path(Point::new(-5.0, -5.0));
        surface.line_to(Point::new(15.0, 15.0));
        assert!(!surface.is_blank());
    }

    #[test]
    fn far_off_surface_segments_are_cheap() {
        let mut surface = RasterSurface::new(100.0, 100.0, 1.0);
        let started = std::time::Instant::now();
        surface.begin_path(Point::new(0.0, 50.0));
        surface.line_to(Point::new(1e12, 50.0));
        surface.line_to(Point::new(-3e38, -3e38));
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        for x in [0, 50, 99] {
            assert_eq!(surface.raster().get_pixel(x, 50).0[3], 255, "x = {x}");
        }
    }

    #[test]
    fn clip_segment_trims_to_the_box() {
        let bounds = (0.0, 0.0, 10.0, 10.0);
        let (a, b) = clip_segment((-10.0, 5.0), (20.0, 5.0), bounds).expect("crosses");
        let close = |u: (f64, f64), v: (f64, f64)| (u.0 - v.0).abs() < 1e-9 && (u.1 - v.1).abs() < 1e-9;
        assert!(close(a, (0.0, 5.0)), "{a:?}");
        assert!(close(b, (10.0, 5.0)), "{b:?}");
        assert!(clip_segment((20.0, 20.0), (30.0, 40.0), bounds).is_none());
        assert!(clip_segment((0.0, 5.0), (f32::INFINITY, 5.0), bounds).is_none());
    }

    #[test]
    fn clear_erases_everything() {
        let mut surface = RasterSurface::new(40.0, 20.0, 1.5);
        surface.begin_path(Point::new(10.0, 10.0));
        surface.line_to(Point::new(20.0, 12.0));
        surface.clear();
        assert!(surface.is_blank());
        assert_eq!(surface.device_size(), (60, 30));
    }
}
