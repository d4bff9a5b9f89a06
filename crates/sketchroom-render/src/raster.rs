//! Software raster surface: an RGBA8 framebuffer with a simple
//! disc-stamping stroker.

use crate::surface::{DrawSurface, RenderError, RenderResult};
use kurbo::{BezPath, PathEl, Point};
use sketchroom_core::Color;

/// Curve flattening tolerance in pixels.
const FLATTEN_TOLERANCE: f64 = 0.25;

/// An in-memory RGBA8 pixel surface.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    /// Create a surface cleared to opaque white.
    pub fn new(width: u32, height: u32) -> Self {
        let mut surface = Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        };
        surface.clear(Color::white());
        surface
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read one pixel; out-of-bounds reads return transparent black.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Color::transparent();
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Color::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// Source-over blend of one pixel at (x, y).
    fn blend_pixel(&mut self, x: i64, y: i64, color: Color, alpha: f64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let a = alpha.clamp(0.0, 1.0) * (color.a as f64 / 255.0);
        if a <= 0.0 {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let blend = |src: u8, dst: u8| -> u8 {
            (src as f64 * a + dst as f64 * (1.0 - a)).round() as u8
        };
        self.pixels[i] = blend(color.r, self.pixels[i]);
        self.pixels[i + 1] = blend(color.g, self.pixels[i + 1]);
        self.pixels[i + 2] = blend(color.b, self.pixels[i + 2]);
        let dst_a = self.pixels[i + 3] as f64 / 255.0;
        self.pixels[i + 3] = ((a + dst_a * (1.0 - a)) * 255.0).round() as u8;
    }

    /// Stamp a filled disc.
    fn stamp_disc(&mut self, center: Point, radius: f64, color: Color, opacity: f64) {
        let r = radius.max(0.5);
        let x0 = (center.x - r).floor() as i64;
        let x1 = (center.x + r).ceil() as i64;
        let y0 = (center.y - r).floor() as i64;
        let y1 = (center.y + r).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                if dx * dx + dy * dy <= r * r {
                    self.blend_pixel(x, y, color, opacity);
                }
            }
        }
    }

    /// Stamp discs along a line segment, spaced at half the radius.
    fn stamp_segment(&mut self, a: Point, b: Point, radius: f64, color: Color, opacity: f64) {
        let dist = a.distance(b);
        let steps = ((dist / (radius * 0.5).max(0.25)).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.stamp_disc(a.lerp(b, t), radius, color, opacity);
        }
    }
}

impl DrawSurface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[0] = color.r;
            chunk[1] = color.g;
            chunk[2] = color.b;
            chunk[3] = color.a;
        }
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64, opacity: f64) {
        let radius = (width / 2.0).max(0.5);
        let mut subpath_start: Option<Point> = None;
        let mut last: Option<Point> = None;
        kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
            PathEl::MoveTo(p) => {
                subpath_start = Some(p);
                last = Some(p);
            }
            PathEl::LineTo(p) => {
                if let Some(a) = last {
                    self.stamp_segment(a, p, radius, color, opacity);
                }
                last = Some(p);
            }
            PathEl::ClosePath => {
                if let (Some(a), Some(s)) = (last, subpath_start) {
                    self.stamp_segment(a, s, radius, color, opacity);
                    last = Some(s);
                }
            }
            // flatten only emits the variants above
            _ => {}
        });
    }

    fn draw_image(&mut self, rgba: &[u8], width: u32, height: u32) -> RenderResult<()> {
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            log::warn!(
                "image blit rejected: {} bytes for {width}x{height}",
                rgba.len()
            );
            return Err(RenderError::Unsupported(format!(
                "pixel buffer is {} bytes, expected {expected}",
                rgba.len()
            )));
        }
        let cols = width.min(self.width) as usize;
        let rows = height.min(self.height) as usize;
        for y in 0..rows {
            let src = y * (width as usize) * 4;
            for x in 0..cols {
                let si = src + x * 4;
                let color = Color::new(rgba[si], rgba[si + 1], rgba[si + 2], 255);
                let alpha = rgba[si + 3] as f64 / 255.0;
                self.blend_pixel(x as i64, y as i64, color, alpha);
            }
        }
        Ok(())
    }

    fn export_png(&self) -> RenderResult<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
        }
        Ok(out)
    }
}

/// Decode a PNG blob into RGBA8 pixels.
pub fn decode_png(bytes: &[u8]) -> RenderResult<(Vec<u8>, u32, u32)> {
    let decoder = png::Decoder::new(bytes);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let rgba = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => buf,
        (png::ColorType::Rgb, png::BitDepth::Eight) => {
            let mut out = Vec::with_capacity(buf.len() / 3 * 4);
            for px in buf.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            out
        }
        (color, depth) => {
            log::warn!("png decode rejected: color type {color:?} at depth {depth:?}");
            return Err(RenderError::Unsupported(format!(
                "png color type {color:?} at depth {depth:?}"
            )));
        }
    };
    Ok((rgba, info.width, info.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_white() {
        let surface = PixelSurface::new(4, 4);
        assert_eq!(surface.pixel(0, 0), Color::white());
        assert_eq!(surface.pixel(3, 3), Color::white());
    }

    #[test]
    fn test_stroke_marks_pixels() {
        let mut surface = PixelSurface::new(20, 20);
        let mut path = BezPath::new();
        path.move_to((2.0, 10.0));
        path.line_to((18.0, 10.0));
        surface.stroke_path(&path, Color::black(), 2.0, 1.0);

        assert_eq!(surface.pixel(10, 10), Color::black());
        assert_eq!(surface.pixel(10, 2), Color::white());
    }

    #[test]
    fn test_translucent_stroke_blends() {
        let mut surface = PixelSurface::new(10, 10);
        let mut path = BezPath::new();
        path.move_to((0.0, 5.0));
        path.line_to((10.0, 5.0));
        surface.stroke_path(&path, Color::black(), 2.0, 0.1);

        let px = surface.pixel(5, 5);
        // 10% black over white stays light grey
        assert!(px.r > 200 && px.r < 255);
        assert_eq!(px.r, px.g);
        assert_eq!(px.g, px.b);
    }

    #[test]
    fn test_png_roundtrip() {
        let mut surface = PixelSurface::new(8, 8);
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((8.0, 8.0));
        surface.stroke_path(&path, Color::new(200, 30, 30, 255), 2.0, 1.0);

        let blob = surface.export_png().unwrap();
        let (rgba, w, h) = decode_png(&blob).unwrap();
        assert_eq!((w, h), (8, 8));
        assert_eq!(rgba, surface.pixels());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_png(b"not a png").is_err());
    }

    #[test]
    fn test_decode_rejects_grayscale() {
        let mut blob = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut blob, 2, 2);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0u8; 4]).unwrap();
        }
        assert!(matches!(decode_png(&blob), Err(RenderError::Unsupported(_))));
    }

    #[test]
    fn test_draw_image_rejects_short_buffer() {
        let mut surface = PixelSurface::new(4, 4);
        let err = surface.draw_image(&[0u8; 7], 4, 4);
        assert!(matches!(err, Err(RenderError::Unsupported(_))));
    }

    #[test]
    fn test_draw_image_clips_to_surface() {
        let mut surface = PixelSurface::new(2, 2);
        let big = vec![0u8, 0, 0, 255].repeat(16);
        surface.draw_image(&big, 4, 4).unwrap();
        assert_eq!(surface.pixel(0, 0), Color::black());
        assert_eq!(surface.pixel(1, 1), Color::black());
    }
}
