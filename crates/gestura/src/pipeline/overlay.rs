//! Annotations produced while processing a frame.
//!
//! An [`Overlay`] is a list of shapes in pixel coordinates of the processed frame. Pipelines only
//! record shapes; displaying them is up to the caller. [`Overlay::render`] rasterizes lines and
//! markers onto an [`RgbImage`], text labels have to be drawn by a font-capable frontend.

use image::{Rgb, RgbImage};

use crate::landmark::Landmark;

pub type Color = Rgb<u8>;

pub const RED: Color = Rgb([255, 0, 0]);
pub const GREEN: Color = Rgb([0, 255, 0]);
pub const BLUE: Color = Rgb([0, 0, 255]);
pub const YELLOW: Color = Rgb([255, 255, 0]);
pub const GREY: Color = Rgb([127, 127, 127]);

/// Default marker edge length in pixels.
pub const DEFAULT_MARKER_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        start: [f32; 2],
        end: [f32; 2],
        color: Color,
    },
    /// A filled square centered on `center`.
    Marker {
        center: [f32; 2],
        size: u32,
        color: Color,
    },
    /// Text with its top-left corner at `origin`.
    Text {
        origin: [f32; 2],
        text: String,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    width: u32,
    height: u32,
    shapes: Vec<Shape>,
}

impl Overlay {
    /// Creates an empty overlay for frames of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn for_frame(frame: &RgbImage) -> Self {
        Self::new(frame.width(), frame.height())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Returns the text of all labels, in the order they were added.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Converts a normalized landmark position to pixel coordinates.
    pub fn to_pixels(&self, landmark: Landmark) -> [f32; 2] {
        [
            landmark.x() * self.width as f32,
            landmark.y() * self.height as f32,
        ]
    }

    pub fn line(&mut self, a: Landmark, b: Landmark, color: Color) {
        self.shapes.push(Shape::Line {
            start: self.to_pixels(a),
            end: self.to_pixels(b),
            color,
        });
    }

    pub fn marker(&mut self, at: Landmark, size: u32, color: Color) {
        self.shapes.push(Shape::Marker {
            center: self.to_pixels(at),
            size,
            color,
        });
    }

    /// Adds a text label at a fixed pixel position.
    pub fn text<T: Into<String>>(&mut self, origin: [f32; 2], text: T, color: Color) {
        self.shapes.push(Shape::Text {
            origin,
            text: text.into(),
            color,
        });
    }

    /// Adds a text label next to a landmark.
    pub fn text_at<T: Into<String>>(&mut self, at: Landmark, text: T, color: Color) {
        let origin = self.to_pixels(at);
        self.text(origin, text, color);
    }

    /// Draws lines and markers onto `image`. Text labels are skipped.
    ///
    /// Shapes are drawn in insertion order and overwrite the target pixels. Parts outside of the
    /// image are clipped.
    pub fn render(&self, image: &mut RgbImage) {
        let sx = image.width() as f32 / self.width.max(1) as f32;
        let sy = image.height() as f32 / self.height.max(1) as f32;
        for shape in &self.shapes {
            match shape {
                Shape::Line { start, end, color } => {
                    let start = [start[0] * sx, start[1] * sy];
                    let end = [end[0] * sx, end[1] * sy];
                    draw_line(image, start, end, *color);
                }
                Shape::Marker {
                    center,
                    size,
                    color,
                } => draw_marker(image, [center[0] * sx, center[1] * sy], *size, *color),
                Shape::Text { .. } => {}
            }
        }
    }
}

fn put_pixel(image: &mut RgbImage, x: f32, y: f32, color: Color) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, color);
    }
}

fn draw_line(image: &mut RgbImage, start: [f32; 2], end: [f32; 2], color: Color) {
    let size = [image.width() as f32, image.height() as f32];
    let Some((start, end)) = clip_line(start, end, size) else {
        return;
    };
    let (dx, dy) = (end[0] - start[0], end[1] - start[1]);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        put_pixel(image, start[0] + dx * t, start[1] + dy * t, color);
    }
}

/// Clips the segment to the rectangle from the origin to `size` (Liang-Barsky).
///
/// Returns [`None`] if the segment lies outside of the rectangle or has a non-finite coordinate.
fn clip_line(start: [f32; 2], end: [f32; 2], size: [f32; 2]) -> Option<([f32; 2], [f32; 2])> {
    let (dx, dy) = (end[0] - start[0], end[1] - start[1]);
    if ![start[0], start[1], dx, dy].iter().all(|c| c.is_finite()) {
        return None;
    }

    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    let edges = [
        (-dx, start[0]),
        (dx, size[0] - start[0]),
        (-dy, start[1]),
        (dy, size[1] - start[1]),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        [start[0] + dx * t0, start[1] + dy * t0],
        [start[0] + dx * t1, start[1] + dy * t1],
    ))
}

fn draw_marker(image: &mut RgbImage, center: [f32; 2], size: u32, color: Color) {
    if !center[0].is_finite() || !center[1].is_finite() {
        return;
    }
    let half = size as f32 / 2.0;
    for dy in 0..size {
        for dx in 0..size {
            put_pixel(
                image,
                center[0] - half + dx as f32 + 0.5,
                center[1] - half + dy as f32 + 0.5,
                color,
            );
        }
    }
}
