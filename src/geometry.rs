//! Polygon geometry in the reference frame the garment regions are authored in.
//!
//! Regions are drawn once against a nominal canvas (see `RenderConfig`) and
//! rescaled to whatever raster is being processed through an explicit
//! [`FrameScale`], so the two axes can diverge when artwork is not exported at
//! the reference aspect ratio.

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds of a polygon, in the polygon's own coordinate space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)` inside a raster.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Closed polygon; the last point connects back to the first implicitly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Self {
        Self {
            points: pairs.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_pairs(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
    }

    /// At least three vertices and no NaN/infinite coordinates.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3
            && self
                .points
                .iter()
                .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Ray-casting parity test against a horizontal ray towards +x.
    ///
    /// Edges are half-open in y: an edge is counted only when exactly one of its
    /// endpoints lies strictly above the test row, so shared vertices are never
    /// counted twice and horizontal edges never count at all. Points lying exactly
    /// on an edge land on one side or the other depending on the edge's
    /// orientation, but the answer for a given point is always the same.
    /// Invalid polygons contain nothing.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > y) != (b.y > y) {
                let cross_x = a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
                if x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    pub fn bounds(&self) -> Option<Bounds> {
        if !self.is_valid() {
            return None;
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Per-axis scaled copy, e.g. normalized texture-local coordinates to pixels.
    pub fn scaled(&self, sx: f32, sy: f32) -> Polygon {
        Polygon {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x * sx, p.y * sy))
                .collect(),
        }
    }
}

/// Scale factors from the reference frame to raster pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameScale {
    pub sx: f32,
    pub sy: f32,
}

impl FrameScale {
    pub const IDENTITY: FrameScale = FrameScale { sx: 1.0, sy: 1.0 };

    /// Independent factors per axis; a degenerate reference size falls back to 1:1.
    pub fn between(reference_width: f32, reference_height: f32, width: u32, height: u32) -> Self {
        let sx = if reference_width > 0.0 && reference_width.is_finite() {
            width as f32 / reference_width
        } else {
            1.0
        };
        let sy = if reference_height > 0.0 && reference_height.is_finite() {
            height as f32 / reference_height
        } else {
            1.0
        };
        Self { sx, sy }
    }

    /// Maps a raster pixel (by its top-left corner) into the reference frame.
    pub fn to_frame(&self, x: u32, y: u32) -> (f32, f32) {
        (x as f32 / self.sx, y as f32 / self.sy)
    }

    /// Reference-frame bounds to the covering pixel rectangle, clipped to the raster.
    pub fn to_pixel_rect(&self, bounds: &Bounds, width: u32, height: u32) -> PixelRect {
        let clip = |v: f32, limit: u32| -> u32 {
            if v.is_nan() || v <= 0.0 {
                0
            } else {
                (v as u32).min(limit)
            }
        };

        PixelRect {
            x0: clip((bounds.min_x * self.sx).floor(), width),
            y0: clip((bounds.min_y * self.sy).floor(), height),
            x1: clip((bounds.max_x * self.sx).ceil() + 1.0, width),
            y1: clip((bounds.max_y * self.sy).ceil() + 1.0, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from_pairs(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    #[test]
    fn square_contains_center_and_rejects_outside() {
        let poly = square();
        assert!(poly.contains(5.0, 5.0));
        assert!(!poly.contains(15.0, 15.0));
        assert!(!poly.contains(-1.0, 5.0));
        assert!(!poly.contains(5.0, 11.0));
    }

    #[test]
    fn boundary_point_is_classified_consistently() {
        let poly = square();
        let first = poly.contains(0.0, 5.0);
        for _ in 0..100 {
            assert_eq!(poly.contains(0.0, 5.0), first);
        }
    }

    #[test]
    fn vertex_row_is_not_double_counted() {
        // Diamond: the ray through y=5 passes exactly through the left and right vertices.
        let diamond = Polygon::from_pairs(&[(5.0, 0.0), (10.0, 5.0), (5.0, 10.0), (0.0, 5.0)]);
        assert!(diamond.contains(5.0, 5.0));
        assert!(!diamond.contains(-2.0, 5.0) && !diamond.contains(12.0, 5.0));
        assert!(!diamond.contains(0.5, 0.5));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape opening upwards.
        let u = Polygon::from_pairs(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 7.0),
            (7.0, 7.0),
            (7.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        assert!(!u.contains(5.0, 3.0));
        assert!(u.contains(1.5, 3.0));
        assert!(u.contains(5.0, 8.5));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        let line = Polygon::from_pairs(&[(0.0, 0.0), (10.0, 10.0)]);
        assert!(!line.is_valid());
        assert!(!line.contains(5.0, 5.0));
        assert!(line.bounds().is_none());

        let nan = Polygon::from_pairs(&[(0.0, 0.0), (f32::NAN, 0.0), (0.0, 10.0)]);
        assert!(!nan.is_valid());
    }

    #[test]
    fn frame_scale_maps_bounds_to_clipped_pixels() {
        let scale = FrameScale::between(1000.0, 1400.0, 500, 700);
        assert_eq!(scale, FrameScale { sx: 0.5, sy: 0.5 });
        assert_eq!(scale.to_frame(250, 350), (500.0, 700.0));

        let bounds = Polygon::rect(100.0, 200.0, 400.0, 2000.0)
            .bounds()
            .expect("rect has bounds");
        let rect = scale.to_pixel_rect(&bounds, 500, 700);
        assert_eq!(rect.x0, 50);
        assert_eq!(rect.y0, 100);
        assert_eq!(rect.x1, 251);
        assert_eq!(rect.y1, 700);
    }

    #[test]
    fn frame_scale_axes_are_independent() {
        let scale = FrameScale::between(1000.0, 1400.0, 1000, 700);
        assert_eq!(scale.sx, 1.0);
        assert_eq!(scale.sy, 0.5);
        assert_eq!(FrameScale::between(0.0, -1.0, 10, 10), FrameScale::IDENTITY);
    }
}
