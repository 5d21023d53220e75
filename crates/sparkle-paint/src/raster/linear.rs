use crate::coords::Vec2;

/// Projection of pixel positions onto a linear gradient's pivot axis.
///
/// The pivot axis runs through the center of a `width × height` rectangle
/// in `direction`. Progress is `0.5` on the axis' perpendicular bisector and
/// reaches `0`/`1` where the axis leaves the rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearAxis {
    direction: Vec2,
    norm: f64,
    center: f64,
    pivot_length: f64,
}

impl LinearAxis {
    /// `direction` must be non-null and finite; the rasterizer checks this
    /// before constructing an axis.
    pub fn new(width: u32, height: u32, direction: Vec2) -> Self {
        let (w, h) = (width as f64, height as f64);

        // Progress is invariant under scaling the direction, so bring the
        // larger component to 1 before squaring anything.
        let scale = direction.x.abs().max(direction.y.abs());
        let unit = Vec2::new(direction.x / scale, direction.y / scale);
        let Vec2 { x: dx, y: dy } = unit;

        // Axis length clipped to the rectangle. Exactly one branch can divide
        // by a zero component, and neither is taken when that component is
        // zero: a steep axis has dy != 0, a shallow one with dx == 0 only
        // arises for an empty rectangle.
        let steep = (dy * w).abs() > (dx * h).abs();
        let pivot_length = if steep {
            h * (1.0 + (dx * dx) / (dy * dy)).sqrt()
        } else {
            w * (1.0 + (dy * dy) / (dx * dx)).sqrt()
        };

        Self {
            direction: unit,
            norm: unit.length(),
            center: (dx * w + dy * h) / 2.0,
            pivot_length,
        }
    }

    /// Direction scaled so its larger component has magnitude 1.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Length of the pivot axis inside the rectangle.
    #[inline]
    pub fn pivot_length(&self) -> f64 {
        self.pivot_length
    }

    /// Signed distance of `(x, y)` from the perpendicular bisector, measured
    /// along the direction.
    #[inline]
    pub fn signed_distance(&self, x: f64, y: f64) -> f64 {
        (self.direction.dot(Vec2::new(x, y)) - self.center) / self.norm
    }

    #[inline]
    pub fn progress_at(&self, x: f64, y: f64) -> f64 {
        0.5 + self.signed_distance(x, y) / self.pivot_length
    }
}
