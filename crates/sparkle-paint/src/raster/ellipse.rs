use std::f64::consts::{PI, TAU};

/// Which progress parameter an ellipsoidal gradient uses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EllipseKind {
    /// Normalized distance from the center: `0` at the center, `1` on the rim.
    Radial,
    /// Normalized direction angle, one full turn per `[0, 1]`.
    Conical,
}

impl EllipseKind {
    #[inline]
    pub fn from_radial_flag(is_radial: bool) -> Self {
        if is_radial { EllipseKind::Radial } else { EllipseKind::Conical }
    }
}

/// Maps offsets from an ellipse's center to gradient progress.
///
/// Offsets are integer pixel positions relative to the center, with
/// `x ∈ [−rx, rx)` and `y ∈ [−ry, ry)` covering the `2rx × 2ry` buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EllipseMapping {
    rx: u32,
    ry: u32,
    kind: EllipseKind,
}

impl EllipseMapping {
    #[inline]
    pub const fn new(rx: u32, ry: u32, kind: EllipseKind) -> Self {
        Self { rx, ry, kind }
    }

    #[inline]
    pub fn kind(&self) -> EllipseKind {
        self.kind
    }

    /// `sqrt(x²/rx² + y²/ry²)`; `1` on the ellipse boundary.
    #[inline]
    pub fn normalized_radius(&self, x: i64, y: i64) -> f64 {
        let (x, y) = (x as f64, y as f64);
        let (rx, ry) = (self.rx as f64, self.ry as f64);
        ((x * x) / (rx * rx) + (y * y) / (ry * ry)).sqrt()
    }

    /// Progress at offset `(x, y)`, or `None` outside the ellipse.
    ///
    /// Conical progress is `(atan2(y, x) + π) / 2π`. The branch cut lies on
    /// the negative x-axis: offsets with `y = 0, x < 0` evaluate
    /// `atan2(+0, x) = +π` and map to `1.0`, while offsets just below the
    /// axis approach `0.0`.
    pub fn progress_at(&self, x: i64, y: i64) -> Option<f64> {
        if self.rx == 0 || self.ry == 0 {
            return None;
        }

        let r = self.normalized_radius(x, y);
        if r > 1.0 {
            return None;
        }

        Some(match self.kind {
            EllipseKind::Radial => r,
            EllipseKind::Conical => ((y as f64).atan2(x as f64) + PI) / TAU,
        })
    }
}
