//! CPU gradient rasterization.
//!
//! Every paint call validates its inputs completely before allocating, then
//! scans the output buffer once. Each pixel depends only on its own
//! coordinates and the read-only [`ColorStopTable`], so rows are painted in
//! parallel once a buffer is large enough to amortize the fork.

mod buffer;
mod ellipse;
mod linear;

use rayon::prelude::*;

pub use buffer::{BlendMode, PixelBuffer, PixelSurface};
pub use ellipse::{EllipseKind, EllipseMapping};
pub use linear::LinearAxis;

use crate::coords::Vec2;
use crate::error::{GeometryError, GradientError};
use crate::paint::{ColorStopTable, StopRecord};

/// Gradient shape and extent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GradientGeometry {
    /// `width × height` buffer; progress runs along `direction`.
    Linear { width: i32, height: i32, direction: Vec2 },
    /// `2rx × 2ry` buffer; progress is the normalized radius (`is_radial`) or
    /// the normalized angle.
    Ellipsoidal { rx: i32, ry: i32, is_radial: bool },
}

impl GradientGeometry {
    #[inline]
    pub fn linear(width: i32, height: i32, dx: f64, dy: f64) -> Self {
        GradientGeometry::Linear { width, height, direction: Vec2::new(dx, dy) }
    }

    #[inline]
    pub fn radial(rx: i32, ry: i32) -> Self {
        GradientGeometry::Ellipsoidal { rx, ry, is_radial: true }
    }

    #[inline]
    pub fn conical(rx: i32, ry: i32) -> Self {
        GradientGeometry::Ellipsoidal { rx, ry, is_radial: false }
    }
}

/// Rasterizer tuning.
#[derive(Debug, Clone)]
pub struct RasterConfig {
    /// Allow painting rows on the rayon thread pool.
    pub parallel: bool,

    /// Minimum pixel count before rows are painted in parallel.
    pub parallel_threshold: usize,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 64 * 64,
        }
    }
}

/// Paints linear, radial and conical gradients into [`PixelBuffer`]s.
#[derive(Debug, Clone, Default)]
pub struct GradientRasterizer {
    config: RasterConfig,
}

impl GradientRasterizer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Paints any gradient kind.
    pub fn paint(
        &self,
        geometry: &GradientGeometry,
        table: &ColorStopTable,
    ) -> Result<PixelBuffer, GeometryError> {
        match *geometry {
            GradientGeometry::Linear { width, height, direction } => {
                self.paint_linear(width, height, direction.x, direction.y, table)
            }
            GradientGeometry::Ellipsoidal { rx, ry, is_radial } => {
                self.paint_ellipsoidal(rx, ry, table, is_radial)
            }
        }
    }

    /// Builds a table from raw stop records, then paints.
    pub fn paint_records<I>(
        &self,
        geometry: &GradientGeometry,
        records: I,
    ) -> Result<PixelBuffer, GradientError>
    where
        I: IntoIterator,
        I::Item: StopRecord,
    {
        let table = ColorStopTable::build(records)?;
        Ok(self.paint(geometry, &table)?)
    }

    /// Linear gradient across a `width × height` buffer.
    ///
    /// Rejects negative extents, a null or non-finite direction, and tables
    /// with fewer than 2 stops.
    pub fn paint_linear(
        &self,
        width: i32,
        height: i32,
        dx: f64,
        dy: f64,
        table: &ColorStopTable,
    ) -> Result<PixelBuffer, GeometryError> {
        let width = non_negative("width", width)?;
        let height = non_negative("height", height)?;

        let direction = Vec2::new(dx, dy);
        if direction.is_zero() {
            return Err(GeometryError::NullDirection);
        }
        if !direction.is_finite() {
            return Err(GeometryError::NonFiniteDirection);
        }
        check_stops(table)?;

        let mut buf = PixelBuffer::new(width, height)?;
        let axis = LinearAxis::new(width, height, direction);
        log::debug!(
            "painting linear gradient {width}x{height} along ({dx}, {dy}), {} stops",
            table.len()
        );

        self.scan_rows(&mut buf, |y, row| {
            for (x, px) in row.iter_mut().enumerate() {
                *px = table.lookup_packed(axis.progress_at(x as f64, y as f64));
            }
        });

        Ok(buf)
    }

    /// Radial or conical gradient inside the ellipse with radii `rx`, `ry`.
    ///
    /// The buffer is `2rx × 2ry`; pixels outside the ellipse stay transparent.
    pub fn paint_ellipsoidal(
        &self,
        rx: i32,
        ry: i32,
        table: &ColorStopTable,
        is_radial: bool,
    ) -> Result<PixelBuffer, GeometryError> {
        let rx = non_negative("rx", rx)?;
        let ry = non_negative("ry", ry)?;
        check_stops(table)?;

        // rx, ry <= i32::MAX, so doubling stays within u32.
        let mut buf = PixelBuffer::new(2 * rx, 2 * ry)?;
        let mapping = EllipseMapping::new(rx, ry, EllipseKind::from_radial_flag(is_radial));
        log::debug!(
            "painting {:?} gradient rx={rx} ry={ry}, {} stops",
            mapping.kind(),
            table.len()
        );

        let (rx, ry) = (rx as i64, ry as i64);
        self.scan_rows(&mut buf, |row_idx, row| {
            let y = row_idx as i64 - ry;
            for (col, px) in row.iter_mut().enumerate() {
                let x = col as i64 - rx;
                if let Some(p) = mapping.progress_at(x, y) {
                    *px = table.lookup_packed(p);
                }
            }
        });

        Ok(buf)
    }

    #[inline]
    pub fn paint_radial(
        &self,
        rx: i32,
        ry: i32,
        table: &ColorStopTable,
    ) -> Result<PixelBuffer, GeometryError> {
        self.paint_ellipsoidal(rx, ry, table, true)
    }

    #[inline]
    pub fn paint_conical(
        &self,
        rx: i32,
        ry: i32,
        table: &ColorStopTable,
    ) -> Result<PixelBuffer, GeometryError> {
        self.paint_ellipsoidal(rx, ry, table, false)
    }

    /// Runs `paint_row(y, row)` over every row of `buf`.
    fn scan_rows<F>(&self, buf: &mut PixelBuffer, paint_row: F)
    where
        F: Fn(usize, &mut [u32]) + Sync,
    {
        let width = buf.width() as usize;
        if buf.is_empty() {
            return;
        }

        let parallel = self.config.parallel && buf.len() >= self.config.parallel_threshold;
        let pixels = buf.pixels_mut();
        if parallel {
            pixels
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| paint_row(y, row));
        } else {
            pixels
                .chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| paint_row(y, row));
        }
    }
}

fn non_negative(name: &'static str, value: i32) -> Result<u32, GeometryError> {
    u32::try_from(value).map_err(|_| GeometryError::NegativeDimension { name, value })
}

fn check_stops(table: &ColorStopTable) -> Result<(), GeometryError> {
    if table.len() < 2 {
        return Err(GeometryError::InsufficientStops { count: table.len() });
    }
    Ok(())
}
