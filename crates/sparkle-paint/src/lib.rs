//! Sparkle paint crate.
//!
//! CPU gradient rasterizer: builds sorted color-stop tables from raw records
//! and paints linear, radial and conical gradients into owned pixel buffers.
//! Displaying a buffer is left to the caller, through [`raster::PixelSurface`]
//! or the raw packed words.

pub mod coords;
pub mod error;
pub mod logging;
pub mod paint;
pub mod raster;

pub use error::{GeometryError, GradientError, MalformedColorStop, StopFault};
pub use paint::{ColorStop, ColorStopTable, RawColorStop, Rgba8, StopRecord};
pub use raster::{
    BlendMode, GradientGeometry, GradientRasterizer, PixelBuffer, PixelSurface, RasterConfig,
};
