//! Geometry types shared by the rasterizer.
//!
//! Pixel space:
//! - origin top-left
//! - +X right, +Y down

mod vec2;

pub use vec2::Vec2;
