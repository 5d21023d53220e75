//! Scene files: a canvas plus gradient layers composited in order.
//!
//! Color stops stay dynamically typed (`serde_json::Value`) until the layer
//! is painted, so malformed stops are reported by the table builder with the
//! offending record index and field.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use sparkle_paint::{BlendMode, GradientGeometry, GradientRasterizer, Rgba8};

#[derive(Debug, Deserialize)]
pub struct Scene {
    pub canvas: Canvas,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

#[derive(Debug, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub background: UnitColor,
}

/// Unit-range straight-alpha color, as written in scene files.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct UnitColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Default for UnitColor {
    fn default() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }
}

impl From<UnitColor> for Rgba8 {
    fn from(c: UnitColor) -> Self {
        Rgba8::from_unit(c.r, c.g, c.b, c.a)
    }
}

/// Gradient shape. Extents are script-style numbers truncated to integers.
#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Linear { w: f64, h: f64, dx: f64, dy: f64 },
    Radial { rx: f64, ry: f64 },
    Conical { rx: f64, ry: f64 },
}

impl Shape {
    pub fn geometry(&self) -> GradientGeometry {
        match *self {
            Shape::Linear { w, h, dx, dy } => GradientGeometry::linear(w as i32, h as i32, dx, dy),
            Shape::Radial { rx, ry } => GradientGeometry::radial(rx as i32, ry as i32),
            Shape::Conical { rx, ry } => GradientGeometry::conical(rx as i32, ry as i32),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Linear { .. } => "linear",
            Shape::Radial { .. } => "radial",
            Shape::Conical { .. } => "conical",
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Blend {
    Copy,
    #[default]
    Over,
}

impl From<Blend> for BlendMode {
    fn from(b: Blend) -> Self {
        match b {
            Blend::Copy => BlendMode::Copy,
            Blend::Over => BlendMode::SourceOver,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Layer {
    /// Top-left corner of the painted buffer on the canvas.
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default)]
    pub blend: Blend,
    pub stops: Vec<Value>,
}

impl Canvas {
    /// Allocates the canvas filled with its background.
    ///
    /// Sizes whose byte count overflows or cannot be reserved are reported as
    /// errors instead of aborting inside `image`.
    pub fn blank(&self) -> Result<image::RgbaImage> {
        let (width, height) = (self.width, self.height);
        let Some(len) = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
        else {
            bail!("canvas {width}x{height} is too large");
        };

        let mut raw = Vec::new();
        raw.try_reserve_exact(len)
            .with_context(|| format!("canvas {width}x{height} is too large"))?;
        let background = Rgba8::from(self.background).to_array();
        raw.extend(background.iter().copied().cycle().take(len));

        image::RgbaImage::from_raw(width, height, raw)
            .with_context(|| format!("canvas {width}x{height} has no pixel layout"))
    }
}

impl Scene {
    pub fn from_json_str(src: &str) -> Result<Self> {
        serde_json::from_str(src).context("invalid scene description")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        Self::from_json_str(&src).with_context(|| format!("in scene {}", path.display()))
    }

    /// Paints every layer and composites it onto a fresh canvas.
    pub fn render(&self, rasterizer: &GradientRasterizer) -> Result<image::RgbaImage> {
        let mut canvas = self.canvas.blank()?;

        for (i, layer) in self.layers.iter().enumerate() {
            let buf = rasterizer
                .paint_records(&layer.shape.geometry(), &layer.stops)
                .with_context(|| format!("layer #{i} ({})", layer.shape.name()))?;

            let written = buf.blit(&mut canvas, layer.x as i32, layer.y as i32, layer.blend.into());
            log::info!(
                "layer #{i}: {} {}x{} at ({}, {}), {written} pixels composited",
                layer.shape.name(),
                buf.width(),
                buf.height(),
                layer.x as i32,
                layer.y as i32,
            );
        }

        Ok(canvas)
    }
}
