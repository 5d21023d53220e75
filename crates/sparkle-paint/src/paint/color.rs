/// Channel masks of the packed pixel layout (`0xRRGGBBAA`).
///
/// Collaborators that upload [`PixelBuffer::as_bytes`](crate::raster::PixelBuffer::as_bytes)
/// to a masked 32-bit surface pass these unchanged.
pub const RMASK: u32 = 0xff00_0000;
pub const GMASK: u32 = 0x00ff_0000;
pub const BMASK: u32 = 0x0000_ff00;
pub const AMASK: u32 = 0x0000_00ff;

/// Straight-alpha 8-bit RGBA color.
///
/// Channels are stored exactly as written into pixel buffers; no
/// premultiplication and no color-space conversion is applied.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from unit-range components.
    ///
    /// Each component is clamped to `[0, 1]` and scaled with a truncating
    /// conversion: `0.5` becomes `127`, only `1.0` reaches `255`.
    #[inline]
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit_to_channel(r),
            g: unit_to_channel(g),
            b: unit_to_channel(b),
            a: unit_to_channel(a),
        }
    }

    /// Packs into `0xRRGGBBAA`.
    #[inline]
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
    }

    #[inline]
    pub const fn from_packed(px: u32) -> Self {
        Self {
            r: ((px & RMASK) >> 24) as u8,
            g: ((px & GMASK) >> 16) as u8,
            b: ((px & BMASK) >> 8) as u8,
            a: (px & AMASK) as u8,
        }
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Straight-alpha source-over: `self` composited onto `dst`.
    ///
    /// `rgb = src·αs + dst·(1 − αs)`, `α = αs + αd·(1 − αs)`, rounded to
    /// nearest. A fully transparent source leaves `dst` unchanged and a fully
    /// opaque source replaces it.
    pub fn over(self, dst: Rgba8) -> Rgba8 {
        let sa = self.a as u32;
        let inv = 255 - sa;
        let blend = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8;
        Rgba8 {
            r: blend(self.r, dst.r),
            g: blend(self.g, dst.g),
            b: blend(self.b, dst.b),
            a: ((sa * 255 + dst.a as u32 * inv + 127) / 255) as u8,
        }
    }

    /// Intensity-domain blend towards `other` by `q`.
    ///
    /// Per channel `sqrt(c0²·(1 − q) + c1²·q)`, truncated. Blending the squares
    /// keeps the perceived midpoint bright: red→blue at `q = 0.5` gives
    /// `(180, 0, 180)`, not `(127, 0, 127)`.
    pub fn mix_intensity(self, other: Rgba8, q: f64) -> Rgba8 {
        let mix = |c0: u8, c1: u8| {
            let c0 = c0 as f64;
            let c1 = c1 as f64;
            (c0 * c0 * (1.0 - q) + c1 * c1 * q).sqrt() as u8
        };
        Rgba8 {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Clamps to `[0, 1]`. NaN maps to `0`.
#[inline]
pub(crate) fn unit_clamp(x: f64) -> f64 {
    // `+ 0.0` folds -0.0 into +0.0.
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) + 0.0 }
}

#[inline]
fn unit_to_channel(x: f64) -> u8 {
    (255.0 * unit_clamp(x)) as u8
}
