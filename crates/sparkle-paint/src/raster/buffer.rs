use crate::error::GeometryError;
use crate::paint::Rgba8;

/// How [`PixelBuffer::blit`] combines source and destination pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum BlendMode {
    /// Overwrite the destination.
    Copy,
    /// Straight-alpha source-over compositing.
    #[default]
    SourceOver,
}

/// A pixel-addressable destination.
///
/// Coordinates passed to `pixel`/`set_pixel` are always inside
/// `width() × height()`; implementations may panic otherwise.
pub trait PixelSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixel(&self, x: u32, y: u32) -> Rgba8;
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8);
}

/// Row-major grid of packed `0xRRGGBBAA` pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Allocates a fully transparent buffer.
    ///
    /// The pixel count is computed with checked arithmetic and the storage is
    /// reserved fallibly, so oversized requests surface as
    /// [`GeometryError::BufferTooLarge`] instead of aborting.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        let too_large =
            GeometryError::BufferTooLarge { width: width as u64, height: height as u64 };

        let len = (width as usize).checked_mul(height as usize).ok_or(too_large)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| too_large)?;
        pixels.resize(len, Rgba8::TRANSPARENT.to_packed());

        Ok(Self { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Rgba8::from_packed(self.pixels[self.index(x, y)]))
    }

    /// Native-endian bytes of the packed words.
    ///
    /// Suitable for uploading to a 32-bit surface created with
    /// [`RMASK`](crate::paint::RMASK)..[`AMASK`](crate::paint::AMASK).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(Rgba8::from_packed(self.pixels[self.index(x, y)]).to_array())
        })
    }

    /// Copies this buffer onto `dst` with its top-left corner at `(x, y)`.
    ///
    /// The copied region is clipped to the destination; negative origins are
    /// allowed. Returns the number of destination pixels written.
    pub fn blit<S>(&self, dst: &mut S, x: i32, y: i32, mode: BlendMode) -> usize
    where
        S: PixelSurface + ?Sized,
    {
        let (x, y) = (x as i64, y as i64);
        let sx0 = (-x).max(0);
        let sy0 = (-y).max(0);
        let sx1 = (self.width as i64).min(dst.width() as i64 - x);
        let sy1 = (self.height as i64).min(dst.height() as i64 - y);

        if sx0 >= sx1 || sy0 >= sy1 {
            log::trace!("blit at ({x}, {y}) fully clipped");
            return 0;
        }

        for sy in sy0..sy1 {
            let row = (sy * self.width as i64) as usize;
            let ty = (y + sy) as u32;
            for sx in sx0..sx1 {
                let src = Rgba8::from_packed(self.pixels[row + sx as usize]);
                let tx = (x + sx) as u32;
                let out = match mode {
                    BlendMode::Copy => src,
                    BlendMode::SourceOver => src.over(dst.pixel(tx, ty)),
                };
                dst.set_pixel(tx, ty, out);
            }
        }

        ((sx1 - sx0) * (sy1 - sy0)) as usize
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl PixelSurface for PixelBuffer {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        Rgba8::from_packed(self.pixels[self.index(x, y)])
    }

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        let i = self.index(x, y);
        self.pixels[i] = color.to_packed();
    }
}

impl PixelSurface for image::RgbaImage {
    #[inline]
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    #[inline]
    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Rgba8::new(r, g, b, a)
    }

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        self.put_pixel(x, y, image::Rgba(color.to_array()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
    const GREY: Rgba8 = Rgba8::new(50, 50, 50, 255);

    fn filled(w: u32, h: u32, c: Rgba8) -> PixelBuffer {
        let mut b = PixelBuffer::new(w, h).unwrap();
        b.pixels_mut().fill(c.to_packed());
        b
    }

    // ── allocation ────────────────────────────────────────────────────────

    #[test]
    fn new_is_transparent() {
        let b = PixelBuffer::new(3, 2).unwrap();
        assert_eq!(b.len(), 6);
        assert!(b.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn new_zero_sized() {
        assert!(PixelBuffer::new(0, 10).unwrap().is_empty());
        assert!(PixelBuffer::new(10, 0).unwrap().is_empty());
    }

    #[test]
    fn new_rejects_overflowing_size() {
        let err = PixelBuffer::new(u32::MAX, u32::MAX).unwrap_err();
        assert!(matches!(err, GeometryError::BufferTooLarge { .. }));
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let b = PixelBuffer::new(2, 2).unwrap();
        assert_eq!(b.get(1, 1), Some(Rgba8::TRANSPARENT));
        assert_eq!(b.get(2, 0), None);
        assert_eq!(b.get(0, 2), None);
    }

    #[test]
    fn as_bytes_matches_native_words() {
        let b = filled(1, 1, Rgba8::new(1, 2, 3, 4));
        assert_eq!(b.as_bytes(), 0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn to_rgba_image_is_channel_ordered() {
        let b = filled(2, 1, Rgba8::new(9, 8, 7, 6));
        let img = b.to_rgba_image();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0).0, [9, 8, 7, 6]);
    }

    // ── blit ──────────────────────────────────────────────────────────────

    #[test]
    fn blit_inside_writes_all() {
        let src = filled(2, 2, RED);
        let mut dst = filled(4, 4, GREY);
        assert_eq!(src.blit(&mut dst, 1, 1, BlendMode::Copy), 4);
        assert_eq!(dst.get(1, 1), Some(RED));
        assert_eq!(dst.get(2, 2), Some(RED));
        assert_eq!(dst.get(0, 0), Some(GREY));
        assert_eq!(dst.get(3, 3), Some(GREY));
    }

    #[test]
    fn blit_clips_negative_origin() {
        let src = filled(3, 3, RED);
        let mut dst = filled(4, 4, GREY);
        assert_eq!(src.blit(&mut dst, -2, -1, BlendMode::Copy), 2);
        assert_eq!(dst.get(0, 0), Some(RED));
        assert_eq!(dst.get(0, 1), Some(RED));
        assert_eq!(dst.get(1, 0), Some(GREY));
    }

    #[test]
    fn blit_clips_far_edge() {
        let src = filled(3, 3, RED);
        let mut dst = filled(4, 4, GREY);
        assert_eq!(src.blit(&mut dst, 3, 2, BlendMode::Copy), 2);
        assert_eq!(dst.get(3, 3), Some(RED));
        assert_eq!(dst.get(2, 3), Some(GREY));
    }

    #[test]
    fn blit_fully_outside_writes_nothing() {
        let src = filled(2, 2, RED);
        let mut dst = filled(4, 4, GREY);
        assert_eq!(src.blit(&mut dst, 4, 0, BlendMode::Copy), 0);
        assert_eq!(src.blit(&mut dst, -2, 0, BlendMode::Copy), 0);
        assert!(dst.pixels().iter().all(|&p| p == GREY.to_packed()));
    }

    #[test]
    fn blit_source_over_skips_transparent() {
        let src = PixelBuffer::new(4, 4).unwrap();
        let mut dst = filled(4, 4, GREY);
        src.blit(&mut dst, 0, 0, BlendMode::SourceOver);
        assert!(dst.pixels().iter().all(|&p| p == GREY.to_packed()));

        src.blit(&mut dst, 0, 0, BlendMode::Copy);
        assert!(dst.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn blit_onto_rgba_image() {
        let src = filled(2, 2, RED);
        let mut img = image::RgbaImage::new(3, 3);
        assert_eq!(src.blit(&mut img, 1, 0, BlendMode::SourceOver), 4);
        assert_eq!(img.get_pixel(2, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }
}
