//! Owned RGBA8 raster buffers and the pixel operations the packer needs:
//! decoding, premultiplying, blitting (straight and rotated) and encoding.

use std::path::Path;

use image::{ImageReader, RgbaImage};

use crate::error::{CrunchError, Result};

/// An owned RGBA8 image, stored row-major with 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, p: [u8; 4]) {
        let i = self.index(x, y);
        self.pixels[i..i + 4].copy_from_slice(&p);
    }

    /// Decodes a PNG from disk into RGBA8, converting palette/grayscale inputs as needed.
    pub fn decode_png(path: &Path) -> Result<Self> {
        let reader = ImageReader::open(path)?;
        let decoded = reader
            .decode()
            .map_err(|source| CrunchError::Png {
                path: path.display().to_string(),
                source,
            })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let buf = RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .expect("pixel buffer length matches width * height * 4 by construction");
        buf.save(path).map_err(|source| CrunchError::Png {
            path: path.display().to_string(),
            source,
        })
    }

    /// Scales each color channel by `alpha / 255`, truncating like the original tool's
    /// float-to-byte premultiply rather than rounding.
    pub fn premultiply_in_place(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            let a = px[3] as f32 / 255.0;
            px[0] = (px[0] as f32 * a) as u8;
            px[1] = (px[1] as f32 * a) as u8;
            px[2] = (px[2] as f32 * a) as u8;
        }
    }

    /// Copies `src` into `self` unrotated, with `src`'s top-left landing at `(tx, ty)`.
    pub fn blit(&mut self, src: &Image, tx: u32, ty: u32) {
        for y in 0..src.height {
            for x in 0..src.width {
                let p = src.get_pixel(x, y);
                self.put_pixel(tx + x, ty + y, p);
            }
        }
    }

    /// Copies `src` into `self` rotated 90 degrees clockwise, with the rotated
    /// region's top-left landing at `(tx, ty)`. The rotated region is `src.height`
    /// wide and `src.width` tall.
    pub fn blit_rot_cw(&mut self, src: &Image, tx: u32, ty: u32) {
        let r = src.height - 1;
        for y in 0..src.width {
            for x in 0..src.height {
                let p = src.get_pixel(y, r - x);
                self.put_pixel(tx + x, ty + y, p);
            }
        }
    }

    pub fn equals(&self, other: &Image) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_scales_by_alpha() {
        let mut img = Image::new(1, 1);
        img.put_pixel(0, 0, [200, 100, 50, 128]);
        img.premultiply_in_place();
        let p = img.get_pixel(0, 0);
        let a = 128.0f32 / 255.0;
        assert_eq!(p[0], (200.0 * a) as u8);
        assert_eq!(p[1], (100.0 * a) as u8);
        assert_eq!(p[2], (50.0 * a) as u8);
        assert_eq!(p[3], 128);
    }

    #[test]
    fn premultiply_zero_alpha_zeroes_color() {
        let mut img = Image::new(1, 1);
        img.put_pixel(0, 0, [255, 255, 255, 0]);
        img.premultiply_in_place();
        assert_eq!(img.get_pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_copies_pixels_untouched() {
        let mut src = Image::new(2, 1);
        src.put_pixel(0, 0, [1, 2, 3, 4]);
        src.put_pixel(1, 0, [5, 6, 7, 8]);
        let mut dst = Image::new(4, 4);
        dst.blit(&src, 1, 1);
        assert_eq!(dst.get_pixel(1, 1), [1, 2, 3, 4]);
        assert_eq!(dst.get_pixel(2, 1), [5, 6, 7, 8]);
    }

    #[test]
    fn blit_rot_cw_rotates_a_2x1_into_a_1x2_region() {
        // a 2-wide, 1-tall strip rotated clockwise becomes 1-wide, 2-tall,
        // with the original left pixel ending up on top.
        let mut src = Image::new(2, 1);
        src.put_pixel(0, 0, [1, 0, 0, 255]);
        src.put_pixel(1, 0, [0, 1, 0, 255]);
        let mut dst = Image::new(4, 4);
        dst.blit_rot_cw(&src, 0, 0);
        assert_eq!(dst.get_pixel(0, 0), [1, 0, 0, 255]);
        assert_eq!(dst.get_pixel(0, 1), [0, 1, 0, 255]);
    }

    #[test]
    fn equals_requires_same_dimensions_and_bytes() {
        let mut a = Image::new(2, 2);
        let mut b = Image::new(2, 2);
        assert!(a.equals(&b));
        a.put_pixel(0, 0, [9, 9, 9, 9]);
        assert!(!a.equals(&b));
        b.put_pixel(0, 0, [9, 9, 9, 9]);
        assert!(a.equals(&b));
        let c = Image::new(2, 1);
        assert!(!a.equals(&c));
    }
}
