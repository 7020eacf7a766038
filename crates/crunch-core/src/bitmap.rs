//! Loads a source image into a trimmed, content-hashed [`Bitmap`] ready for packing.

use std::path::Path;

use tracing::warn;

use crate::error::Result;
use crate::hash::hash_bitmap;
use crate::raster::Image;

/// A single packed texture: its trimmed pixel data plus the frame metadata
/// needed to reconstruct the original, untrimmed sprite at runtime.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub name: String,
    pub data: Image,
    /// Width of the original, untrimmed source image.
    pub frame_w: u32,
    /// Height of the original, untrimmed source image.
    pub frame_h: u32,
    /// Offset of the trimmed data's top-left corner within the original frame,
    /// always `<= 0` (e.g. `frame_x = -min_x`).
    pub frame_x: i32,
    pub frame_y: i32,
    /// Content hash over `(width, height, trimmed pixel bytes)`.
    pub hash: u64,
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Loads `path`, optionally premultiplying and trimming, and computes its
    /// content hash from the final (post-trim) pixel data.
    pub fn load(path: &Path, name: String, premultiply: bool, trim: bool) -> Result<Self> {
        let image = Image::decode_png(path)?;
        Ok(Self::load_from_image(image, name, premultiply, trim))
    }

    /// Builds a [`Bitmap`] from an already-decoded image, applying the same
    /// premultiply/trim/hash steps [`load`](Self::load) does. Exposed so
    /// callers that already hold decoded pixels (tests, in-process pipelines)
    /// don't need to round-trip through disk.
    pub fn load_from_image(mut image: Image, name: String, premultiply: bool, trim: bool) -> Self {
        if premultiply {
            image.premultiply_in_place();
        }

        let frame_w = image.width();
        let frame_h = image.height();

        let (data, frame_x, frame_y) = if trim {
            match trim_bounds(&image) {
                Some((min_x, min_y, max_x, max_y)) => {
                    let w = max_x - min_x + 1;
                    let h = max_y - min_y + 1;
                    let mut trimmed = Image::new(w, h);
                    for y in 0..h {
                        for x in 0..w {
                            trimmed.put_pixel(x, y, image.get_pixel(min_x + x, min_y + y));
                        }
                    }
                    (trimmed, -(min_x as i32), -(min_y as i32))
                }
                None => {
                    warn!(name = %name, "image is completely transparent, skipping trim");
                    (image, 0, 0)
                }
            }
        } else {
            (image, 0, 0)
        };

        let hash = hash_bitmap(data.width(), data.height(), data.pixels());

        Bitmap {
            name,
            data,
            frame_w,
            frame_h,
            frame_x,
            frame_y,
            hash,
        }
    }
}

/// Finds the bounding box of all pixels with alpha > 0. Returns `None` if every
/// pixel is fully transparent.
fn trim_bounds(image: &Image) -> Option<(u32, u32, u32, u32)> {
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    let mut found = false;

    for y in 0..image.height() {
        for x in 0..image.width() {
            if image.get_pixel(x, y)[3] > 0 {
                found = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    found.then_some((min_x, min_y, max_x, max_y))
}
