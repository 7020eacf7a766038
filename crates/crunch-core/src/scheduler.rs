//! Assigns bitmaps to one or more atlas pages: largest-first packing,
//! per-atlas deduplication, and shrinking each page down to the smallest
//! power-of-two envelope that still holds its placements.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::{CrunchError, Result};
use crate::options::Options;
use crate::packer::MaxRectsPacker;

/// Where one bitmap landed within a page.
#[derive(Debug, Clone)]
pub struct Point {
    pub x: u32,
    pub y: u32,
    /// Index within this page's `bitmaps`/`points` of the entry this one duplicates,
    /// when `Options::unique` collapsed it onto an earlier placement.
    pub dup_of: Option<usize>,
    pub rotated: bool,
}

/// One packed atlas: its final (possibly shrunk) dimensions and every bitmap
/// placed on it, in placement order.
pub struct AtlasPage {
    pub width: u32,
    pub height: u32,
    pub bitmaps: Vec<Rc<Bitmap>>,
    pub points: Vec<Point>,
}

/// Packs every bitmap into one or more pages no larger than `opts.size`.
///
/// Bitmaps are consumed largest-area-first. A bitmap that doesn't fit any
/// empty page at `opts.size` is reported as [`CrunchError::OversizedBitmap`].
pub fn pack_atlases(bitmaps: Vec<Bitmap>, opts: &Options) -> Result<Vec<AtlasPage>> {
    let mut remaining: Vec<Rc<Bitmap>> = bitmaps.into_iter().map(Rc::new).collect();
    remaining.sort_by_key(|b| b.width() * b.height());

    let mut pages = Vec::new();

    while !remaining.is_empty() {
        let page = pack_one_page(&mut remaining, opts)?;
        debug!(
            width = page.width,
            height = page.height,
            count = page.bitmaps.len(),
            "packed atlas page"
        );
        pages.push(page);
    }

    Ok(pages)
}

fn pack_one_page(remaining: &mut Vec<Rc<Bitmap>>, opts: &Options) -> Result<AtlasPage> {
    let mut packer = MaxRectsPacker::new(opts.size, opts.size);
    let mut bitmaps: Vec<Rc<Bitmap>> = Vec::new();
    let mut points: Vec<Point> = Vec::new();
    let mut dup_index: HashMap<u64, usize> = HashMap::new();
    let mut placed_real = 0usize;
    let (mut used_w, mut used_h) = (0u32, 0u32);

    while let Some(b) = remaining.last().cloned() {
        if opts.unique {
            if let Some(&existing) = dup_index.get(&b.hash) {
                if bitmaps[existing].data.equals(&b.data) {
                    let orig = &points[existing];
                    points.push(Point {
                        x: orig.x,
                        y: orig.y,
                        dup_of: Some(existing),
                        rotated: orig.rotated,
                    });
                    bitmaps.push(b);
                    remaining.pop();
                    continue;
                }
            }
        }

        let padded_w = b.width() + opts.padding;
        let padded_h = b.height() + opts.padding;
        match packer.insert(padded_w, padded_h, opts.rotate) {
            Some((rect, rotated)) => {
                if opts.unique {
                    dup_index.insert(b.hash, points.len());
                }
                used_w = used_w.max(rect.x + rect.w);
                used_h = used_h.max(rect.y + rect.h);
                points.push(Point {
                    x: rect.x,
                    y: rect.y,
                    dup_of: None,
                    rotated,
                });
                bitmaps.push(b);
                remaining.pop();
                placed_real += 1;
            }
            None => break,
        }
    }

    if placed_real == 0 {
        let worst = remaining
            .last()
            .expect("loop only breaks early when a bitmap remains unplaced");
        return Err(CrunchError::OversizedBitmap {
            name: worst.name.clone(),
            width: worst.width() + opts.padding,
            height: worst.height() + opts.padding,
            max_size: opts.size,
        });
    }

    Ok(AtlasPage {
        width: shrink_to_fit(opts.size, used_w),
        height: shrink_to_fit(opts.size, used_h),
        bitmaps,
        points,
    })
}

/// Halves `size` as long as the half still covers every used pixel, producing
/// the smallest power-of-two envelope for the page's actual content.
fn shrink_to_fit(size: u32, used: u32) -> u32 {
    let mut size = size;
    while size / 2 >= used.max(1) {
        size /= 2;
    }
    size
}
