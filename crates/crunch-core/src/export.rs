//! JSON descriptor serialization and atlas page compositing.

use serde_json::{json, Value};

use crate::options::Options;
use crate::raster::Image;
use crate::scheduler::AtlasPage;

/// Composites a page's bitmaps into its final atlas image, skipping
/// deduplicated entries (they reuse an earlier placement's pixels at load time).
pub fn compose(page: &AtlasPage) -> Image {
    let mut out = Image::new(page.width, page.height);
    for (bitmap, point) in page.bitmaps.iter().zip(page.points.iter()) {
        if point.dup_of.is_some() {
            continue;
        }
        if point.rotated {
            out.blit_rot_cw(&bitmap.data, point.x, point.y);
        } else {
            out.blit(&bitmap.data, point.x, point.y);
        }
    }
    out
}

/// Builds the `{"textures": [...]}` descriptor for every page, naming each
/// page `<name><index>` per the atlas name convention.
pub fn to_json(pages: &[AtlasPage], opts: &Options) -> Value {
    let textures: Vec<Value> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| texture_json(page, i, opts))
        .collect();
    json!({ "textures": textures })
}

fn texture_json(page: &AtlasPage, index: usize, opts: &Options) -> Value {
    let images: Vec<Value> = page
        .bitmaps
        .iter()
        .zip(page.points.iter())
        .map(|(bitmap, point)| {
            let mut entry = json!({
                "n": bitmap.name,
                "x": point.x,
                "y": point.y,
                "w": bitmap.width(),
                "h": bitmap.height(),
            });
            if opts.trim {
                entry["fx"] = json!(bitmap.frame_x);
                entry["fy"] = json!(bitmap.frame_y);
                entry["fw"] = json!(bitmap.frame_w);
                entry["fh"] = json!(bitmap.frame_h);
            }
            if opts.rotate {
                entry["r"] = json!(point.rotated);
            }
            entry
        })
        .collect();

    json!({
        "name": format!("{}{}", opts.name, index),
        "images": images,
    })
}
