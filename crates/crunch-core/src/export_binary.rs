//! Hand-rolled little-endian binary descriptor writer, matching the original
//! tool's `WriteString`/`WriteShort`/`WriteByte` primitives.

use crate::options::Options;
use crate::scheduler::AtlasPage;

fn write_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    write_i16(out, s.len() as i16);
    out.extend_from_slice(s.as_bytes());
}

pub fn to_binary(pages: &[AtlasPage], opts: &Options) -> Vec<u8> {
    let mut out = Vec::new();
    write_i16(&mut out, pages.len() as i16);

    for (i, page) in pages.iter().enumerate() {
        write_string(&mut out, &format!("{}{}", opts.name, i));
        write_i16(&mut out, page.bitmaps.len() as i16);

        for (bitmap, point) in page.bitmaps.iter().zip(page.points.iter()) {
            write_string(&mut out, &bitmap.name);
            write_i16(&mut out, point.x as i16);
            write_i16(&mut out, point.y as i16);
            write_i16(&mut out, bitmap.width() as i16);
            write_i16(&mut out, bitmap.height() as i16);
            if opts.trim {
                write_i16(&mut out, bitmap.frame_x as i16);
                write_i16(&mut out, bitmap.frame_y as i16);
                write_i16(&mut out, bitmap.frame_w as i16);
                write_i16(&mut out, bitmap.frame_h as i16);
            }
            if opts.rotate {
                out.push(point.rotated as u8);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::raster::Image;
    use crate::scheduler::Point;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn opts() -> Options {
        Options {
            size: 64,
            padding: 0,
            xml: false,
            binary: true,
            json: false,
            premultiply: false,
            trim: true,
            verbose: false,
            force: false,
            unique: true,
            rotate: true,
            out_dir: PathBuf::from("."),
            name: "ab".into(),
            inputs: Vec::new(),
        }
    }

    #[test]
    fn layout_matches_length_prefixed_little_endian_fields() {
        let bitmap = Bitmap {
            name: "s".into(),
            data: Image::new(3, 4),
            frame_w: 3,
            frame_h: 4,
            frame_x: 0,
            frame_y: 0,
            hash: 0,
        };
        let page = AtlasPage {
            width: 64,
            height: 64,
            bitmaps: vec![Rc::new(bitmap)],
            points: vec![Point {
                x: 1,
                y: 2,
                dup_of: None,
                rotated: true,
            }],
        };
        let bytes = to_binary(&[page], &opts());

        let mut expected = Vec::new();
        write_i16(&mut expected, 1); // num_atlases
        write_string(&mut expected, "ab0"); // atlas name
        write_i16(&mut expected, 1); // num_images
        write_string(&mut expected, "s");
        write_i16(&mut expected, 1); // x
        write_i16(&mut expected, 2); // y
        write_i16(&mut expected, 3); // width
        write_i16(&mut expected, 4); // height
        write_i16(&mut expected, 0); // fx
        write_i16(&mut expected, 0); // fy
        write_i16(&mut expected, 3); // fw
        write_i16(&mut expected, 4); // fh
        expected.push(1); // rotated

        assert_eq!(bytes, expected);
    }
}
