//! Hand-rolled flat XML descriptor writer.
//!
//! The format is a fixed, single-purpose schema rather than a general
//! document, so it's written directly instead of through a DOM/XML crate.

use crate::options::Options;
use crate::scheduler::AtlasPage;

pub fn to_xml(pages: &[AtlasPage], opts: &Options) -> String {
    let mut out = String::new();
    out.push_str("<atlas>\n");
    for (i, page) in pages.iter().enumerate() {
        out.push_str(&format!("\t<tex n=\"{}{}\">\n", escape(&opts.name), i));
        for (bitmap, point) in page.bitmaps.iter().zip(page.points.iter()) {
            out.push_str(&format!(
                "\t\t<img n=\"{}\" x=\"{}\" y=\"{}\" w=\"{}\" h=\"{}\" ",
                escape(&bitmap.name),
                point.x,
                point.y,
                bitmap.width(),
                bitmap.height(),
            ));
            if opts.trim {
                out.push_str(&format!(
                    "fx=\"{}\" fy=\"{}\" fw=\"{}\" fh=\"{}\" ",
                    bitmap.frame_x, bitmap.frame_y, bitmap.frame_w, bitmap.frame_h,
                ));
            }
            if opts.rotate {
                out.push_str(&format!("r=\"{}\" ", point.rotated as u8));
            }
            out.push_str("/>\n");
        }
        out.push_str("\t</tex>\n");
    }
    out.push_str("</atlas>");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
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
            xml: true,
            binary: false,
            json: false,
            premultiply: false,
            trim: true,
            verbose: false,
            force: false,
            unique: true,
            rotate: true,
            out_dir: PathBuf::from("."),
            name: "atlas".into(),
            inputs: Vec::new(),
        }
    }

    #[test]
    fn writes_one_tex_element_per_page_inside_a_single_atlas_root() {
        let bitmap = Bitmap {
            name: "a&b".into(),
            data: Image::new(2, 2),
            frame_w: 2,
            frame_h: 2,
            frame_x: 0,
            frame_y: 0,
            hash: 0,
        };
        let page = AtlasPage {
            width: 64,
            height: 64,
            bitmaps: vec![Rc::new(bitmap)],
            points: vec![Point {
                x: 0,
                y: 0,
                dup_of: None,
                rotated: false,
            }],
        };
        let xml = to_xml(&[page], &opts());
        assert!(xml.starts_with("<atlas>\n"));
        assert!(xml.trim_end().ends_with("</atlas>"));
        assert!(xml.contains("<tex n=\"atlas0\">"));
        assert!(xml.contains("n=\"a&amp;b\""));
        assert!(xml.contains("fx=\"0\""));
        assert!(!xml.contains("r=\"1\""));
    }
}
