//! Core library for packing textures into atlases.
//!
//! - Loader: decode, premultiply, trim and content-hash individual bitmaps (see [`bitmap`])
//! - Packer: MaxRects bin packing under Best Short Side Fit (see [`packer`])
//! - Scheduler: orders bitmaps, drives the packer across one or more atlas pages, handles
//!   per-atlas deduplication and shrinks each page to its smallest power-of-two envelope
//!   (see [`scheduler`])
//! - Serializers: compose the final atlas image and the XML/JSON/binary descriptors
//!   (see [`export`], [`export_xml`], [`export_binary`])
//! - Build cache: fingerprint CLI arguments plus input content to skip unchanged runs
//!   (see [`cache`])

pub mod bitmap;
pub mod cache;
pub mod error;
pub mod export;
pub mod export_binary;
pub mod export_xml;
pub mod hash;
pub mod options;
pub mod packer;
pub mod raster;
pub mod rect;
pub mod scheduler;

pub use bitmap::Bitmap;
pub use error::{CrunchError, Result};
pub use options::Options;
pub use packer::MaxRectsPacker;
pub use raster::Image;
pub use rect::Rect;
pub use scheduler::{pack_atlases, AtlasPage, Point};

/// Convenience prelude bringing the primary types into scope.
pub mod prelude {
    pub use crate::bitmap::Bitmap;
    pub use crate::error::{CrunchError, Result};
    pub use crate::options::Options;
    pub use crate::packer::MaxRectsPacker;
    pub use crate::raster::Image;
    pub use crate::rect::Rect;
    pub use crate::scheduler::{pack_atlases, AtlasPage, Point};
}
