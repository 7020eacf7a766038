//! Immutable run configuration shared by the loader, packer, scheduler and
//! serializers. Built once by the CLI from parsed arguments; never mutated
//! or read from globals afterwards.

use std::path::PathBuf;

/// All settings needed to run one pack, independent of where they came from.
#[derive(Debug, Clone)]
pub struct Options {
    /// Maximum atlas width/height, must be a power of two.
    pub size: u32,
    /// Padding in pixels added to the right/bottom of every placed texture.
    pub padding: u32,
    pub xml: bool,
    pub binary: bool,
    pub json: bool,
    pub premultiply: bool,
    pub trim: bool,
    pub verbose: bool,
    /// Force a repack even if the build cache says inputs are unchanged.
    pub force: bool,
    /// Deduplicate identical textures within each atlas.
    pub unique: bool,
    /// Allow 90-degree rotation when it improves packing.
    pub rotate: bool,
    pub out_dir: PathBuf,
    /// Base name used for atlas pages and descriptor files (`<name>0.png`, `<name>.xml`, ...).
    pub name: String,
    pub inputs: Vec<PathBuf>,
}
