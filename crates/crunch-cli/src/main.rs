use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crunch_core::cache;
use crunch_core::export;
use crunch_core::export_binary;
use crunch_core::export_xml;
use crunch_core::{Bitmap, Options};

/// Command-line texture atlas packer: pack folders of PNGs into one or more
/// atlases plus an XML/JSON/binary descriptor.
///
/// usage:
///   crunch bin/atlases/atlas assets/characters,assets/tiles -p -t -v -u -r
#[derive(Parser, Debug)]
#[command(name = "crunch", version, about)]
struct Cli {
    /// Output path prefix, split into `<out_dir>/<name>`.
    output: String,

    /// Comma-separated input files or directories.
    inputs: String,

    /// Equivalent to -x -p -t -u
    #[arg(short = 'd', long = "default")]
    default: bool,
    #[arg(short = 'x', long = "xml")]
    xml: bool,
    #[arg(short = 'b', long = "binary")]
    binary: bool,
    #[arg(short = 'j', long = "json")]
    json: bool,
    #[arg(short = 't', long = "trim")]
    trim: bool,
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
    #[arg(short = 'f', long = "force")]
    force: bool,
    #[arg(short = 'u', long = "unique")]
    unique: bool,
    #[arg(short = 'r', long = "rotate")]
    rotate: bool,

    // `-p`/`-p<N>` and `-s<N>`/`--size<N>` are resolved by `preprocess_args`
    // before clap ever sees them, since clap can't express "same short flag,
    // different meaning depending on a numeric suffix".
    #[arg(long = "premultiply")]
    premultiply: bool,
    #[arg(long = "size", default_value_t = 4096)]
    size: u32,
    #[arg(long = "pad", default_value_t = 1)]
    pad: u32,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let normalized = match preprocess_args(&args[1..]) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("invalid argument: {e}");
            std::process::exit(1);
        }
    };

    let cli = match Cli::try_parse_from(std::iter::once(args[0].clone()).chain(normalized)) {
        Ok(c) => c,
        Err(e) => {
            e.print().ok();
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli, &args[1..]) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Rewrites `-p`/`-p<N>` and `-s<N>`/`--size<N>` into clap-friendly long flags,
/// preserving the original tool's disambiguation: a bare `-p` (or `-p` followed
/// by a non-digit) means premultiply; `-p` followed only by digits means padding.
fn preprocess_args(args: &[String]) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        if let Some(rest) = arg.strip_prefix("--size") {
            out.push(format!("--size={}", parse_size(rest)?));
        } else if let Some(rest) = arg.strip_prefix("-s") {
            out.push(format!("--size={}", parse_size(rest)?));
        } else if let Some(rest) = arg.strip_prefix("--pad") {
            out.push(format!("--pad={}", parse_padding(rest)?));
        } else if let Some(rest) = arg.strip_prefix("-p") {
            if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
                out.push("--premultiply".to_string());
            } else {
                out.push(format!("--pad={}", parse_padding(rest)?));
            }
        } else {
            out.push(arg.clone());
        }
    }
    Ok(out)
}

fn parse_size(s: &str) -> anyhow::Result<u32> {
    match s {
        "4096" | "2048" | "1024" | "512" | "256" | "128" | "64" => Ok(s.parse().unwrap()),
        other => bail!("invalid size: {other}"),
    }
}

fn parse_padding(s: &str) -> anyhow::Result<u32> {
    match s.parse::<u32>() {
        Ok(n) if n <= 16 => Ok(n),
        _ => bail!("invalid padding value: {s}"),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli, raw_args: &[String]) -> anyhow::Result<()> {
    let (out_dir, name) = split_output_prefix(&cli.output);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create out_dir {}", out_dir.display()))?;

    let input_specs: Vec<String> = cli.inputs.split(',').map(str::to_string).collect();
    if input_specs.is_empty() {
        bail!("no inputs given");
    }

    let opts = Options {
        size: cli.size,
        padding: cli.pad,
        xml: cli.xml || cli.default,
        binary: cli.binary,
        json: cli.json,
        premultiply: cli.premultiply || cli.default,
        trim: cli.trim || cli.default,
        verbose: cli.verbose,
        force: cli.force,
        unique: cli.unique || cli.default,
        rotate: cli.rotate,
        out_dir: out_dir.clone(),
        name: name.clone(),
        inputs: input_specs.iter().map(PathBuf::from).collect(),
    };

    info!(size = opts.size, padding = opts.padding, "starting pack");

    let resolved = gather_paths(&input_specs)?;
    if resolved.is_empty() {
        bail!("no input images found");
    }

    let resolved_paths: Vec<PathBuf> = resolved.iter().map(|(path, _)| path.clone()).collect();
    let build_hash = cache::compute_build_hash(raw_args, &resolved_paths)?;
    if !opts.force {
        if let Some(old) = cache::load_cached_hash(&out_dir, &name) {
            if old == build_hash {
                info!(atlas = %name, "atlas is unchanged, skipping pack");
                return Ok(());
            }
        }
    }

    cache::clean_stale_outputs(&out_dir, &name)?;

    debug!(count = resolved.len(), "loading images");
    let bitmaps: Vec<Bitmap> = resolved
        .iter()
        .map(|(path, sprite_name)| {
            Bitmap::load(path, sprite_name.clone(), opts.premultiply, opts.trim)
                .map_err(anyhow::Error::from)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let pages = crunch_core::pack_atlases(bitmaps, &opts)?;

    for (i, page) in pages.iter().enumerate() {
        let path = out_dir.join(format!("{name}{i}.png"));
        debug!(path = %path.display(), "writing atlas png");
        let image = export::compose(page);
        image.save_png(&path)?;
    }

    if opts.binary {
        let path = out_dir.join(format!("{name}.bin"));
        debug!(path = %path.display(), "writing binary descriptor");
        std::fs::write(&path, export_binary::to_binary(&pages, &opts))?;
    }
    if opts.xml {
        let path = out_dir.join(format!("{name}.xml"));
        debug!(path = %path.display(), "writing xml descriptor");
        std::fs::write(&path, export_xml::to_xml(&pages, &opts))?;
    }
    if opts.json {
        let path = out_dir.join(format!("{name}.json"));
        debug!(path = %path.display(), "writing json descriptor");
        let value = export::to_json(&pages, &opts);
        std::fs::write(&path, serde_json::to_string_pretty(&value)?)?;
    }

    cache::save_hash(&out_dir, &name, build_hash)?;
    info!(atlases = pages.len(), "pack complete");
    Ok(())
}

/// Splits `some/path/atlas` into (`some/path`, `atlas`), always treating the
/// prefix as forward-slash separated regardless of host path separator.
fn split_output_prefix(output: &str) -> (PathBuf, String) {
    let normalized = output.replace('\\', "/");
    match normalized.rfind('/') {
        Some(idx) => (
            PathBuf::from(&normalized[..idx]),
            normalized[idx + 1..].to_string(),
        ),
        None => (PathBuf::from("."), normalized),
    }
}

/// Resolves every comma-separated input spec into `(path, sprite_name)` pairs.
/// A spec with no `.` is a directory, walked recursively in sorted order for
/// `.png` files; otherwise it's treated as a single file.
fn gather_paths(specs: &[String]) -> anyhow::Result<Vec<(PathBuf, String)>> {
    let mut out = Vec::new();
    for spec in specs {
        let path = Path::new(spec);
        if !spec.contains('.') {
            let mut entries: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
                .collect();
            entries.sort();
            for file in entries {
                let name = sprite_name(path, &file);
                out.push((file, name));
            }
        } else {
            if !path.is_file() {
                warn!(path = %path.display(), "input does not exist, skipping");
                continue;
            }
            let name = file_stem(path);
            out.push((path.to_path_buf(), name));
        }
    }
    Ok(out)
}

/// Sprite name for a file found under a directory input: its path relative to
/// that directory, without the extension, using forward slashes.
fn sprite_name(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    let rel = rel.with_extension("");
    rel.to_string_lossy().replace('\\', "/")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dash_p_is_premultiply() {
        let out = preprocess_args(&["-p".to_string()]).unwrap();
        assert_eq!(out, vec!["--premultiply".to_string()]);
    }

    #[test]
    fn dash_p_with_digits_is_padding() {
        let out = preprocess_args(&["-p3".to_string()]).unwrap();
        assert_eq!(out, vec!["--pad=3".to_string()]);
    }

    #[test]
    fn dash_p_with_non_digit_suffix_is_premultiply() {
        let out = preprocess_args(&["-px".to_string()]).unwrap();
        assert_eq!(out, vec!["--premultiply".to_string()]);
    }

    #[test]
    fn rejects_out_of_range_padding() {
        assert!(preprocess_args(&["-p17".to_string()]).is_err());
    }

    #[test]
    fn rejects_invalid_size() {
        assert!(preprocess_args(&["-s100".to_string()]).is_err());
    }

    #[test]
    fn dash_s_with_valid_size_is_rewritten() {
        let out = preprocess_args(&["-s1024".to_string()]).unwrap();
        assert_eq!(out, vec!["--size=1024".to_string()]);
    }

    #[test]
    fn split_output_prefix_normalizes_backslashes() {
        let (dir, name) = split_output_prefix("bin\\atlases\\atlas");
        assert_eq!(dir, PathBuf::from("bin/atlases"));
        assert_eq!(name, "atlas");
    }

    #[test]
    fn split_output_prefix_with_no_directory() {
        let (dir, name) = split_output_prefix("atlas");
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "atlas");
    }
}
