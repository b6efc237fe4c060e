//! Output file naming.

use std::path::{Path, PathBuf};

use crate::LineSpacing;

/// The path a normalized copy of `font_path` is written to.
///
/// `dir/Name.ext` becomes `dir/Name-linegap<percent>.ext`. The file name is
/// split at its first dot, so `Name.subset.ttf` becomes
/// `Name-linegap<percent>.subset.ttf`.
pub fn linegap_output_path(font_path: &Path, spacing: LineSpacing) -> PathBuf {
    let file_name = font_path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let out_name = match file_name.split_once('.') {
        Some((base, ext)) => format!("{base}-linegap{spacing}.{ext}"),
        None => format!("{file_name}-linegap{spacing}"),
    };
    font_path.with_file_name(out_name)
}
