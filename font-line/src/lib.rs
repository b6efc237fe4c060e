//! Report on and normalize the vertical metrics of OpenType fonts.
//!
//! Fonts carry three independent sets of vertical metrics: the typo metrics
//! and the win metrics in the `OS/2` table, and the ascender/descender/line
//! gap in the `hhea` table. Different renderers pick different sets, so a
//! font whose sets disagree is laid out with different line heights on
//! different platforms.
//!
//! [`font_report`] prints all of these values along with the quantities
//! derived from them. [`normalize_font_file`] rewrites the three sets so that
//! every renderer produces a baseline to baseline distance of
//! `unitsPerEm * (1 + percent / 100)`.
//!
//! ```no_run
//! use font_line::{normalize_font_file, LineSpacing};
//!
//! let spacing: LineSpacing = "20".parse()?;
//! let written = normalize_font_file("fonts/Foo-Regular.ttf", spacing)?;
//! assert_eq!(written.to_str(), Some("fonts/Foo-Regular-linegap20.ttf"));
//! # Ok::<_, font_line::Error>(())
//! ```

mod error;
pub mod hash;
pub mod linegap;
pub mod metrics;
pub mod paths;
pub mod report;
mod store;

use std::path::{Path, PathBuf};

pub use error::Error;
pub use hash::sha1_hex;
pub use linegap::{compute_normalized_metrics, LineSpacing, Strategy, UpdatedMetrics};
pub use metrics::VerticalMetrics;
pub use paths::linegap_output_path;
pub use report::generate_report;
pub use store::FontStore;

/// Generate the vertical metrics report for the font file at `path`.
pub fn font_report(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    let store = FontStore::open(path)?;
    let metrics = store.metrics()?;
    Ok(generate_report(
        &path.display().to_string(),
        &store.content_hash(),
        &metrics,
    ))
}

/// Write a copy of the font at `path` with normalized vertical metrics.
///
/// The copy is written next to the original, named by
/// [`linegap_output_path`], and its path is returned. The original file is
/// never modified, and if an error is returned no copy has been written.
pub fn normalize_font_file(path: impl AsRef<Path>, spacing: LineSpacing) -> Result<PathBuf, Error> {
    let path = path.as_ref();
    let mut store = FontStore::open(path)?;
    let metrics = store.metrics()?;
    let updated = compute_normalized_metrics(&metrics, spacing)?;
    store.apply(&updated)?;

    let out_path = linegap_output_path(path, spacing);
    store.save(&out_path)?;
    log::info!(
        "{} line spacing set to {spacing}% ({:?}), written to {}",
        path.display(),
        updated.strategy,
        out_path.display()
    );
    Ok(out_path)
}
