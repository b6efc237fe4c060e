//! The vertical metrics report.

use std::fmt;

use crate::VerticalMetrics;

const MISSING_X_HEIGHT: &str = "---- (OS/2 table does not contain sxHeight record)";
const MISSING_CAP_HEIGHT: &str = "---- (OS/2 table does not contain sCapHeight record)";

/// Quantities derived from a font's [`VerticalMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DerivedMetrics {
    pub typo_height: i32,
    pub win_height: i32,
    pub hhea_height: i32,
    pub hhea_baseline_to_baseline: i32,
    pub typo_baseline_to_baseline: i32,
    /// The leading Windows adds on top of the win height; never negative.
    pub win_external_leading: i32,
    pub win_baseline_to_baseline: i32,
    pub hhea_ascender_delta: i32,
    pub hhea_descender_delta: i32,
    pub win_ascent_delta: i32,
    pub win_descent_delta: i32,
    pub hhea_ratio: f64,
    pub typo_ratio: f64,
    pub win_ratio: f64,
}

impl DerivedMetrics {
    pub fn new(metrics: &VerticalMetrics) -> Self {
        let typo_height = metrics.typo_height();
        let win_height = metrics.win_height();
        let hhea_height = metrics.hhea_height();
        let hhea_line_gap = metrics.hhea_line_gap as i32;
        let hhea_baseline_to_baseline = hhea_height + hhea_line_gap;
        let typo_baseline_to_baseline = typo_height + metrics.typo_line_gap as i32;
        let win_external_leading = (hhea_line_gap - (win_height - hhea_height)).max(0);
        let win_baseline_to_baseline = win_height + win_external_leading;

        let upem = metrics.units_per_em as f64;
        Self {
            typo_height,
            win_height,
            hhea_height,
            hhea_baseline_to_baseline,
            typo_baseline_to_baseline,
            win_external_leading,
            win_baseline_to_baseline,
            hhea_ascender_delta: metrics.hhea_ascender as i32 - metrics.typo_ascender as i32,
            hhea_descender_delta: metrics.typo_descender as i32 - metrics.hhea_descender as i32,
            win_ascent_delta: metrics.win_ascent as i32 - metrics.typo_ascender as i32,
            win_descent_delta: metrics.win_descent as i32 + metrics.typo_descender as i32,
            hhea_ratio: hhea_baseline_to_baseline as f64 / upem,
            typo_ratio: typo_baseline_to_baseline as f64 / upem,
            win_ratio: win_baseline_to_baseline as f64 / upem,
        }
    }
}

/// A printable report for a single font.
///
/// The line set and its order are fixed; the column alignment is only there
/// for readability.
pub struct Report<'a> {
    font_path: &'a str,
    content_hash: &'a str,
    metrics: &'a VerticalMetrics,
    derived: DerivedMetrics,
}

impl<'a> Report<'a> {
    pub fn new(font_path: &'a str, content_hash: &'a str, metrics: &'a VerticalMetrics) -> Self {
        Self {
            font_path,
            content_hash,
            metrics,
            derived: DerivedMetrics::new(metrics),
        }
    }

    pub fn derived(&self) -> &DerivedMetrics {
        &self.derived
    }
}

/// Render the report for the font at `font_path`.
pub fn generate_report(font_path: &str, content_hash: &str, metrics: &VerticalMetrics) -> String {
    Report::new(font_path, content_hash, metrics).to_string()
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.metrics;
        let d = &self.derived;
        let cap_height = OrPlaceholder(m.cap_height, MISSING_CAP_HEIGHT);
        let x_height = OrPlaceholder(m.x_height, MISSING_X_HEIGHT);

        writeln!(f, " ")?;
        writeln!(f, "=== {} ===", self.font_path)?;
        if let Some(version) = &m.version_string {
            writeln!(f, "{version}")?;
        }
        writeln!(f, "SHA1: {}", self.content_hash)?;
        writeln!(f)?;

        writeln!(f, "--- Metrics ---")?;
        writeln!(f, "[head] Units per Em:   {}", m.units_per_em)?;
        writeln!(f, "[head] yMax:           {}", m.y_max)?;
        writeln!(f, "[head] yMin:          {}", m.y_min)?;
        writeln!(f, "[OS/2] CapHeight:      {cap_height}")?;
        writeln!(f, "[OS/2] xHeight:        {x_height}")?;
        writeln!(f, "[OS/2] TypoAscender:   {}", m.typo_ascender)?;
        writeln!(f, "[OS/2] TypoDescender: {}", m.typo_descender)?;
        writeln!(f, "[OS/2] WinAscent:      {}", m.win_ascent)?;
        writeln!(f, "[OS/2] WinDescent:     {}", m.win_descent)?;
        writeln!(f, "[hhea] Ascent:         {}", m.hhea_ascender)?;
        writeln!(f, "[hhea] Descent:       {}", m.hhea_descender)?;
        writeln!(f)?;
        writeln!(f, "[hhea] LineGap:        {}", m.hhea_line_gap)?;
        writeln!(f, "[OS/2] TypoLineGap:    {}", m.typo_line_gap)?;
        writeln!(f)?;

        writeln!(f, "--- Ascent to Descent Calculations ---")?;
        writeln!(f, "[hhea] Ascent to Descent:              {}", d.hhea_height)?;
        writeln!(f, "[OS/2] TypoAscender to TypoDescender:  {}", d.typo_height)?;
        writeln!(f, "[OS/2] WinAscent to WinDescent:        {}", d.win_height)?;
        writeln!(f)?;

        writeln!(f, "--- Delta Values ---")?;
        writeln!(
            f,
            "[hhea] Ascent to [OS/2] TypoAscender:       {}",
            d.hhea_ascender_delta
        )?;
        writeln!(
            f,
            "[hhea] Descent to [OS/2] TypoDescender:      {}",
            d.hhea_descender_delta
        )?;
        writeln!(
            f,
            "[OS/2] WinAscent to [OS/2] TypoAscender:    {}",
            d.win_ascent_delta
        )?;
        writeln!(
            f,
            "[OS/2] WinDescent to [OS/2] TypoDescender:  {}",
            d.win_descent_delta
        )?;
        writeln!(f)?;

        writeln!(f, "--- Baseline to Baseline Distances ---")?;
        writeln!(f, "hhea metrics: {}", d.hhea_baseline_to_baseline)?;
        writeln!(f, "typo metrics: {}", d.typo_baseline_to_baseline)?;
        writeln!(f, "win metrics:  {}", d.win_baseline_to_baseline)?;
        writeln!(f)?;
        writeln!(
            f,
            "[OS/2] fsSelection USE_TYPO_METRICS bit set: {}",
            m.use_typo_metrics
        )?;
        writeln!(f)?;

        writeln!(f, "--- Ratios ---")?;
        writeln!(f, "hhea metrics / UPM:  {}", significant(d.hhea_ratio, 3))?;
        writeln!(f, "typo metrics / UPM:  {}", significant(d.typo_ratio, 3))?;
        write!(f, "win metrics / UPM:   {}", significant(d.win_ratio, 3))
    }
}

struct OrPlaceholder(Option<i16>, &'static str);

impl fmt::Display for OrPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str(self.1),
        }
    }
}

/// Format `value` with `digits` significant digits, the way C's `%g` does.
///
/// Trailing zeros are dropped, and exponent notation is used when the
/// decimal exponent is below -4 or not less than `digits`.
pub fn significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);
    // rounding to `digits` may carry into the next power of ten, so take the
    // exponent from the rounded exponent representation
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exponent: i32 = exponent.parse().unwrap_or_default();
    if exponent < -4 || exponent >= digits as i32 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    } else {
        let precision = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.precision$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
