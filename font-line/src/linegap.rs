//! Line spacing normalization.
//!
//! Given a target line spacing, expressed as a percentage of the em, compute
//! new values for the typo, win and hhea metrics so that every renderer ends
//! up with the same distance between baselines.
//!
//! Fonts are authored under different conventions, and the update tries to
//! keep the convention the font already follows. See [`Strategy`].

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::{Error, VerticalMetrics};

/// The requested line spacing as a percentage of units per em.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineSpacing(u32);

impl LineSpacing {
    pub fn new(percent: u32) -> Self {
        Self(percent)
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    fn factor(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl FromStr for LineSpacing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(LineSpacing)
            .map_err(|_| Error::MalformedPercent(s.to_string()))
    }
}

impl fmt::Display for LineSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the new line spacing is distributed over the metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Zero typo line gap and a typo spread larger than the em.
    ///
    /// The extra space is split evenly above and below, on both the typo and
    /// the hhea metrics.
    SymmetricDelta,
    /// Zero typo line gap and a typo spread exactly equal to the em.
    ///
    /// The typo metrics describe the em box and are left alone; only the
    /// hhea metrics grow.
    HheaOnlyDelta,
    /// Everything else: the spacing goes into the typo line gap and the hhea
    /// metrics are derived from it.
    LineGap,
}

impl Strategy {
    /// Select the strategy for a font. Exactly one strategy applies to any
    /// set of metrics.
    pub fn select(metrics: &VerticalMetrics) -> Self {
        let typo_height = metrics.typo_height();
        let units_per_em = metrics.units_per_em as i32;
        match (metrics.typo_line_gap, typo_height.cmp(&units_per_em)) {
            (0, Ordering::Greater) => Strategy::SymmetricDelta,
            (0, Ordering::Equal) => Strategy::HheaOnlyDelta,
            _ => Strategy::LineGap,
        }
    }
}

/// The values written back to the font after normalization.
///
/// All eight fields are written together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdatedMetrics {
    pub strategy: Strategy,
    pub hhea_ascender: i16,
    pub hhea_descender: i16,
    /// Always zero.
    pub hhea_line_gap: i16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    /// Always equal to `hhea_ascender`.
    pub win_ascent: u16,
    /// Always equal to `-hhea_descender`.
    pub win_descent: u16,
}

/// Compute new vertical metrics that produce `spacing` percent of line
/// spacing on top of the em.
///
/// Returns [`Error::ValueOutOfRange`] if a computed value does not fit in its
/// field, which happens for very large percentages or a negative hhea
/// ascender.
pub fn compute_normalized_metrics(
    metrics: &VerticalMetrics,
    spacing: LineSpacing,
) -> Result<UpdatedMetrics, Error> {
    let units_per_em = metrics.units_per_em as i64;
    let line_spacing_units = (spacing.factor() * units_per_em as f64) as i64;
    let total_height = line_spacing_units + units_per_em;
    let delta_height = total_height - metrics.hhea_height() as i64;
    let add_units = (0.5 * delta_height as f64) as i64;

    let typo_ascender = metrics.typo_ascender as i64;
    let typo_descender = metrics.typo_descender as i64;
    let hhea_ascender = metrics.hhea_ascender as i64;
    let hhea_descender = metrics.hhea_descender as i64;

    let strategy = Strategy::select(metrics);
    let (typo, hhea) = match strategy {
        Strategy::SymmetricDelta => (
            [
                typo_ascender + add_units,
                typo_descender - add_units,
                metrics.typo_line_gap as i64,
            ],
            [hhea_ascender + add_units, hhea_descender - add_units],
        ),
        Strategy::HheaOnlyDelta => (
            [typo_ascender, typo_descender, metrics.typo_line_gap as i64],
            [hhea_ascender + add_units, hhea_descender - add_units],
        ),
        Strategy::LineGap => {
            let hhea_ascender = (typo_ascender as f64 + 0.5 * line_spacing_units as f64) as i64;
            (
                [typo_ascender, typo_descender, line_spacing_units],
                [hhea_ascender, -(total_height - hhea_ascender)],
            )
        }
    };
    log::debug!(
        "{strategy:?}: line spacing {line_spacing_units}, total height {total_height}, \
         adding {add_units} units above and below"
    );

    let [typo_ascender, typo_descender, typo_line_gap] = typo;
    let [hhea_ascender, hhea_descender] = hhea;
    Ok(UpdatedMetrics {
        strategy,
        hhea_ascender: narrow("hhea.ascender", hhea_ascender)?,
        hhea_descender: narrow("hhea.descender", hhea_descender)?,
        hhea_line_gap: 0,
        typo_ascender: narrow("OS/2.sTypoAscender", typo_ascender)?,
        typo_descender: narrow("OS/2.sTypoDescender", typo_descender)?,
        typo_line_gap: narrow("OS/2.sTypoLineGap", typo_line_gap)?,
        win_ascent: narrow("OS/2.usWinAscent", hhea_ascender)?,
        win_descent: narrow("OS/2.usWinDescent", -hhea_descender)?,
    })
}

fn narrow<T: TryFrom<i64>>(field: &'static str, value: i64) -> Result<T, Error> {
    T::try_from(value).map_err(|_| Error::ValueOutOfRange { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn font_metrics(
        units_per_em: u16,
        typo: (i16, i16, i16),
        hhea: (i16, i16),
        win: (u16, u16),
    ) -> VerticalMetrics {
        VerticalMetrics {
            units_per_em,
            typo_ascender: typo.0,
            typo_descender: typo.1,
            typo_line_gap: typo.2,
            hhea_ascender: hhea.0,
            hhea_descender: hhea.1,
            win_ascent: win.0,
            win_descent: win.1,
            ..Default::default()
        }
    }

    #[rstest]
    #[case("20", 20)]
    #[case("0", 0)]
    #[case(" 15 ", 15)]
    #[case("+7", 7)]
    fn parse_spacing(#[case] input: &str, #[case] expected: u32) {
        assert_eq!(input.parse::<LineSpacing>().unwrap().percent(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("-5")]
    #[case("12.5")]
    #[case("twenty")]
    fn malformed_spacing(#[case] input: &str) {
        match input.parse::<LineSpacing>() {
            Err(Error::MalformedPercent(raw)) => assert_eq!(raw, input),
            other => panic!("expected MalformedPercent, got {other:?}"),
        }
    }

    #[rstest]
    #[case(0, 1000, 1000, Strategy::HheaOnlyDelta)]
    #[case(0, 1400, 1000, Strategy::SymmetricDelta)]
    #[case(0, 900, 1000, Strategy::LineGap)]
    #[case(100, 1000, 1000, Strategy::LineGap)]
    #[case(100, 1400, 1000, Strategy::LineGap)]
    #[case(-10, 1000, 1000, Strategy::LineGap)]
    fn strategy_selection(
        #[case] typo_line_gap: i16,
        #[case] typo_height: i16,
        #[case] units_per_em: u16,
        #[case] expected: Strategy,
    ) {
        let metrics = font_metrics(
            units_per_em,
            (typo_height - 200, -200, typo_line_gap),
            (800, -200),
            (800, 200),
        );
        assert_eq!(Strategy::select(&metrics), expected);
    }

    #[test]
    fn hhea_only_delta() {
        let metrics = font_metrics(1000, (800, -200, 0), (800, -200), (800, 200));
        let updated = compute_normalized_metrics(&metrics, LineSpacing::new(20)).unwrap();
        assert_eq!(
            updated,
            UpdatedMetrics {
                strategy: Strategy::HheaOnlyDelta,
                hhea_ascender: 900,
                hhea_descender: -300,
                hhea_line_gap: 0,
                typo_ascender: 800,
                typo_descender: -200,
                typo_line_gap: 0,
                win_ascent: 900,
                win_descent: 300,
            }
        );
    }

    #[test]
    fn symmetric_delta() {
        // 2146 + 555 = 2701 > 2048
        let metrics = font_metrics(2048, (2146, -555, 0), (2146, -555), (2146, 555));
        let updated = compute_normalized_metrics(&metrics, LineSpacing::new(20)).unwrap();
        // line spacing int(0.2 * 2048) = 409, total 2457, delta -244, add -122
        assert_eq!(
            updated,
            UpdatedMetrics {
                strategy: Strategy::SymmetricDelta,
                hhea_ascender: 2024,
                hhea_descender: -433,
                hhea_line_gap: 0,
                typo_ascender: 2024,
                typo_descender: -433,
                typo_line_gap: 0,
                win_ascent: 2024,
                win_descent: 433,
            }
        );
    }

    #[test]
    fn line_gap() {
        let metrics = font_metrics(1000, (750, -250, 200), (1013, -271), (1013, 271));
        let updated = compute_normalized_metrics(&metrics, LineSpacing::new(15)).unwrap();
        // line spacing 150, total 1150, ascender int(750 + 75)
        assert_eq!(
            updated,
            UpdatedMetrics {
                strategy: Strategy::LineGap,
                hhea_ascender: 825,
                hhea_descender: -325,
                hhea_line_gap: 0,
                typo_ascender: 750,
                typo_descender: -250,
                typo_line_gap: 150,
                win_ascent: 825,
                win_descent: 325,
            }
        );
    }

    #[test]
    fn odd_delta_truncates_toward_zero() {
        // total 1250, delta 249 -> add 124
        let metrics = font_metrics(1000, (800, -200, 0), (800, -201), (800, 201));
        let updated = compute_normalized_metrics(&metrics, LineSpacing::new(25)).unwrap();
        assert_eq!(updated.strategy, Strategy::HheaOnlyDelta);
        assert_eq!((updated.hhea_ascender, updated.hhea_descender), (924, -325));

        // delta -43 -> add -21, not -22
        let metrics = font_metrics(1000, (850, -250, 0), (843, -200), (843, 200));
        let updated = compute_normalized_metrics(&metrics, LineSpacing::new(0)).unwrap();
        assert_eq!(updated.strategy, Strategy::SymmetricDelta);
        assert_eq!((updated.hhea_ascender, updated.hhea_descender), (822, -179));
        assert_eq!((updated.typo_ascender, updated.typo_descender), (829, -229));
    }

    #[test]
    fn win_matches_hhea_for_every_strategy() {
        let fonts = [
            font_metrics(1000, (800, -200, 0), (800, -200), (1000, 300)),
            font_metrics(2048, (2146, -555, 0), (1900, -500), (2146, 555)),
            font_metrics(1000, (750, -250, 200), (1013, -271), (1013, 271)),
            font_metrics(1000, (700, -200, 0), (900, -300), (900, 300)),
            font_metrics(1000, (800, -200, 0), (800, -200), (800, 200)),
        ];
        for font in &fonts {
            for percent in [0, 10, 20, 25, 50, 100, 133] {
                let updated = compute_normalized_metrics(font, LineSpacing::new(percent)).unwrap();
                assert_eq!(updated.hhea_line_gap, 0);
                assert_eq!(updated.win_ascent as i32, updated.hhea_ascender as i32);
                assert_eq!(updated.win_descent as i32, -(updated.hhea_descender as i32));
            }
        }
    }

    #[test]
    fn line_gap_is_a_fixed_point() {
        let original = font_metrics(1000, (750, -250, 200), (1013, -271), (1013, 271));
        for percent in [5, 20, 37] {
            let spacing = LineSpacing::new(percent);
            let first = compute_normalized_metrics(&original, spacing).unwrap();
            let normalized = VerticalMetrics {
                typo_ascender: first.typo_ascender,
                typo_descender: first.typo_descender,
                typo_line_gap: first.typo_line_gap,
                hhea_ascender: first.hhea_ascender,
                hhea_descender: first.hhea_descender,
                hhea_line_gap: first.hhea_line_gap,
                win_ascent: first.win_ascent,
                win_descent: first.win_descent,
                ..original.clone()
            };
            let second = compute_normalized_metrics(&normalized, spacing).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn out_of_range() {
        let metrics = font_metrics(1000, (800, -200, 0), (800, -200), (800, 200));
        match compute_normalized_metrics(&metrics, LineSpacing::new(10_000)) {
            Err(Error::ValueOutOfRange { field, value }) => {
                assert_eq!(field, "hhea.ascender");
                assert_eq!(value, 800 + 50_000);
            }
            other => panic!("expected ValueOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn negative_win_value() {
        // spacing pushed entirely into the typo gap leaves a negative ascender
        let metrics = font_metrics(1000, (-100, -1100, 10), (800, -200), (800, 200));
        assert!(matches!(
            compute_normalized_metrics(&metrics, LineSpacing::new(0)),
            Err(Error::ValueOutOfRange {
                field: "OS/2.usWinAscent",
                value: -100
            })
        ));
    }
}
