//! Extraction of the vertical metrics from a font.
//!
//! Three schemes describe the vertical extent of a font's lines:
//!
//! * typo: `sTypoAscender`, `sTypoDescender` and `sTypoLineGap` in the
//!   [OS/2](https://learn.microsoft.com/en-us/typography/opentype/spec/os2) table.
//! * win: `usWinAscent` and `usWinDescent`, also in OS/2. Both are unsigned,
//!   so the descent is stored as a positive magnitude.
//! * hhea: `ascender`, `descender` and `lineGap` in the
//!   [hhea](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea) table.
//!
//! The values are read fresh for every operation and never written back from
//! here; see [`crate::linegap`] for the computation of new values.

use read_fonts::{
    tables::{head::Head, hhea::Hhea, name::Name, os2::Os2, os2::SelectionFlags},
    types::NameId,
    TableProvider, TopLevelTable,
};

use crate::Error;

/// The vertical metrics of a font, along with the fields that are only
/// needed for reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerticalMetrics {
    /// `head.unitsPerEm`; never zero.
    pub units_per_em: u16,
    pub y_max: i16,
    pub y_min: i16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
    /// `None` for OS/2 tables older than version 2.
    pub x_height: Option<i16>,
    /// `None` for OS/2 tables older than version 2.
    pub cap_height: Option<i16>,
    /// Bit 7 of `OS/2.fsSelection`.
    pub use_typo_metrics: bool,
    pub hhea_ascender: i16,
    pub hhea_descender: i16,
    pub hhea_line_gap: i16,
    /// The first name record with name id 5.
    pub version_string: Option<String>,
}

impl VerticalMetrics {
    /// Reads the metrics from the `head`, `OS/2`, `hhea` and `name` tables.
    ///
    /// The `name` table is optional; every other table is required.
    pub fn new<'a>(font: &impl TableProvider<'a>) -> Result<Self, Error> {
        let head = font.head().map_err(|e| Error::missing(Head::TAG, e))?;
        let units_per_em = head.units_per_em();
        if units_per_em == 0 {
            return Err(Error::InvalidGridSize(units_per_em));
        }
        let os2 = font.os2().map_err(|e| Error::missing(Os2::TAG, e))?;
        let hhea = font.hhea().map_err(|e| Error::missing(Hhea::TAG, e))?;
        let version_string = match font.name() {
            Ok(name) => version_string(&name),
            Err(e) => {
                log::debug!("no version string: {e}");
                None
            }
        };
        Ok(Self {
            units_per_em,
            y_max: head.y_max(),
            y_min: head.y_min(),
            typo_ascender: os2.s_typo_ascender(),
            typo_descender: os2.s_typo_descender(),
            typo_line_gap: os2.s_typo_line_gap(),
            win_ascent: os2.us_win_ascent(),
            win_descent: os2.us_win_descent(),
            x_height: os2.sx_height(),
            cap_height: os2.s_cap_height(),
            use_typo_metrics: os2
                .fs_selection()
                .contains(SelectionFlags::USE_TYPO_METRICS),
            hhea_ascender: hhea.ascender().to_i16(),
            hhea_descender: hhea.descender().to_i16(),
            hhea_line_gap: hhea.line_gap().to_i16(),
            version_string,
        })
    }

    /// Distance from the typo ascender to the typo descender.
    pub fn typo_height(&self) -> i32 {
        self.typo_ascender as i32 - self.typo_descender as i32
    }

    /// Distance from the win ascent to the win descent.
    pub fn win_height(&self) -> i32 {
        self.win_ascent as i32 + self.win_descent as i32
    }

    /// Distance from the hhea ascender to the hhea descender.
    pub fn hhea_height(&self) -> i32 {
        self.hhea_ascender as i32 - self.hhea_descender as i32
    }
}

fn version_string(name: &Name) -> Option<String> {
    let record = name
        .name_record()
        .iter()
        .find(|record| record.name_id() == NameId::VERSION_STRING)?;
    match record.string(name.string_data()) {
        Ok(string) => Some(string.to_string()),
        Err(e) => {
            log::warn!("unable to decode version string: {e}");
            None
        }
    }
}
