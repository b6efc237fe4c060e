//! Synthetic fonts shared between the font-line tests.
//!
//! The fonts built here only contain the tables that font-line reads
//! (`head`, `hhea`, `OS/2` and `name`), which keeps the fixtures small and
//! lets every test spell out the exact metrics it cares about.

use write_fonts::{
    read::tables::os2::SelectionFlags,
    tables::{
        head::Head,
        hhea::Hhea,
        name::{Name, NameRecord},
        os2::Os2,
    },
    types::{FWord, NameId},
    FontBuilder,
};

/// The version string written to name id 5 by the presets.
pub static VERSION_STRING: &str = "Version 1.000;TEST";

/// Tables that [`TestFont::build_without`] can leave out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    Head,
    Hhea,
    Os2,
    Name,
}

/// The vertical metrics of a synthetic font.
///
/// When `x_height` and `cap_height` are both `None` a version 0 OS/2 table is
/// written, otherwise a version 4 table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFont {
    pub units_per_em: u16,
    pub y_max: i16,
    pub y_min: i16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
    pub x_height: Option<i16>,
    pub cap_height: Option<i16>,
    pub use_typo_metrics: bool,
    pub hhea_ascender: i16,
    pub hhea_descender: i16,
    pub hhea_line_gap: i16,
    pub version_string: Option<String>,
}

impl TestFont {
    /// Zero typo line gap with a typo spread exactly one em (the "Adobe" style).
    pub fn typo_equals_em() -> Self {
        Self {
            units_per_em: 1000,
            y_max: 950,
            y_min: -250,
            typo_ascender: 800,
            typo_descender: -200,
            typo_line_gap: 0,
            win_ascent: 950,
            win_descent: 250,
            x_height: Some(500),
            cap_height: Some(700),
            use_typo_metrics: false,
            hhea_ascender: 800,
            hhea_descender: -200,
            hhea_line_gap: 0,
            version_string: Some(VERSION_STRING.to_string()),
        }
    }

    /// Zero typo line gap with a typo spread larger than one em (the
    /// "Google" style).
    pub fn typo_exceeds_em() -> Self {
        Self {
            units_per_em: 2048,
            y_max: 2163,
            y_min: -555,
            typo_ascender: 2146,
            typo_descender: -555,
            typo_line_gap: 0,
            win_ascent: 2146,
            win_descent: 555,
            x_height: Some(1082),
            cap_height: Some(1456),
            use_typo_metrics: true,
            hhea_ascender: 2146,
            hhea_descender: -555,
            hhea_line_gap: 0,
            version_string: Some(VERSION_STRING.to_string()),
        }
    }

    /// A non-zero typo line gap.
    pub fn typo_with_line_gap() -> Self {
        Self {
            units_per_em: 1000,
            y_max: 1013,
            y_min: -271,
            typo_ascender: 750,
            typo_descender: -250,
            typo_line_gap: 200,
            win_ascent: 1013,
            win_descent: 271,
            x_height: None,
            cap_height: None,
            use_typo_metrics: false,
            hhea_ascender: 1013,
            hhea_descender: -271,
            hhea_line_gap: 0,
            version_string: None,
        }
    }

    /// Compile the font with all four tables.
    pub fn build(&self) -> Vec<u8> {
        self.build_inner(None)
    }

    /// Compile the font, leaving out one table.
    pub fn build_without(&self, table: Table) -> Vec<u8> {
        self.build_inner(Some(table))
    }

    fn build_inner(&self, omit: Option<Table>) -> Vec<u8> {
        let mut builder = FontBuilder::new();
        if omit != Some(Table::Head) {
            builder.add_table(&self.head()).unwrap();
        }
        if omit != Some(Table::Hhea) {
            builder.add_table(&self.hhea()).unwrap();
        }
        if omit != Some(Table::Os2) {
            builder.add_table(&self.os2()).unwrap();
        }
        if omit != Some(Table::Name) {
            builder.add_table(&self.name()).unwrap();
        }
        builder.build()
    }

    fn head(&self) -> Head {
        Head {
            units_per_em: self.units_per_em,
            x_min: 0,
            y_min: self.y_min,
            x_max: 1000,
            y_max: self.y_max,
            ..Default::default()
        }
    }

    fn hhea(&self) -> Hhea {
        Hhea {
            ascender: FWord::new(self.hhea_ascender),
            descender: FWord::new(self.hhea_descender),
            line_gap: FWord::new(self.hhea_line_gap),
            ..Default::default()
        }
    }

    fn os2(&self) -> Os2 {
        let fs_selection = if self.use_typo_metrics {
            SelectionFlags::REGULAR | SelectionFlags::USE_TYPO_METRICS
        } else {
            SelectionFlags::REGULAR
        };
        let mut os2 = Os2 {
            us_weight_class: 400,
            us_width_class: 5,
            fs_selection,
            s_typo_ascender: self.typo_ascender,
            s_typo_descender: self.typo_descender,
            s_typo_line_gap: self.typo_line_gap,
            us_win_ascent: self.win_ascent,
            us_win_descent: self.win_descent,
            ..Default::default()
        };
        if self.x_height.is_some() || self.cap_height.is_some() {
            os2.ul_code_page_range_1 = Some(1);
            os2.ul_code_page_range_2 = Some(0);
            os2.sx_height = Some(self.x_height.unwrap_or_default());
            os2.s_cap_height = Some(self.cap_height.unwrap_or_default());
            os2.us_default_char = Some(0);
            os2.us_break_char = Some(0x20);
            os2.us_max_context = Some(2);
        }
        os2
    }

    fn name(&self) -> Name {
        let mut name = Name::default();
        // family name first so the version string is not the only record
        name.name_record.push(NameRecord::new(
            3,
            1,
            0x409,
            NameId::new(1),
            String::from("Line Test").into(),
        ));
        if let Some(version) = &self.version_string {
            name.name_record.push(NameRecord::new(
                3,
                1,
                0x409,
                NameId::VERSION_STRING,
                version.clone().into(),
            ));
        }
        name
    }
}
