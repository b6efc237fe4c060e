//! Loading, patching and saving font files.
//!
//! The eight normalized fields are patched in place inside the existing
//! `OS/2` and `hhea` table data, so every other byte of the font (including
//! the sfnt version, table order and any tables we do not understand) is
//! preserved. Once the fields are written the affected table checksums and
//! `head.checksumAdjustment` are recomputed.

use std::{
    io::Write,
    ops::Range,
    path::{Path, PathBuf},
};

use read_fonts::{
    tables::{compute_checksum, head::Head, hhea::Hhea, os2::Os2},
    types::Tag,
    FontRef, ReadError, TableProvider, TopLevelTable,
};
use tempfile::NamedTempFile;

use crate::{hash::sha1_hex, Error, UpdatedMetrics, VerticalMetrics};

// sfnt version, numTables, searchRange, entrySelector, rangeShift
const TABLE_DIRECTORY_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;
// offset of the checksum inside a table record
const TABLE_RECORD_CHECKSUM_OFFSET: usize = 4;
// https://learn.microsoft.com/en-us/typography/opentype/spec/head
const CHECKSUM_ADJUSTMENT_MAGIC: u32 = 0xB1B0AFBA;

/// The contents of a single font file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontStore {
    data: Vec<u8>,
}

/// The location of a table inside the font data.
#[derive(Clone, Copy, Debug)]
struct TableLocation {
    record_index: usize,
    offset: usize,
    len: usize,
}

impl TableLocation {
    fn find(font: &FontRef, tag: Tag) -> Result<Self, Error> {
        font.table_directory()
            .table_records()
            .iter()
            .enumerate()
            .find(|(_, record)| record.tag() == tag)
            .map(|(record_index, record)| TableLocation {
                record_index,
                offset: record.offset() as usize,
                len: record.length() as usize,
            })
            .ok_or_else(|| Error::missing(tag, ReadError::TableIsMissing(tag)))
    }

    fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    /// The absolute range of a field, given its range inside the table.
    fn field(&self, field: Range<usize>) -> Range<usize> {
        self.offset + field.start..self.offset + field.end
    }

    fn checksum_range(&self) -> Range<usize> {
        let start = TABLE_DIRECTORY_HEADER_LEN
            + self.record_index * TABLE_RECORD_LEN
            + TABLE_RECORD_CHECKSUM_OFFSET;
        start..start + 4
    }
}

/// Everything needed to write an [`UpdatedMetrics`] into the font data.
struct Patch {
    fields: Vec<(Range<usize>, [u8; 2])>,
    os2: TableLocation,
    hhea: TableLocation,
    head: TableLocation,
    checksum_adjustment: Range<usize>,
}

impl FontStore {
    /// Read the font file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| Error::ReadFailure {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self { data })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn font(&self) -> Result<FontRef<'_>, Error> {
        FontRef::new(&self.data).map_err(Error::MalformedFont)
    }

    /// Extract the vertical metrics.
    pub fn metrics(&self) -> Result<VerticalMetrics, Error> {
        VerticalMetrics::new(&self.font()?)
    }

    /// The SHA-1 digest of the current font data.
    pub fn content_hash(&self) -> String {
        sha1_hex(&self.data)
    }

    /// Write all the fields of `updated` into the font data.
    ///
    /// Either every field is written or, on error, the data is left untouched.
    pub fn apply(&mut self, updated: &UpdatedMetrics) -> Result<(), Error> {
        let patch = self.plan_patch(updated)?;
        for (range, bytes) in &patch.fields {
            self.data[range.clone()].copy_from_slice(bytes);
        }

        // the head checksum is computed with checksumAdjustment set to zero
        self.data[patch.checksum_adjustment.clone()].copy_from_slice(&[0; 4]);
        for table in [patch.os2, patch.hhea, patch.head] {
            let checksum = compute_checksum(&self.data[table.range()]);
            self.data[table.checksum_range()].copy_from_slice(&checksum.to_be_bytes());
        }
        let adjustment = CHECKSUM_ADJUSTMENT_MAGIC.wrapping_sub(compute_checksum(&self.data));
        self.data[patch.checksum_adjustment].copy_from_slice(&adjustment.to_be_bytes());
        Ok(())
    }

    fn plan_patch(&self, updated: &UpdatedMetrics) -> Result<Patch, Error> {
        let font = self.font()?;
        let os2 = font.os2().map_err(|e| Error::missing(Os2::TAG, e))?;
        let hhea = font.hhea().map_err(|e| Error::missing(Hhea::TAG, e))?;
        let head = font.head().map_err(|e| Error::missing(Head::TAG, e))?;
        let os2_loc = TableLocation::find(&font, Os2::TAG)?;
        let hhea_loc = TableLocation::find(&font, Hhea::TAG)?;
        let head_loc = TableLocation::find(&font, Head::TAG)?;

        let fields = vec![
            (
                hhea_loc.field(hhea.ascender_byte_range()),
                updated.hhea_ascender.to_be_bytes(),
            ),
            (
                hhea_loc.field(hhea.descender_byte_range()),
                updated.hhea_descender.to_be_bytes(),
            ),
            (
                hhea_loc.field(hhea.line_gap_byte_range()),
                updated.hhea_line_gap.to_be_bytes(),
            ),
            (
                os2_loc.field(os2.s_typo_ascender_byte_range()),
                updated.typo_ascender.to_be_bytes(),
            ),
            (
                os2_loc.field(os2.s_typo_descender_byte_range()),
                updated.typo_descender.to_be_bytes(),
            ),
            (
                os2_loc.field(os2.s_typo_line_gap_byte_range()),
                updated.typo_line_gap.to_be_bytes(),
            ),
            (
                os2_loc.field(os2.us_win_ascent_byte_range()),
                updated.win_ascent.to_be_bytes(),
            ),
            (
                os2_loc.field(os2.us_win_descent_byte_range()),
                updated.win_descent.to_be_bytes(),
            ),
        ];
        let checksum_adjustment = head_loc.field(head.checksum_adjustment_byte_range());

        // every range was derived from parsed tables, but a table that runs
        // past the end of the file must not cause a panic
        let in_bounds = |range: &Range<usize>| range.end <= self.data.len();
        if !(fields.iter().all(|(range, _)| in_bounds(range))
            && [os2_loc, hhea_loc, head_loc]
                .iter()
                .all(|loc| in_bounds(&loc.range()) && in_bounds(&loc.checksum_range()))
            && in_bounds(&checksum_adjustment))
        {
            return Err(Error::MalformedFont(ReadError::OutOfBounds));
        }
        Ok(Patch {
            fields,
            os2: os2_loc,
            hhea: hhea_loc,
            head: head_loc,
            checksum_adjustment,
        })
    }

    /// Write the font data to `path`.
    ///
    /// The data is written to a temporary file next to `path` which is only
    /// renamed over `path` once it has been written completely. On failure
    /// the temporary file is removed and `path` is untouched.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let write_failure = |source| Error::WriteFailure {
            path: path.to_owned(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_owned(),
            _ => PathBuf::from("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(write_failure)?;
        staged.write_all(&self.data).map_err(write_failure)?;
        staged.as_file().sync_all().map_err(write_failure)?;
        staged
            .persist(path)
            .map_err(|e| write_failure(e.error))?;
        Ok(())
    }
}
