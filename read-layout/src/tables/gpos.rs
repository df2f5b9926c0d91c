//! The [GPOS](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos) table.

#[path = "./value_record.rs"]
mod value_record;

use types::{BigEndian, FixedSize, GlyphId16, Offset16, Offset32, Tag};

pub use super::layout::{
    ChainedSequenceContext, ClassDef, CoverageTable, FeatureList, LayoutHeader, Lookup,
    LookupList, ScriptList, SequenceContext,
};
pub use value_record::{ValueFormat, ValueRecord};

use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// 'GPOS'
pub const TAG: Tag = Tag::new(b"GPOS");

/// The positioning lookup types.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#table-organization>
pub mod lookup_type {
    pub const SINGLE_ADJUSTMENT: u16 = 1;
    pub const PAIR_ADJUSTMENT: u16 = 2;
    pub const CURSIVE_ATTACHMENT: u16 = 3;
    pub const MARK_TO_BASE_ATTACHMENT: u16 = 4;
    pub const MARK_TO_LIGATURE_ATTACHMENT: u16 = 5;
    pub const MARK_TO_MARK_ATTACHMENT: u16 = 6;
    pub const CONTEXTUAL: u16 = 7;
    pub const CHAINED_CONTEXTUAL: u16 = 8;
    pub const EXTENSION: u16 = 9;
}

/// An [Anchor Table](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-tables).
///
/// All three formats begin with the design-unit coordinates; the contour
/// point of format 2 and the device offsets of format 3 are not used by this
/// engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorTable {
    anchor_format: u16,
    x_coordinate: i16,
    y_coordinate: i16,
}

impl<'a> FontRead<'a> for AnchorTable {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let anchor_format: u16 = cursor.read()?;
        if !(1..=3).contains(&anchor_format) {
            return Err(ReadError::InvalidFormat(anchor_format.into()));
        }
        let x_coordinate = cursor.read()?;
        let y_coordinate = cursor.read()?;
        Ok(AnchorTable {
            anchor_format,
            x_coordinate,
            y_coordinate,
        })
    }
}

impl AnchorTable {
    /// Format identifier (1, 2 or 3).
    pub fn anchor_format(&self) -> u16 {
        self.anchor_format
    }

    /// Horizontal value, in design units.
    pub fn x_coordinate(&self) -> i16 {
        self.x_coordinate
    }

    /// Vertical value, in design units.
    pub fn y_coordinate(&self) -> i16 {
        self.y_coordinate
    }
}

/// [Single Adjustment Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-1-single-positioning-value): one value for all covered glyphs.
#[derive(Clone)]
pub struct SinglePosFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    value_format: ValueFormat,
    value_record: ValueRecord,
}

impl<'a> FontRead<'a> for SinglePosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let value_format: ValueFormat = cursor.read()?;
        let record_data = data
            .split_off(cursor.position()?)
            .ok_or(ReadError::OutOfBounds)?;
        let value_record = ValueRecord::read(record_data, value_format)?;
        Ok(SinglePosFormat1 {
            data,
            coverage_offset,
            value_format,
            value_record,
        })
    }
}

impl<'a> SinglePosFormat1<'a> {
    /// Coverage of the glyphs this subtable adjusts.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The format of the value record.
    pub fn value_format(&self) -> ValueFormat {
        self.value_format
    }

    /// The adjustment applied to every covered glyph.
    pub fn value_record(&self) -> &ValueRecord {
        &self.value_record
    }
}

/// [Single Adjustment Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-2-array-of-positioning-values): one value per covered glyph.
#[derive(Clone)]
pub struct SinglePosFormat2<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    value_format: ValueFormat,
    value_count: u16,
    records_start: usize,
}

impl<'a> FontRead<'a> for SinglePosFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let value_format: ValueFormat = cursor.read()?;
        let value_count = cursor.read()?;
        let records_start = cursor.position()?;
        Ok(SinglePosFormat2 {
            data,
            coverage_offset,
            value_format,
            value_count,
            records_start,
        })
    }
}

impl<'a> SinglePosFormat2<'a> {
    /// Coverage of the glyphs this subtable adjusts.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The format of the value records.
    pub fn value_format(&self) -> ValueFormat {
        self.value_format
    }

    /// The number of value records.
    pub fn value_count(&self) -> u16 {
        self.value_count
    }

    /// The adjustment for the glyph with the given coverage index.
    pub fn value_record(&self, index: u16) -> Result<ValueRecord, ReadError> {
        if index >= self.value_count {
            return Err(ReadError::OutOfBounds);
        }
        let offset = self.records_start + index as usize * self.value_format.record_byte_len();
        let record_data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        ValueRecord::read(record_data, self.value_format)
    }
}

/// A [Single Adjustment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-1-single-adjustment-positioning-subtable) subtable.
#[derive(Clone)]
pub enum SinglePos<'a> {
    Format1(SinglePosFormat1<'a>),
    Format2(SinglePosFormat2<'a>),
}

impl<'a> FontRead<'a> for SinglePos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => SinglePosFormat1::read(data).map(Self::Format1),
            2 => SinglePosFormat2::read(data).map(Self::Format2),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// [Pair Adjustment Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-1-adjustments-for-glyph-pairs): adjustments for glyph pairs.
#[derive(Clone)]
pub struct PairPosFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    pair_set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for PairPosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let value_format1 = cursor.read()?;
        let value_format2 = cursor.read()?;
        let pair_set_count: u16 = cursor.read()?;
        let pair_set_offsets = cursor.read_array(pair_set_count as usize)?;
        Ok(PairPosFormat1 {
            data,
            coverage_offset,
            value_format1,
            value_format2,
            pair_set_offsets,
        })
    }
}

impl<'a> PairPosFormat1<'a> {
    /// Coverage of the first glyph of every pair.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The value format applied to the first glyph.
    pub fn value_format1(&self) -> ValueFormat {
        self.value_format1
    }

    /// The value format applied to the second glyph.
    pub fn value_format2(&self) -> ValueFormat {
        self.value_format2
    }

    /// The pair set for the given coverage index of the first glyph.
    pub fn pair_set(&self, index: u16) -> Result<PairSet<'a>, ReadError> {
        let offset = self
            .pair_set_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        let data = offset
            .resolve::<FontData<'a>>(self.data)?;
        PairSet::read(data, self.value_format1, self.value_format2)
    }
}

/// The pair value records for one first glyph, sorted by second glyph.
#[derive(Clone)]
pub struct PairSet<'a> {
    data: FontData<'a>,
    pair_value_count: u16,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
}

impl<'a> PairSet<'a> {
    fn read(
        data: FontData<'a>,
        value_format1: ValueFormat,
        value_format2: ValueFormat,
    ) -> Result<Self, ReadError> {
        let pair_value_count = data.read_at(0)?;
        Ok(PairSet {
            data,
            pair_value_count,
            value_format1,
            value_format2,
        })
    }

    fn record_byte_len(&self) -> usize {
        u16::RAW_BYTE_LEN
            + self.value_format1.record_byte_len()
            + self.value_format2.record_byte_len()
    }

    /// Binary search the records for the given second glyph.
    ///
    /// On a match, returns the value records for the first and second glyph
    /// of the pair.
    pub fn pair_value_record(
        &self,
        second_glyph: GlyphId16,
    ) -> Option<(ValueRecord, ValueRecord)> {
        let record_len = self.record_byte_len();
        let mut lo = 0usize;
        let mut hi = self.pair_value_count as usize;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let record_start = u16::RAW_BYTE_LEN + mid * record_len;
            let glyph: GlyphId16 = self.data.read_at(record_start).ok()?;
            match glyph.cmp(&second_glyph) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => {
                    let value1_start = record_start + u16::RAW_BYTE_LEN;
                    let value2_start = value1_start + self.value_format1.record_byte_len();
                    let value1 =
                        ValueRecord::read(self.data.split_off(value1_start)?, self.value_format1)
                            .ok()?;
                    let value2 =
                        ValueRecord::read(self.data.split_off(value2_start)?, self.value_format2)
                            .ok()?;
                    return Some((value1, value2));
                }
            }
        }
        None
    }
}

/// [Pair Adjustment Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-2-class-pair-adjustment): adjustments for glyph class pairs.
#[derive(Clone)]
pub struct PairPosFormat2<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    class_def1_offset: Offset16,
    class_def2_offset: Offset16,
    class1_count: u16,
    class2_count: u16,
    records_start: usize,
}

impl<'a> FontRead<'a> for PairPosFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let value_format1 = cursor.read()?;
        let value_format2 = cursor.read()?;
        let class_def1_offset = cursor.read()?;
        let class_def2_offset = cursor.read()?;
        let class1_count = cursor.read()?;
        let class2_count = cursor.read()?;
        let records_start = cursor.position()?;
        Ok(PairPosFormat2 {
            data,
            coverage_offset,
            value_format1,
            value_format2,
            class_def1_offset,
            class_def2_offset,
            class1_count,
            class2_count,
            records_start,
        })
    }
}

impl<'a> PairPosFormat2<'a> {
    /// Coverage of the first glyph of every pair.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The value format applied to the first glyph.
    pub fn value_format1(&self) -> ValueFormat {
        self.value_format1
    }

    /// The value format applied to the second glyph.
    pub fn value_format2(&self) -> ValueFormat {
        self.value_format2
    }

    /// The class definition for first glyphs.
    pub fn class_def1(&self) -> Result<ClassDef<'a>, ReadError> {
        self.class_def1_offset.resolve(self.data)
    }

    /// The class definition for second glyphs.
    pub fn class_def2(&self) -> Result<ClassDef<'a>, ReadError> {
        self.class_def2_offset.resolve(self.data)
    }

    /// The number of classes of the first glyph.
    pub fn class1_count(&self) -> u16 {
        self.class1_count
    }

    /// The number of classes of the second glyph.
    pub fn class2_count(&self) -> u16 {
        self.class2_count
    }

    /// The value records for the given class pair.
    pub fn class_pair_value_records(
        &self,
        class1: u16,
        class2: u16,
    ) -> Result<(ValueRecord, ValueRecord), ReadError> {
        if class1 >= self.class1_count || class2 >= self.class2_count {
            return Err(ReadError::OutOfBounds);
        }
        let class2_len =
            self.value_format1.record_byte_len() + self.value_format2.record_byte_len();
        let index = class1 as usize * self.class2_count as usize + class2 as usize;
        let value1_start = self.records_start + index * class2_len;
        let value2_start = value1_start + self.value_format1.record_byte_len();
        let value1 = ValueRecord::read(
            self.data
                .split_off(value1_start)
                .ok_or(ReadError::OutOfBounds)?,
            self.value_format1,
        )?;
        let value2 = ValueRecord::read(
            self.data
                .split_off(value2_start)
                .ok_or(ReadError::OutOfBounds)?,
            self.value_format2,
        )?;
        Ok((value1, value2))
    }
}

/// A [Pair Adjustment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-2-pair-adjustment-positioning-subtable) subtable.
#[derive(Clone)]
pub enum PairPos<'a> {
    Format1(PairPosFormat1<'a>),
    Format2(PairPosFormat2<'a>),
}

impl<'a> FontRead<'a> for PairPos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => PairPosFormat1::read(data).map(Self::Format1),
            2 => PairPosFormat2::read(data).map(Self::Format2),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// The entry and exit anchors of one glyph in a cursive attachment subtable.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct EntryExitRecord {
    entry_anchor_offset: BigEndian<Offset16>,
    exit_anchor_offset: BigEndian<Offset16>,
}

impl EntryExitRecord {
    /// Offset to the entry anchor, from the beginning of the subtable; may
    /// be null.
    pub fn entry_anchor_offset(&self) -> Offset16 {
        self.entry_anchor_offset.get()
    }

    /// Offset to the exit anchor, from the beginning of the subtable; may
    /// be null.
    pub fn exit_anchor_offset(&self) -> Offset16 {
        self.exit_anchor_offset.get()
    }
}

impl FixedSize for EntryExitRecord {
    const RAW_BYTE_LEN: usize = 2 * Offset16::RAW_BYTE_LEN;
}

/// A [Cursive Attachment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-3-cursive-attachment-positioning-subtable) subtable (format 1).
#[derive(Clone)]
pub struct CursivePosFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    entry_exit_records: &'a [EntryExitRecord],
}

impl<'a> FontRead<'a> for CursivePosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let coverage_offset = cursor.read()?;
        let entry_exit_count: u16 = cursor.read()?;
        let entry_exit_records = cursor.read_array(entry_exit_count as usize)?;
        Ok(CursivePosFormat1 {
            data,
            coverage_offset,
            entry_exit_records,
        })
    }
}

impl<'a> CursivePosFormat1<'a> {
    /// Coverage of the glyphs taking part in cursive attachment.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The entry anchor for the glyph with the given coverage index, if any.
    pub fn entry_anchor(&self, index: u16) -> Option<Result<AnchorTable, ReadError>> {
        let record = self.entry_exit_records.get(index as usize)?;
        record.entry_anchor_offset().resolve_nullable(self.data)
    }

    /// The exit anchor for the glyph with the given coverage index, if any.
    pub fn exit_anchor(&self, index: u16) -> Option<Result<AnchorTable, ReadError>> {
        let record = self.entry_exit_records.get(index as usize)?;
        record.exit_anchor_offset().resolve_nullable(self.data)
    }
}

/// One mark in a [`MarkArray`]: its class and the offset to its anchor.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct MarkRecord {
    mark_class: BigEndian<u16>,
    mark_anchor_offset: BigEndian<Offset16>,
}

impl MarkRecord {
    /// The attachment class of the mark.
    pub fn mark_class(&self) -> u16 {
        self.mark_class.get()
    }

    /// Offset to the mark's anchor, from the beginning of the mark array.
    pub fn mark_anchor_offset(&self) -> Offset16 {
        self.mark_anchor_offset.get()
    }
}

impl FixedSize for MarkRecord {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN + Offset16::RAW_BYTE_LEN;
}

/// A [Mark Array](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-array-table) table.
#[derive(Clone)]
pub struct MarkArray<'a> {
    data: FontData<'a>,
    mark_records: &'a [MarkRecord],
}

impl<'a> FontRead<'a> for MarkArray<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let mark_count: u16 = cursor.read()?;
        let mark_records = cursor.read_array(mark_count as usize)?;
        Ok(MarkArray { data, mark_records })
    }
}

impl<'a> MarkArray<'a> {
    /// The class and anchor of the mark with the given coverage index.
    pub fn mark_anchor(&self, index: u16) -> Option<(u16, Result<AnchorTable, ReadError>)> {
        let record = self.mark_records.get(index as usize)?;
        Some((
            record.mark_class(),
            record.mark_anchor_offset().resolve(self.data),
        ))
    }
}

/// A matrix of anchor offsets: one row per attachment target, one column per
/// mark class.
///
/// This is the shared shape of the BaseArray, Mark2Array and LigatureAttach
/// tables; the leading count is the row count, and the offsets are relative
/// to the matrix itself.
#[derive(Clone)]
pub struct AnchorMatrix<'a> {
    data: FontData<'a>,
    class_count: u16,
    row_count: u16,
    anchor_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> AnchorMatrix<'a> {
    fn read(data: FontData<'a>, class_count: u16) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let row_count: u16 = cursor.read()?;
        let anchor_offsets =
            cursor.read_array(row_count as usize * class_count as usize)?;
        Ok(AnchorMatrix {
            data,
            class_count,
            row_count,
            anchor_offsets,
        })
    }

    /// The number of rows (bases, ligature components, or attachment-target
    /// marks).
    pub fn row_count(&self) -> u16 {
        self.row_count
    }

    /// The anchor for the given row and mark class, or `None` if absent.
    pub fn anchor(&self, row: u16, class: u16) -> Option<Result<AnchorTable, ReadError>> {
        if class >= self.class_count {
            return None;
        }
        let index = row as usize * self.class_count as usize + class as usize;
        let offset = self.anchor_offsets.get(index)?.get();
        offset.resolve_nullable(self.data)
    }
}

/// A [Mark-to-Base Attachment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-4-mark-to-base-attachment-positioning-subtable) subtable (format 1).
#[derive(Clone)]
pub struct MarkBasePosFormat1<'a> {
    data: FontData<'a>,
    mark_coverage_offset: Offset16,
    base_coverage_offset: Offset16,
    mark_class_count: u16,
    mark_array_offset: Offset16,
    base_array_offset: Offset16,
}

impl<'a> FontRead<'a> for MarkBasePosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let mark_coverage_offset = cursor.read()?;
        let base_coverage_offset = cursor.read()?;
        let mark_class_count = cursor.read()?;
        let mark_array_offset = cursor.read()?;
        let base_array_offset = cursor.read()?;
        Ok(MarkBasePosFormat1 {
            data,
            mark_coverage_offset,
            base_coverage_offset,
            mark_class_count,
            mark_array_offset,
            base_array_offset,
        })
    }
}

impl<'a> MarkBasePosFormat1<'a> {
    /// Coverage of the marks this subtable attaches.
    pub fn mark_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.mark_coverage_offset.resolve(self.data)
    }

    /// Coverage of the bases marks may attach to.
    pub fn base_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.base_coverage_offset.resolve(self.data)
    }

    /// The number of mark classes.
    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    /// The mark array, indexed by mark coverage index.
    pub fn mark_array(&self) -> Result<MarkArray<'a>, ReadError> {
        self.mark_array_offset.resolve(self.data)
    }

    /// The base anchors, one row per base coverage index.
    pub fn base_array(&self) -> Result<AnchorMatrix<'a>, ReadError> {
        let data = self.base_array_offset.resolve::<FontData<'a>>(self.data)?;
        AnchorMatrix::read(data, self.mark_class_count)
    }
}

/// A [Mark-to-Ligature Attachment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-5-mark-to-ligature-attachment-positioning-subtable) subtable (format 1).
#[derive(Clone)]
pub struct MarkLigPosFormat1<'a> {
    data: FontData<'a>,
    mark_coverage_offset: Offset16,
    ligature_coverage_offset: Offset16,
    mark_class_count: u16,
    mark_array_offset: Offset16,
    ligature_array_offset: Offset16,
}

impl<'a> FontRead<'a> for MarkLigPosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let mark_coverage_offset = cursor.read()?;
        let ligature_coverage_offset = cursor.read()?;
        let mark_class_count = cursor.read()?;
        let mark_array_offset = cursor.read()?;
        let ligature_array_offset = cursor.read()?;
        Ok(MarkLigPosFormat1 {
            data,
            mark_coverage_offset,
            ligature_coverage_offset,
            mark_class_count,
            mark_array_offset,
            ligature_array_offset,
        })
    }
}

impl<'a> MarkLigPosFormat1<'a> {
    /// Coverage of the marks this subtable attaches.
    pub fn mark_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.mark_coverage_offset.resolve(self.data)
    }

    /// Coverage of the ligatures marks may attach to.
    pub fn ligature_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.ligature_coverage_offset.resolve(self.data)
    }

    /// The number of mark classes.
    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    /// The mark array, indexed by mark coverage index.
    pub fn mark_array(&self) -> Result<MarkArray<'a>, ReadError> {
        self.mark_array_offset.resolve(self.data)
    }

    /// The ligature array, indexed by ligature coverage index.
    pub fn ligature_array(&self) -> Result<LigatureArray<'a>, ReadError> {
        let data = self
            .ligature_array_offset
            .resolve::<FontData<'a>>(self.data)?;
        LigatureArray::read(data, self.mark_class_count)
    }
}

/// The [Ligature Array](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#ligature-array-table) table.
#[derive(Clone)]
pub struct LigatureArray<'a> {
    data: FontData<'a>,
    class_count: u16,
    ligature_attach_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> LigatureArray<'a> {
    fn read(data: FontData<'a>, class_count: u16) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let ligature_count: u16 = cursor.read()?;
        let ligature_attach_offsets = cursor.read_array(ligature_count as usize)?;
        Ok(LigatureArray {
            data,
            class_count,
            ligature_attach_offsets,
        })
    }

    /// The number of ligatures.
    pub fn ligature_count(&self) -> u16 {
        self.ligature_attach_offsets.len() as u16
    }

    /// The anchor matrix for the ligature with the given coverage index,
    /// one row per component.
    pub fn ligature_attach(&self, index: u16) -> Result<AnchorMatrix<'a>, ReadError> {
        let offset = self
            .ligature_attach_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        let data = offset.resolve::<FontData<'a>>(self.data)?;
        AnchorMatrix::read(data, self.class_count)
    }
}

/// A [Mark-to-Mark Attachment](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-6-mark-to-mark-attachment-positioning-subtable) subtable (format 1).
#[derive(Clone)]
pub struct MarkMarkPosFormat1<'a> {
    data: FontData<'a>,
    mark1_coverage_offset: Offset16,
    mark2_coverage_offset: Offset16,
    mark_class_count: u16,
    mark1_array_offset: Offset16,
    mark2_array_offset: Offset16,
}

impl<'a> FontRead<'a> for MarkMarkPosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let mark1_coverage_offset = cursor.read()?;
        let mark2_coverage_offset = cursor.read()?;
        let mark_class_count = cursor.read()?;
        let mark1_array_offset = cursor.read()?;
        let mark2_array_offset = cursor.read()?;
        Ok(MarkMarkPosFormat1 {
            data,
            mark1_coverage_offset,
            mark2_coverage_offset,
            mark_class_count,
            mark1_array_offset,
            mark2_array_offset,
        })
    }
}

impl<'a> MarkMarkPosFormat1<'a> {
    /// Coverage of the attaching marks.
    pub fn mark1_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.mark1_coverage_offset.resolve(self.data)
    }

    /// Coverage of the marks attached to.
    pub fn mark2_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.mark2_coverage_offset.resolve(self.data)
    }

    /// The number of mark classes.
    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    /// The array of attaching marks, indexed by mark1 coverage index.
    pub fn mark1_array(&self) -> Result<MarkArray<'a>, ReadError> {
        self.mark1_array_offset.resolve(self.data)
    }

    /// The anchors of the marks attached to, one row per mark2 coverage
    /// index.
    pub fn mark2_array(&self) -> Result<AnchorMatrix<'a>, ReadError> {
        let data = self.mark2_array_offset.resolve::<FontData<'a>>(self.data)?;
        AnchorMatrix::read(data, self.mark_class_count)
    }
}

/// An [Extension Positioning](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-9-extension-positioning) subtable.
#[derive(Clone)]
pub struct ExtensionPosFormat1<'a> {
    data: FontData<'a>,
    extension_lookup_type: u16,
    extension_offset: Offset32,
}

impl<'a> FontRead<'a> for ExtensionPosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let extension_lookup_type = cursor.read()?;
        let extension_offset = cursor.read()?;
        Ok(ExtensionPosFormat1 {
            data,
            extension_lookup_type,
            extension_offset,
        })
    }
}

impl<'a> ExtensionPosFormat1<'a> {
    /// The lookup type of the wrapped subtable.
    pub fn extension_lookup_type(&self) -> u16 {
        self.extension_lookup_type
    }

    /// The raw data of the wrapped subtable.
    pub fn extension_data(&self) -> Result<FontData<'a>, ReadError> {
        self.extension_offset.resolve(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_test_data::BeBuffer;

    #[test]
    fn anchor_formats() {
        let f1 = BeBuffer::new().push(1u16).push(500i16).push(700i16);
        let anchor = AnchorTable::read(FontData::new(f1.data())).unwrap();
        assert_eq!(anchor.x_coordinate(), 500);
        assert_eq!(anchor.y_coordinate(), 700);

        let f2 = BeBuffer::new()
            .push(2u16)
            .push(-20i16)
            .push(15i16)
            .push(3u16);
        let anchor = AnchorTable::read(FontData::new(f2.data())).unwrap();
        assert_eq!((anchor.x_coordinate(), anchor.y_coordinate()), (-20, 15));

        let bad = BeBuffer::new().push(4u16).push(0i16).push(0i16);
        assert!(AnchorTable::read(FontData::new(bad.data())).is_err());
    }

    #[test]
    fn pair_set_binary_search() {
        // two records, value format 1 = X_ADVANCE only, format 2 empty
        let buf = BeBuffer::new()
            .push(2u16) // pair value count
            .push(20u16) // second glyph
            .push(-120i16) // value 1 x advance
            .push(31u16)
            .push(55i16);
        let set = PairSet::read(
            FontData::new(buf.data()),
            ValueFormat::X_ADVANCE,
            ValueFormat::from_bits(0),
        )
        .unwrap();
        let (value1, _) = set.pair_value_record(GlyphId16::new(20)).unwrap();
        assert_eq!(value1.x_advance(), -120);
        let (value1, _) = set.pair_value_record(GlyphId16::new(31)).unwrap();
        assert_eq!(value1.x_advance(), 55);
        assert!(set.pair_value_record(GlyphId16::new(25)).is_none());
    }

    #[test]
    fn class_pair_records() {
        // two first classes, two second classes, value formats: x advance
        // for the first glyph only
        let buf = BeBuffer::new()
            .push(2u16) // format
            .push(32u16) // coverage offset
            .push(0x0004u16) // value format 1
            .push(0u16) // value format 2
            .push(24u16) // class def 1 offset
            .push(0u16) // class def 2 offset (none: every glyph class 0)
            .push(2u16) // class 1 count
            .push(2u16) // class 2 count
            // class records: (0,0) (0,1) (1,0) (1,1)
            .push(0i16)
            .push(10i16)
            .push(-40i16)
            .push(60i16)
            // class def 1 at 24: glyph 4 -> class 1
            .push(1u16)
            .push(4u16)
            .push(1u16)
            .push(1u16)
            // coverage at 32
            .push(1u16)
            .push(1u16)
            .push(4u16);
        let pos = PairPos::read(FontData::new(buf.data())).unwrap();
        let PairPos::Format2(pos) = pos else {
            panic!("expected format 2");
        };
        assert_eq!(pos.class_def1().unwrap().get(GlyphId16::new(4)), 1);
        let (value1, value2) = pos.class_pair_value_records(1, 0).unwrap();
        assert_eq!(value1.x_advance(), -40);
        assert_eq!(value2.x_advance(), 0);
        let (value1, _) = pos.class_pair_value_records(0, 1).unwrap();
        assert_eq!(value1.x_advance(), 10);
        assert!(pos.class_pair_value_records(2, 0).is_err());
    }

    #[test]
    fn anchor_matrix() {
        // 1 row, 2 classes; second anchor null
        let buf = BeBuffer::new()
            .push(1u16) // row count
            .push(6u16) // anchor offset (row 0, class 0)
            .push(0u16) // anchor offset (row 0, class 1): null
            .push(1u16) // anchor format 1
            .push(500i16)
            .push(700i16);
        let matrix = AnchorMatrix::read(FontData::new(buf.data()), 2).unwrap();
        assert_eq!(matrix.row_count(), 1);
        let anchor = matrix.anchor(0, 0).unwrap().unwrap();
        assert_eq!(anchor.x_coordinate(), 500);
        assert!(matrix.anchor(0, 1).is_none());
        assert!(matrix.anchor(0, 2).is_none());
    }
}
