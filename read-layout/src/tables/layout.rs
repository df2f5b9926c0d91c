//! OpenType layout common table formats.
//!
//! These are the structures shared by [GSUB](super::gsub) and
//! [GPOS](super::gpos): the script/feature/lookup lists that a shaping plan
//! is compiled from, the coverage and class definition tables that subtables
//! use to select glyphs, and the contextual rule formats.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2>

#[path = "./lookupflag.rs"]
mod lookupflag;

pub use lookupflag::LookupFlag;

use types::{BigEndian, FixedSize, GlyphId16, Offset16, Tag};

use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// The `GSUB`/`GPOS` table header.
///
/// Both tables share the same header layout; the minor version decides
/// whether a feature-variations offset is present, which this crate does not
/// interpret.
#[derive(Clone)]
pub struct LayoutHeader<'a> {
    data: FontData<'a>,
    script_list_offset: Offset16,
    feature_list_offset: Offset16,
    lookup_list_offset: Offset16,
}

impl<'a> FontRead<'a> for LayoutHeader<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _major_version: u16 = cursor.read()?;
        let _minor_version: u16 = cursor.read()?;
        let script_list_offset = cursor.read()?;
        let feature_list_offset = cursor.read()?;
        let lookup_list_offset = cursor.read()?;
        Ok(LayoutHeader {
            data,
            script_list_offset,
            feature_list_offset,
            lookup_list_offset,
        })
    }
}

impl<'a> LayoutHeader<'a> {
    /// The [`ScriptList`] for this table.
    pub fn script_list(&self) -> Result<ScriptList<'a>, ReadError> {
        self.script_list_offset.resolve(self.data)
    }

    /// The [`FeatureList`] for this table.
    pub fn feature_list(&self) -> Result<FeatureList<'a>, ReadError> {
        self.feature_list_offset.resolve(self.data)
    }

    /// The [`LookupList`] for this table.
    pub fn lookup_list(&self) -> Result<LookupList<'a>, ReadError> {
        self.lookup_list_offset.resolve(self.data)
    }
}

/// A tag and the offset to the script table it names.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct ScriptRecord {
    script_tag: BigEndian<Tag>,
    script_offset: BigEndian<Offset16>,
}

impl ScriptRecord {
    /// 4-byte script tag identifier.
    pub fn script_tag(&self) -> Tag {
        self.script_tag.get()
    }

    /// Offset to the script table, from the beginning of the script list.
    pub fn script_offset(&self) -> Offset16 {
        self.script_offset.get()
    }
}

impl FixedSize for ScriptRecord {
    const RAW_BYTE_LEN: usize = Tag::RAW_BYTE_LEN + Offset16::RAW_BYTE_LEN;
}

/// The [Script List](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#slTbl_sRec) table.
#[derive(Clone)]
pub struct ScriptList<'a> {
    data: FontData<'a>,
    script_records: &'a [ScriptRecord],
}

impl<'a> FontRead<'a> for ScriptList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let script_count: u16 = cursor.read()?;
        let script_records = cursor.read_array(script_count as usize)?;
        Ok(ScriptList {
            data,
            script_records,
        })
    }
}

impl<'a> ScriptList<'a> {
    /// The records for the scripts in this table, sorted by tag.
    pub fn script_records(&self) -> &'a [ScriptRecord] {
        self.script_records
    }

    /// Return the script with the given tag, if present.
    pub fn script_for_tag(&self, tag: Tag) -> Option<Result<Script<'a>, ReadError>> {
        let record = self
            .script_records
            .iter()
            .find(|rec| rec.script_tag() == tag)?;
        Some(record.script_offset().resolve(self.data))
    }
}

/// A tag and the offset to the language-system table it names.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct LangSysRecord {
    lang_sys_tag: BigEndian<Tag>,
    lang_sys_offset: BigEndian<Offset16>,
}

impl LangSysRecord {
    /// 4-byte language-system tag identifier.
    pub fn lang_sys_tag(&self) -> Tag {
        self.lang_sys_tag.get()
    }

    /// Offset to the language-system table, from the beginning of the
    /// script table.
    pub fn lang_sys_offset(&self) -> Offset16 {
        self.lang_sys_offset.get()
    }
}

impl FixedSize for LangSysRecord {
    const RAW_BYTE_LEN: usize = Tag::RAW_BYTE_LEN + Offset16::RAW_BYTE_LEN;
}

/// A [Script](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#script-table-and-language-system-record) table.
#[derive(Clone)]
pub struct Script<'a> {
    data: FontData<'a>,
    default_lang_sys_offset: Offset16,
    lang_sys_records: &'a [LangSysRecord],
}

impl<'a> FontRead<'a> for Script<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let default_lang_sys_offset = cursor.read()?;
        let lang_sys_count: u16 = cursor.read()?;
        let lang_sys_records = cursor.read_array(lang_sys_count as usize)?;
        Ok(Script {
            data,
            default_lang_sys_offset,
            lang_sys_records,
        })
    }
}

impl<'a> Script<'a> {
    /// The default language system for the script, if it names one.
    pub fn default_lang_sys(&self) -> Option<Result<LangSys<'a>, ReadError>> {
        self.default_lang_sys_offset.resolve_nullable(self.data)
    }

    /// The records for the language systems of the script, sorted by tag.
    pub fn lang_sys_records(&self) -> &'a [LangSysRecord] {
        self.lang_sys_records
    }

    /// Return the language system with the given tag, if present.
    pub fn lang_sys_for_tag(&self, tag: Tag) -> Option<Result<LangSys<'a>, ReadError>> {
        let record = self
            .lang_sys_records
            .iter()
            .find(|rec| rec.lang_sys_tag() == tag)?;
        Some(record.lang_sys_offset().resolve(self.data))
    }
}

/// A [Language System](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#language-system-table) table.
#[derive(Clone)]
pub struct LangSys<'a> {
    required_feature_index: u16,
    feature_indices: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for LangSys<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _lookup_order_offset: u16 = cursor.read()?;
        let required_feature_index = cursor.read()?;
        let feature_index_count: u16 = cursor.read()?;
        let feature_indices = cursor.read_array(feature_index_count as usize)?;
        Ok(LangSys {
            required_feature_index,
            feature_indices,
        })
    }
}

impl<'a> LangSys<'a> {
    /// Index of a feature required for this language system, or 0xFFFF if
    /// there is none.
    pub fn required_feature_index(&self) -> u16 {
        self.required_feature_index
    }

    /// The feature-list indices of the features of this language system, in
    /// arbitrary order.
    pub fn feature_indices(&self) -> &'a [BigEndian<u16>] {
        self.feature_indices
    }
}

/// A tag and the offset to the feature table it names.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct FeatureRecord {
    feature_tag: BigEndian<Tag>,
    feature_offset: BigEndian<Offset16>,
}

impl FeatureRecord {
    /// 4-byte feature tag identifier.
    pub fn feature_tag(&self) -> Tag {
        self.feature_tag.get()
    }

    /// Offset to the feature table, from the beginning of the feature list.
    pub fn feature_offset(&self) -> Offset16 {
        self.feature_offset.get()
    }
}

impl FixedSize for FeatureRecord {
    const RAW_BYTE_LEN: usize = Tag::RAW_BYTE_LEN + Offset16::RAW_BYTE_LEN;
}

/// The [Feature List](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#flTbl) table.
#[derive(Clone)]
pub struct FeatureList<'a> {
    data: FontData<'a>,
    feature_records: &'a [FeatureRecord],
}

impl<'a> FontRead<'a> for FeatureList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let feature_count: u16 = cursor.read()?;
        let feature_records = cursor.read_array(feature_count as usize)?;
        Ok(FeatureList {
            data,
            feature_records,
        })
    }
}

impl<'a> FeatureList<'a> {
    /// The records for the features in this table.
    pub fn feature_records(&self) -> &'a [FeatureRecord] {
        self.feature_records
    }

    /// The record at the given feature index.
    pub fn nth(&self, index: u16) -> Option<&'a FeatureRecord> {
        self.feature_records.get(index as usize)
    }

    /// Resolve a record's feature table.
    pub fn feature(&self, record: &FeatureRecord) -> Result<Feature<'a>, ReadError> {
        record.feature_offset().resolve(self.data)
    }
}

/// A [Feature](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-table) table.
#[derive(Clone)]
pub struct Feature<'a> {
    lookup_list_indices: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Feature<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _feature_params_offset: u16 = cursor.read()?;
        let lookup_index_count: u16 = cursor.read()?;
        let lookup_list_indices = cursor.read_array(lookup_index_count as usize)?;
        Ok(Feature {
            lookup_list_indices,
        })
    }
}

impl<'a> Feature<'a> {
    /// The lookup-list indices of the lookups this feature applies, in
    /// application order.
    pub fn lookup_list_indices(&self) -> &'a [BigEndian<u16>] {
        self.lookup_list_indices
    }
}

/// The [Lookup List](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lulTbl) table.
#[derive(Clone)]
pub struct LookupList<'a> {
    data: FontData<'a>,
    lookup_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for LookupList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_count: u16 = cursor.read()?;
        let lookup_offsets = cursor.read_array(lookup_count as usize)?;
        Ok(LookupList {
            data,
            lookup_offsets,
        })
    }
}

impl<'a> LookupList<'a> {
    /// The number of lookups in the list.
    pub fn lookup_count(&self) -> u16 {
        self.lookup_offsets.len() as u16
    }

    /// The lookup at the given index.
    pub fn lookup(&self, index: u16) -> Result<Lookup<'a>, ReadError> {
        let offset = self
            .lookup_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }
}

/// A [Lookup](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-table) table.
///
/// The lookup type is table specific (GSUB and GPOS number their types
/// independently), so the subtables are exposed as raw data for the caller
/// to interpret against the type.
#[derive(Clone)]
pub struct Lookup<'a> {
    data: FontData<'a>,
    lookup_type: u16,
    lookup_flag: LookupFlag,
    subtable_offsets: &'a [BigEndian<Offset16>],
    mark_filtering_set: Option<u16>,
}

impl<'a> FontRead<'a> for Lookup<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_type = cursor.read()?;
        let lookup_flag: LookupFlag = cursor.read()?;
        let subtable_count: u16 = cursor.read()?;
        let subtable_offsets = cursor.read_array(subtable_count as usize)?;
        let mark_filtering_set = if lookup_flag.contains(LookupFlag::USE_MARK_FILTERING_SET) {
            Some(cursor.read()?)
        } else {
            None
        };
        Ok(Lookup {
            data,
            lookup_type,
            lookup_flag,
            subtable_offsets,
            mark_filtering_set,
        })
    }
}

impl<'a> Lookup<'a> {
    /// The kind of lookup, numbered per table.
    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    /// The flags controlling which glyphs the lookup skips.
    pub fn lookup_flag(&self) -> LookupFlag {
        self.lookup_flag
    }

    /// Index into the GDEF mark glyph sets, when
    /// [`USE_MARK_FILTERING_SET`](LookupFlag::USE_MARK_FILTERING_SET) is set.
    pub fn mark_filtering_set(&self) -> Option<u16> {
        self.mark_filtering_set
    }

    /// The number of subtables.
    pub fn subtable_count(&self) -> u16 {
        self.subtable_offsets.len() as u16
    }

    /// The raw data of the subtable at the given index.
    pub fn subtable_data(&self, index: u16) -> Result<FontData<'a>, ReadError> {
        let offset = self
            .subtable_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }
}

/// A glyph range and the coverage index of its first glyph.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct RangeRecord {
    start_glyph_id: BigEndian<GlyphId16>,
    end_glyph_id: BigEndian<GlyphId16>,
    start_coverage_index: BigEndian<u16>,
}

impl RangeRecord {
    /// First glyph id in the range.
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    /// Last glyph id in the range, inclusive.
    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    /// Coverage index of the first glyph in the range.
    pub fn start_coverage_index(&self) -> u16 {
        self.start_coverage_index.get()
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        (self.start_glyph_id().to_u16()..=self.end_glyph_id().to_u16()).map(GlyphId16::new)
    }
}

impl FixedSize for RangeRecord {
    const RAW_BYTE_LEN: usize = 3 * u16::RAW_BYTE_LEN;
}

/// [Coverage Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-1): a sorted glyph list.
#[derive(Clone)]
pub struct CoverageFormat1<'a> {
    glyph_array: &'a [BigEndian<GlyphId16>],
}

impl<'a> FontRead<'a> for CoverageFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let glyph_count: u16 = cursor.read()?;
        let glyph_array = cursor.read_array(glyph_count as usize)?;
        Ok(CoverageFormat1 { glyph_array })
    }
}

impl<'a> CoverageFormat1<'a> {
    /// The coverage index of the glyph, if covered.
    pub fn get(&self, gid: GlyphId16) -> Option<u16> {
        self.glyph_array
            .binary_search_by(|probe| probe.get().cmp(&gid))
            .ok()
            .map(|idx| idx as u16)
    }
}

/// [Coverage Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-2): sorted glyph ranges.
#[derive(Clone)]
pub struct CoverageFormat2<'a> {
    range_records: &'a [RangeRecord],
}

impl<'a> FontRead<'a> for CoverageFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let range_count: u16 = cursor.read()?;
        let range_records = cursor.read_array(range_count as usize)?;
        Ok(CoverageFormat2 { range_records })
    }
}

impl<'a> CoverageFormat2<'a> {
    /// The coverage index of the glyph, if covered.
    pub fn get(&self, gid: GlyphId16) -> Option<u16> {
        self.range_records
            .binary_search_by(|rec| {
                if rec.end_glyph_id() < gid {
                    std::cmp::Ordering::Less
                } else if rec.start_glyph_id() > gid {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()
            .map(|idx| {
                let rec = &self.range_records[idx];
                let delta = gid.to_u16() - rec.start_glyph_id().to_u16();
                rec.start_coverage_index().wrapping_add(delta)
            })
    }
}

/// A [Coverage](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table) table.
#[derive(Clone)]
pub enum CoverageTable<'a> {
    Format1(CoverageFormat1<'a>),
    Format2(CoverageFormat2<'a>),
}

impl<'a> FontRead<'a> for CoverageTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => CoverageFormat1::read(data).map(Self::Format1),
            2 => CoverageFormat2::read(data).map(Self::Format2),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> CoverageTable<'a> {
    /// The coverage index of the glyph, or `None` if it is not covered.
    pub fn get(&self, gid: GlyphId16) -> Option<u16> {
        match self {
            CoverageTable::Format1(t) => t.get(gid),
            CoverageTable::Format2(t) => t.get(gid),
        }
    }

    /// An iterator over the covered glyphs, in coverage-index order.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        // all one expression so that we have a single return type
        let (iter1, iter2) = match self {
            CoverageTable::Format1(t) => (Some(t.glyph_array.iter().map(|g| g.get())), None),
            CoverageTable::Format2(t) => {
                let iter = t.range_records.iter().flat_map(RangeRecord::iter);
                (None, Some(iter))
            }
        };

        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }
}

/// A glyph range mapped to a class value.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct ClassRangeRecord {
    start_glyph_id: BigEndian<GlyphId16>,
    end_glyph_id: BigEndian<GlyphId16>,
    class: BigEndian<u16>,
}

impl ClassRangeRecord {
    /// First glyph id in the range.
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    /// Last glyph id in the range, inclusive.
    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    /// The class of every glyph in the range.
    pub fn class(&self) -> u16 {
        self.class.get()
    }
}

impl FixedSize for ClassRangeRecord {
    const RAW_BYTE_LEN: usize = 3 * u16::RAW_BYTE_LEN;
}

/// [Class Definition Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table-format-1): a class array for a glyph range.
#[derive(Clone)]
pub struct ClassDefFormat1<'a> {
    start_glyph_id: GlyphId16,
    class_value_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for ClassDefFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let start_glyph_id = cursor.read()?;
        let glyph_count: u16 = cursor.read()?;
        let class_value_array = cursor.read_array(glyph_count as usize)?;
        Ok(ClassDefFormat1 {
            start_glyph_id,
            class_value_array,
        })
    }
}

/// [Class Definition Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table-format-2): sorted class ranges.
#[derive(Clone)]
pub struct ClassDefFormat2<'a> {
    class_range_records: &'a [ClassRangeRecord],
}

impl<'a> FontRead<'a> for ClassDefFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let class_range_count: u16 = cursor.read()?;
        let class_range_records = cursor.read_array(class_range_count as usize)?;
        Ok(ClassDefFormat2 {
            class_range_records,
        })
    }
}

/// A [Class Definition](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table) table.
#[derive(Clone)]
pub enum ClassDef<'a> {
    Format1(ClassDefFormat1<'a>),
    Format2(ClassDefFormat2<'a>),
}

impl<'a> FontRead<'a> for ClassDef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => ClassDefFormat1::read(data).map(Self::Format1),
            2 => ClassDefFormat2::read(data).map(Self::Format2),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> ClassDef<'a> {
    /// The class of the glyph.
    ///
    /// A glyph not assigned a class value falls into class 0.
    pub fn get(&self, gid: GlyphId16) -> u16 {
        match self {
            ClassDef::Format1(t) => {
                let index = gid.to_u16().wrapping_sub(t.start_glyph_id.to_u16()) as usize;
                t.class_value_array
                    .get(index)
                    .map(|class| class.get())
                    .unwrap_or_default()
            }
            ClassDef::Format2(t) => t
                .class_range_records
                .binary_search_by(|rec| {
                    if rec.end_glyph_id() < gid {
                        std::cmp::Ordering::Less
                    } else if rec.start_glyph_id() > gid {
                        std::cmp::Ordering::Greater
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
                .ok()
                .map(|idx| t.class_range_records[idx].class())
                .unwrap_or_default(),
        }
    }
}

/// Part of a contextual rule: the lookup to apply at one input position.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct SequenceLookupRecord {
    sequence_index: BigEndian<u16>,
    lookup_list_index: BigEndian<u16>,
}

impl SequenceLookupRecord {
    /// Index of the input glyph sequence position to apply the lookup at.
    pub fn sequence_index(&self) -> u16 {
        self.sequence_index.get()
    }

    /// Index of the lookup to apply, into the table's lookup list.
    pub fn lookup_list_index(&self) -> u16 {
        self.lookup_list_index.get()
    }
}

impl FixedSize for SequenceLookupRecord {
    const RAW_BYTE_LEN: usize = 2 * u16::RAW_BYTE_LEN;
}

/// [Sequence Context Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#seqctxt1): rules keyed on glyph ids.
#[derive(Clone)]
pub struct SequenceContextFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    seq_rule_set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for SequenceContextFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let seq_rule_set_count: u16 = cursor.read()?;
        let seq_rule_set_offsets = cursor.read_array(seq_rule_set_count as usize)?;
        Ok(SequenceContextFormat1 {
            data,
            coverage_offset,
            seq_rule_set_offsets,
        })
    }
}

impl<'a> SequenceContextFormat1<'a> {
    /// Coverage of the first input glyph; the coverage index selects the
    /// rule set.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The rule set for the given coverage index, if present.
    pub fn seq_rule_set(
        &self,
        index: u16,
    ) -> Option<Result<SequenceRuleSet<'a>, ReadError>> {
        let offset = self.seq_rule_set_offsets.get(index as usize)?.get();
        offset.resolve_nullable(self.data)
    }
}

/// A collection of [`SequenceRule`]s for one initial glyph or class.
#[derive(Clone)]
pub struct SequenceRuleSet<'a> {
    data: FontData<'a>,
    seq_rule_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for SequenceRuleSet<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let seq_rule_count: u16 = cursor.read()?;
        let seq_rule_offsets = cursor.read_array(seq_rule_count as usize)?;
        Ok(SequenceRuleSet {
            data,
            seq_rule_offsets,
        })
    }
}

impl<'a> SequenceRuleSet<'a> {
    /// The number of rules in the set.
    pub fn rule_count(&self) -> u16 {
        self.seq_rule_offsets.len() as u16
    }

    /// The rule at the given index; rules are ordered by preference.
    pub fn rule(&self, index: u16) -> Result<SequenceRule<'a>, ReadError> {
        let offset = self
            .seq_rule_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }
}

/// A single context rule: an input sequence and the lookups to apply.
///
/// The values of the input sequence are glyph ids in format 1 tables and
/// class values in format 2 tables; the first input position is implied by
/// the coverage or class that selected the rule set.
#[derive(Clone)]
pub struct SequenceRule<'a> {
    input_sequence: &'a [BigEndian<u16>],
    seq_lookup_records: &'a [SequenceLookupRecord],
}

impl<'a> FontRead<'a> for SequenceRule<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let glyph_count: u16 = cursor.read()?;
        let seq_lookup_count: u16 = cursor.read()?;
        if glyph_count == 0 {
            return Err(ReadError::MalformedData("empty input sequence in rule"));
        }
        let input_sequence = cursor.read_array(glyph_count as usize - 1)?;
        let seq_lookup_records = cursor.read_array(seq_lookup_count as usize)?;
        Ok(SequenceRule {
            input_sequence,
            seq_lookup_records,
        })
    }
}

impl<'a> SequenceRule<'a> {
    /// The values matched at input positions `1..glyph_count`.
    pub fn input_sequence(&self) -> &'a [BigEndian<u16>] {
        self.input_sequence
    }

    /// The total number of input positions, including the first.
    pub fn glyph_count(&self) -> u16 {
        self.input_sequence.len() as u16 + 1
    }

    /// The lookups to apply on a match.
    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records
    }
}

/// [Sequence Context Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#seqctxt2): rules keyed on glyph classes.
#[derive(Clone)]
pub struct SequenceContextFormat2<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    class_def_offset: Offset16,
    class_seq_rule_set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for SequenceContextFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let class_def_offset = cursor.read()?;
        let class_seq_rule_set_count: u16 = cursor.read()?;
        let class_seq_rule_set_offsets = cursor.read_array(class_seq_rule_set_count as usize)?;
        Ok(SequenceContextFormat2 {
            data,
            coverage_offset,
            class_def_offset,
            class_seq_rule_set_offsets,
        })
    }
}

impl<'a> SequenceContextFormat2<'a> {
    /// Coverage of the first input glyph.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The class definition the input sequence values refer to.
    pub fn class_def(&self) -> Result<ClassDef<'a>, ReadError> {
        self.class_def_offset.resolve(self.data)
    }

    /// The rule set for the given class of the first input glyph.
    pub fn class_seq_rule_set(
        &self,
        class: u16,
    ) -> Option<Result<SequenceRuleSet<'a>, ReadError>> {
        let offset = self.class_seq_rule_set_offsets.get(class as usize)?.get();
        offset.resolve_nullable(self.data)
    }
}

/// [Sequence Context Format 3](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#seqctxt3): one rule with per-position coverage.
#[derive(Clone)]
pub struct SequenceContextFormat3<'a> {
    data: FontData<'a>,
    coverage_offsets: &'a [BigEndian<Offset16>],
    seq_lookup_records: &'a [SequenceLookupRecord],
}

impl<'a> FontRead<'a> for SequenceContextFormat3<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let glyph_count: u16 = cursor.read()?;
        let seq_lookup_count: u16 = cursor.read()?;
        let coverage_offsets = cursor.read_array(glyph_count as usize)?;
        let seq_lookup_records = cursor.read_array(seq_lookup_count as usize)?;
        Ok(SequenceContextFormat3 {
            data,
            coverage_offsets,
            seq_lookup_records,
        })
    }
}

impl<'a> SequenceContextFormat3<'a> {
    /// The number of input positions.
    pub fn glyph_count(&self) -> u16 {
        self.coverage_offsets.len() as u16
    }

    /// The coverage for the input position at `index`.
    pub fn coverage(&self, index: u16) -> Result<CoverageTable<'a>, ReadError> {
        let offset = self
            .coverage_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }

    /// The lookups to apply on a match.
    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records
    }
}

/// A [Sequence Context](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context) table.
#[derive(Clone)]
pub enum SequenceContext<'a> {
    Format1(SequenceContextFormat1<'a>),
    Format2(SequenceContextFormat2<'a>),
    Format3(SequenceContextFormat3<'a>),
}

impl<'a> FontRead<'a> for SequenceContext<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => SequenceContextFormat1::read(data).map(Self::Format1),
            2 => SequenceContextFormat2::read(data).map(Self::Format2),
            3 => SequenceContextFormat3::read(data).map(Self::Format3),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// [Chained Sequence Context Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#chseqctxt1): chained rules keyed on glyph ids.
#[derive(Clone)]
pub struct ChainedSequenceContextFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    chained_seq_rule_set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for ChainedSequenceContextFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let chained_seq_rule_set_count: u16 = cursor.read()?;
        let chained_seq_rule_set_offsets =
            cursor.read_array(chained_seq_rule_set_count as usize)?;
        Ok(ChainedSequenceContextFormat1 {
            data,
            coverage_offset,
            chained_seq_rule_set_offsets,
        })
    }
}

impl<'a> ChainedSequenceContextFormat1<'a> {
    /// Coverage of the first input glyph; the coverage index selects the
    /// rule set.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The rule set for the given coverage index, if present.
    pub fn chained_seq_rule_set(
        &self,
        index: u16,
    ) -> Option<Result<ChainedSequenceRuleSet<'a>, ReadError>> {
        let offset = self
            .chained_seq_rule_set_offsets
            .get(index as usize)?
            .get();
        offset.resolve_nullable(self.data)
    }
}

/// A collection of [`ChainedSequenceRule`]s for one initial glyph or class.
#[derive(Clone)]
pub struct ChainedSequenceRuleSet<'a> {
    data: FontData<'a>,
    chained_seq_rule_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for ChainedSequenceRuleSet<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let chained_seq_rule_count: u16 = cursor.read()?;
        let chained_seq_rule_offsets = cursor.read_array(chained_seq_rule_count as usize)?;
        Ok(ChainedSequenceRuleSet {
            data,
            chained_seq_rule_offsets,
        })
    }
}

impl<'a> ChainedSequenceRuleSet<'a> {
    /// The number of rules in the set.
    pub fn rule_count(&self) -> u16 {
        self.chained_seq_rule_offsets.len() as u16
    }

    /// The rule at the given index; rules are ordered by preference.
    pub fn rule(&self, index: u16) -> Result<ChainedSequenceRule<'a>, ReadError> {
        let offset = self
            .chained_seq_rule_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }
}

/// A single chained context rule: backtrack, input and lookahead sequences
/// plus the lookups to apply.
#[derive(Clone)]
pub struct ChainedSequenceRule<'a> {
    backtrack_sequence: &'a [BigEndian<u16>],
    input_sequence: &'a [BigEndian<u16>],
    lookahead_sequence: &'a [BigEndian<u16>],
    seq_lookup_records: &'a [SequenceLookupRecord],
}

impl<'a> FontRead<'a> for ChainedSequenceRule<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let backtrack_glyph_count: u16 = cursor.read()?;
        let backtrack_sequence = cursor.read_array(backtrack_glyph_count as usize)?;
        let input_glyph_count: u16 = cursor.read()?;
        if input_glyph_count == 0 {
            return Err(ReadError::MalformedData("empty input sequence in rule"));
        }
        let input_sequence = cursor.read_array(input_glyph_count as usize - 1)?;
        let lookahead_glyph_count: u16 = cursor.read()?;
        let lookahead_sequence = cursor.read_array(lookahead_glyph_count as usize)?;
        let seq_lookup_count: u16 = cursor.read()?;
        let seq_lookup_records = cursor.read_array(seq_lookup_count as usize)?;
        Ok(ChainedSequenceRule {
            backtrack_sequence,
            input_sequence,
            lookahead_sequence,
            seq_lookup_records,
        })
    }
}

impl<'a> ChainedSequenceRule<'a> {
    /// The values matched before the input sequence, closest first.
    pub fn backtrack_sequence(&self) -> &'a [BigEndian<u16>] {
        self.backtrack_sequence
    }

    /// The values matched at input positions `1..glyph_count`.
    pub fn input_sequence(&self) -> &'a [BigEndian<u16>] {
        self.input_sequence
    }

    /// The total number of input positions, including the first.
    pub fn glyph_count(&self) -> u16 {
        self.input_sequence.len() as u16 + 1
    }

    /// The values matched after the input sequence.
    pub fn lookahead_sequence(&self) -> &'a [BigEndian<u16>] {
        self.lookahead_sequence
    }

    /// The lookups to apply on a match.
    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records
    }
}

/// [Chained Sequence Context Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#chseqctxt2): chained rules keyed on glyph classes.
#[derive(Clone)]
pub struct ChainedSequenceContextFormat2<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    backtrack_class_def_offset: Offset16,
    input_class_def_offset: Offset16,
    lookahead_class_def_offset: Offset16,
    chained_class_seq_rule_set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for ChainedSequenceContextFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let backtrack_class_def_offset = cursor.read()?;
        let input_class_def_offset = cursor.read()?;
        let lookahead_class_def_offset = cursor.read()?;
        let chained_class_seq_rule_set_count: u16 = cursor.read()?;
        let chained_class_seq_rule_set_offsets =
            cursor.read_array(chained_class_seq_rule_set_count as usize)?;
        Ok(ChainedSequenceContextFormat2 {
            data,
            coverage_offset,
            backtrack_class_def_offset,
            input_class_def_offset,
            lookahead_class_def_offset,
            chained_class_seq_rule_set_offsets,
        })
    }
}

impl<'a> ChainedSequenceContextFormat2<'a> {
    /// Coverage of the first input glyph.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The class definition for backtrack sequence values.
    pub fn backtrack_class_def(&self) -> Result<ClassDef<'a>, ReadError> {
        self.backtrack_class_def_offset.resolve(self.data)
    }

    /// The class definition for input sequence values.
    pub fn input_class_def(&self) -> Result<ClassDef<'a>, ReadError> {
        self.input_class_def_offset.resolve(self.data)
    }

    /// The class definition for lookahead sequence values.
    pub fn lookahead_class_def(&self) -> Result<ClassDef<'a>, ReadError> {
        self.lookahead_class_def_offset.resolve(self.data)
    }

    /// The rule set for the given input class of the first input glyph.
    pub fn chained_class_seq_rule_set(
        &self,
        class: u16,
    ) -> Option<Result<ChainedSequenceRuleSet<'a>, ReadError>> {
        let offset = self
            .chained_class_seq_rule_set_offsets
            .get(class as usize)?
            .get();
        offset.resolve_nullable(self.data)
    }
}

/// [Chained Sequence Context Format 3](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#chseqctxt3): one chained rule with per-position coverage.
#[derive(Clone)]
pub struct ChainedSequenceContextFormat3<'a> {
    data: FontData<'a>,
    backtrack_coverage_offsets: &'a [BigEndian<Offset16>],
    input_coverage_offsets: &'a [BigEndian<Offset16>],
    lookahead_coverage_offsets: &'a [BigEndian<Offset16>],
    seq_lookup_records: &'a [SequenceLookupRecord],
}

impl<'a> FontRead<'a> for ChainedSequenceContextFormat3<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let backtrack_glyph_count: u16 = cursor.read()?;
        let backtrack_coverage_offsets = cursor.read_array(backtrack_glyph_count as usize)?;
        let input_glyph_count: u16 = cursor.read()?;
        let input_coverage_offsets = cursor.read_array(input_glyph_count as usize)?;
        let lookahead_glyph_count: u16 = cursor.read()?;
        let lookahead_coverage_offsets = cursor.read_array(lookahead_glyph_count as usize)?;
        let seq_lookup_count: u16 = cursor.read()?;
        let seq_lookup_records = cursor.read_array(seq_lookup_count as usize)?;
        Ok(ChainedSequenceContextFormat3 {
            data,
            backtrack_coverage_offsets,
            input_coverage_offsets,
            lookahead_coverage_offsets,
            seq_lookup_records,
        })
    }
}

impl<'a> ChainedSequenceContextFormat3<'a> {
    /// The number of backtrack positions.
    pub fn backtrack_glyph_count(&self) -> u16 {
        self.backtrack_coverage_offsets.len() as u16
    }

    /// The number of input positions.
    pub fn input_glyph_count(&self) -> u16 {
        self.input_coverage_offsets.len() as u16
    }

    /// The number of lookahead positions.
    pub fn lookahead_glyph_count(&self) -> u16 {
        self.lookahead_coverage_offsets.len() as u16
    }

    /// The coverage for the backtrack position at `index`, closest first.
    pub fn backtrack_coverage(&self, index: u16) -> Result<CoverageTable<'a>, ReadError> {
        let offset = self
            .backtrack_coverage_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }

    /// The coverage for the input position at `index`.
    pub fn input_coverage(&self, index: u16) -> Result<CoverageTable<'a>, ReadError> {
        let offset = self
            .input_coverage_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }

    /// The coverage for the lookahead position at `index`.
    pub fn lookahead_coverage(&self, index: u16) -> Result<CoverageTable<'a>, ReadError> {
        let offset = self
            .lookahead_coverage_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }

    /// The lookups to apply on a match.
    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        self.seq_lookup_records
    }
}

/// A [Chained Sequence Context](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context) table.
#[derive(Clone)]
pub enum ChainedSequenceContext<'a> {
    Format1(ChainedSequenceContextFormat1<'a>),
    Format2(ChainedSequenceContextFormat2<'a>),
    Format3(ChainedSequenceContextFormat3<'a>),
}

impl<'a> FontRead<'a> for ChainedSequenceContext<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => ChainedSequenceContextFormat1::read(data).map(Self::Format1),
            2 => ChainedSequenceContextFormat2::read(data).map(Self::Format2),
            3 => ChainedSequenceContextFormat3::read(data).map(Self::Format3),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_test_data::BeBuffer;

    #[test]
    fn coverage_format_1() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(3u16)
            .push(4u16)
            .push(9u16)
            .push(30u16);
        let coverage = CoverageTable::read(FontData::new(buf.data())).unwrap();
        assert_eq!(coverage.get(GlyphId16::new(4)), Some(0));
        assert_eq!(coverage.get(GlyphId16::new(9)), Some(1));
        assert_eq!(coverage.get(GlyphId16::new(30)), Some(2));
        assert_eq!(coverage.get(GlyphId16::new(5)), None);
        let glyphs: Vec<_> = coverage.iter().map(|g| g.to_u16()).collect();
        assert_eq!(glyphs, [4, 9, 30]);
    }

    #[test]
    fn coverage_format_2() {
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            // range 10..=13, start coverage index 0
            .push(10u16)
            .push(13u16)
            .push(0u16)
            // range 20..=21, start coverage index 4
            .push(20u16)
            .push(21u16)
            .push(4u16);
        let coverage = CoverageTable::read(FontData::new(buf.data())).unwrap();
        assert_eq!(coverage.get(GlyphId16::new(10)), Some(0));
        assert_eq!(coverage.get(GlyphId16::new(12)), Some(2));
        assert_eq!(coverage.get(GlyphId16::new(21)), Some(5));
        assert_eq!(coverage.get(GlyphId16::new(14)), None);
        assert_eq!(coverage.get(GlyphId16::new(9)), None);
    }

    #[test]
    fn class_def_format_1() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(10u16) // start glyph
            .push(3u16)
            .push(7u16)
            .push(0u16)
            .push(2u16);
        let class_def = ClassDef::read(FontData::new(buf.data())).unwrap();
        assert_eq!(class_def.get(GlyphId16::new(10)), 7);
        assert_eq!(class_def.get(GlyphId16::new(11)), 0);
        assert_eq!(class_def.get(GlyphId16::new(12)), 2);
        // outside any defined range falls into class 0
        assert_eq!(class_def.get(GlyphId16::new(9)), 0);
        assert_eq!(class_def.get(GlyphId16::new(13)), 0);
    }

    #[test]
    fn class_def_format_2() {
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .push(5u16)
            .push(9u16)
            .push(1u16)
            .push(20u16)
            .push(20u16)
            .push(3u16);
        let class_def = ClassDef::read(FontData::new(buf.data())).unwrap();
        assert_eq!(class_def.get(GlyphId16::new(7)), 1);
        assert_eq!(class_def.get(GlyphId16::new(20)), 3);
        assert_eq!(class_def.get(GlyphId16::new(10)), 0);
    }

    #[test]
    fn sequence_context_format_1() {
        let buf = BeBuffer::new()
            .push(1u16) // format
            .push(22u16) // coverage offset
            .push(1u16) // rule set count
            .push(8u16) // rule set offset
            // rule set at 8
            .push(1u16)
            .push(4u16)
            // rule at 12: two input glyphs, one lookup record
            .push(2u16)
            .push(1u16)
            .push(30u16) // second input glyph
            .push(0u16) // sequence index
            .push(5u16) // lookup list index
            // coverage at 22
            .push(1u16)
            .push(1u16)
            .push(20u16);
        let context = SequenceContext::read(FontData::new(buf.data())).unwrap();
        let SequenceContext::Format1(table) = context else {
            panic!("expected format 1");
        };
        assert_eq!(table.coverage().unwrap().get(GlyphId16::new(20)), Some(0));
        let rule_set = table.seq_rule_set(0).unwrap().unwrap();
        assert_eq!(rule_set.rule_count(), 1);
        let rule = rule_set.rule(0).unwrap();
        assert_eq!(rule.glyph_count(), 2);
        assert_eq!(rule.input_sequence()[0].get(), 30);
        assert_eq!(rule.seq_lookup_records()[0].sequence_index(), 0);
        assert_eq!(rule.seq_lookup_records()[0].lookup_list_index(), 5);
    }

    #[test]
    fn chained_sequence_rule() {
        let buf = BeBuffer::new()
            .push(1u16) // backtrack count
            .push(9u16)
            .push(2u16) // input count
            .push(8u16) // second input value
            .push(1u16) // lookahead count
            .push(7u16)
            .push(1u16) // lookup record count
            .push(1u16)
            .push(3u16);
        let rule = ChainedSequenceRule::read(FontData::new(buf.data())).unwrap();
        assert_eq!(rule.backtrack_sequence()[0].get(), 9);
        assert_eq!(rule.glyph_count(), 2);
        assert_eq!(rule.lookahead_sequence()[0].get(), 7);
        assert_eq!(rule.seq_lookup_records()[0].lookup_list_index(), 3);
    }

    #[test]
    fn lookup_with_mark_filtering_set() {
        let buf = BeBuffer::new()
            .push(6u16) // lookup type
            .push(0x0010u16) // UseMarkFilteringSet
            .push(1u16) // subtable count
            .push(10u16) // subtable offset
            .push(2u16) // mark filtering set
            .push(1u16); // "subtable" data at offset 10
        let lookup = Lookup::read(FontData::new(buf.data())).unwrap();
        assert_eq!(lookup.lookup_type(), 6);
        assert_eq!(lookup.mark_filtering_set(), Some(2));
        assert_eq!(lookup.subtable_count(), 1);
        assert_eq!(lookup.subtable_data(0).unwrap().read_at::<u16>(0), Ok(1));
    }
}
