//! The [GDEF](https://learn.microsoft.com/en-us/typography/opentype/spec/gdef) table.

use types::{BigEndian, Offset16, Offset32, Tag};

use super::layout::{ClassDef, CoverageTable};
use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// 'GDEF'
pub const TAG: Tag = Tag::new(b"GDEF");

/// Glyph classes defined in the GDEF glyph class definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum GlyphClassDef {
    Base = 1,
    Ligature = 2,
    Mark = 3,
    Component = 4,
}

impl GlyphClassDef {
    /// Map a raw class value to a known glyph class.
    pub fn new(raw: u16) -> Option<Self> {
        match raw {
            1 => Some(Self::Base),
            2 => Some(Self::Ligature),
            3 => Some(Self::Mark),
            4 => Some(Self::Component),
            _ => None,
        }
    }
}

/// The [GDEF](https://learn.microsoft.com/en-us/typography/opentype/spec/gdef#gdef-header) header.
///
/// Versions 1.0 through 1.3 share the four leading offsets; the mark glyph
/// sets offset is present from 1.2. The item variation store of 1.3 is not
/// interpreted here.
#[derive(Clone)]
pub struct Gdef<'a> {
    data: FontData<'a>,
    glyph_class_def_offset: Offset16,
    mark_attach_class_def_offset: Offset16,
    mark_glyph_sets_def_offset: Option<Offset16>,
}

impl<'a> FontRead<'a> for Gdef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version: u16 = cursor.read()?;
        let minor_version: u16 = cursor.read()?;
        if major_version != 1 {
            return Err(ReadError::InvalidFormat(major_version.into()));
        }
        let glyph_class_def_offset = cursor.read()?;
        let _attach_list_offset: Offset16 = cursor.read()?;
        let _lig_caret_list_offset: Offset16 = cursor.read()?;
        let mark_attach_class_def_offset = cursor.read()?;
        let mark_glyph_sets_def_offset = if minor_version >= 2 {
            Some(cursor.read()?)
        } else {
            None
        };
        Ok(Gdef {
            data,
            glyph_class_def_offset,
            mark_attach_class_def_offset,
            mark_glyph_sets_def_offset,
        })
    }
}

impl<'a> Gdef<'a> {
    /// The class definition assigning glyphs to the base/ligature/mark/
    /// component classes, if present.
    pub fn glyph_class_def(&self) -> Option<Result<ClassDef<'a>, ReadError>> {
        self.glyph_class_def_offset.resolve_nullable(self.data)
    }

    /// The class definition for mark attachment filtering, if present.
    pub fn mark_attach_class_def(&self) -> Option<Result<ClassDef<'a>, ReadError>> {
        self.mark_attach_class_def_offset.resolve_nullable(self.data)
    }

    /// The mark glyph sets referenced by lookups using mark filtering, if
    /// present.
    pub fn mark_glyph_sets(&self) -> Option<Result<MarkGlyphSets<'a>, ReadError>> {
        self.mark_glyph_sets_def_offset?.resolve_nullable(self.data)
    }
}

/// The [Mark Glyph Sets](https://learn.microsoft.com/en-us/typography/opentype/spec/gdef#mark-glyph-sets-table) table.
#[derive(Clone)]
pub struct MarkGlyphSets<'a> {
    data: FontData<'a>,
    coverage_offsets: &'a [BigEndian<Offset32>],
}

impl<'a> FontRead<'a> for MarkGlyphSets<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let mark_glyph_set_count: u16 = cursor.read()?;
        let coverage_offsets = cursor.read_array(mark_glyph_set_count as usize)?;
        Ok(MarkGlyphSets {
            data,
            coverage_offsets,
        })
    }
}

impl<'a> MarkGlyphSets<'a> {
    /// The coverage of the mark glyph set at the given index.
    pub fn coverage(&self, index: u16) -> Option<Result<CoverageTable<'a>, ReadError>> {
        let offset = self.coverage_offsets.get(index as usize)?.get();
        Some(offset.resolve(self.data))
    }
}
