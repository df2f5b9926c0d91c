//! The [GSUB](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub) table.

use types::{BigEndian, GlyphId16, Offset16, Offset32, Tag};

pub use super::layout::{
    ChainedSequenceContext, CoverageTable, FeatureList, LayoutHeader, Lookup, LookupList,
    ScriptList, SequenceContext,
};
use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// 'GSUB'
pub const TAG: Tag = Tag::new(b"GSUB");

/// The substitution lookup types.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#table-organization>
pub mod lookup_type {
    pub const SINGLE: u16 = 1;
    pub const MULTIPLE: u16 = 2;
    pub const ALTERNATE: u16 = 3;
    pub const LIGATURE: u16 = 4;
    pub const CONTEXTUAL: u16 = 5;
    pub const CHAINED_CONTEXTUAL: u16 = 6;
    pub const EXTENSION: u16 = 7;
    pub const REVERSE_CHAINED_CONTEXTUAL: u16 = 8;
}

/// [Single Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#11-single-substitution-format-1): substitution by delta.
#[derive(Clone)]
pub struct SingleSubstFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    delta_glyph_id: i16,
}

impl<'a> FontRead<'a> for SingleSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let delta_glyph_id = cursor.read()?;
        Ok(SingleSubstFormat1 {
            data,
            coverage_offset,
            delta_glyph_id,
        })
    }
}

impl<'a> SingleSubstFormat1<'a> {
    /// Coverage of the glyphs this subtable substitutes.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// Value added (modulo 65536) to the input glyph id.
    pub fn delta_glyph_id(&self) -> i16 {
        self.delta_glyph_id
    }
}

/// [Single Substitution Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#12-single-substitution-format-2): substitution by array.
#[derive(Clone)]
pub struct SingleSubstFormat2<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    substitute_glyph_ids: &'a [BigEndian<GlyphId16>],
}

impl<'a> FontRead<'a> for SingleSubstFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let glyph_count: u16 = cursor.read()?;
        let substitute_glyph_ids = cursor.read_array(glyph_count as usize)?;
        Ok(SingleSubstFormat2 {
            data,
            coverage_offset,
            substitute_glyph_ids,
        })
    }
}

impl<'a> SingleSubstFormat2<'a> {
    /// Coverage of the glyphs this subtable substitutes.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// Substitute glyphs, indexed by coverage index.
    pub fn substitute_glyph_ids(&self) -> &'a [BigEndian<GlyphId16>] {
        self.substitute_glyph_ids
    }
}

/// A [Single Substitution](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#lookuptype-1-single-substitution-subtable) subtable.
#[derive(Clone)]
pub enum SingleSubst<'a> {
    Format1(SingleSubstFormat1<'a>),
    Format2(SingleSubstFormat2<'a>),
}

impl<'a> FontRead<'a> for SingleSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            1 => SingleSubstFormat1::read(data).map(Self::Format1),
            2 => SingleSubstFormat2::read(data).map(Self::Format2),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// [Multiple Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#21-multiple-substitution-format-1): one glyph to several.
#[derive(Clone)]
pub struct MultipleSubstFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    sequence_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for MultipleSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let sequence_count: u16 = cursor.read()?;
        let sequence_offsets = cursor.read_array(sequence_count as usize)?;
        Ok(MultipleSubstFormat1 {
            data,
            coverage_offset,
            sequence_offsets,
        })
    }
}

impl<'a> MultipleSubstFormat1<'a> {
    /// Coverage of the glyphs this subtable substitutes.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The replacement sequence for the given coverage index.
    pub fn sequence(&self, index: u16) -> Result<Sequence<'a>, ReadError> {
        let offset = self
            .sequence_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }
}

/// The replacement glyphs of one multiple substitution.
#[derive(Clone)]
pub struct Sequence<'a> {
    substitute_glyph_ids: &'a [BigEndian<GlyphId16>],
}

impl<'a> FontRead<'a> for Sequence<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let glyph_count: u16 = cursor.read()?;
        let substitute_glyph_ids = cursor.read_array(glyph_count as usize)?;
        Ok(Sequence {
            substitute_glyph_ids,
        })
    }
}

impl<'a> Sequence<'a> {
    /// The glyphs to substitute for the input glyph, in order.
    pub fn substitute_glyph_ids(&self) -> &'a [BigEndian<GlyphId16>] {
        self.substitute_glyph_ids
    }
}

/// [Alternate Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#31-alternate-substitution-format-1).
#[derive(Clone)]
pub struct AlternateSubstFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    alternate_set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for AlternateSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let alternate_set_count: u16 = cursor.read()?;
        let alternate_set_offsets = cursor.read_array(alternate_set_count as usize)?;
        Ok(AlternateSubstFormat1 {
            data,
            coverage_offset,
            alternate_set_offsets,
        })
    }
}

impl<'a> AlternateSubstFormat1<'a> {
    /// Coverage of the glyphs this subtable substitutes.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The alternates for the given coverage index.
    pub fn alternate_set(&self, index: u16) -> Result<AlternateSet<'a>, ReadError> {
        let offset = self
            .alternate_set_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }
}

/// The alternate glyphs for one covered glyph.
#[derive(Clone)]
pub struct AlternateSet<'a> {
    alternate_glyph_ids: &'a [BigEndian<GlyphId16>],
}

impl<'a> FontRead<'a> for AlternateSet<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let glyph_count: u16 = cursor.read()?;
        let alternate_glyph_ids = cursor.read_array(glyph_count as usize)?;
        Ok(AlternateSet {
            alternate_glyph_ids,
        })
    }
}

impl<'a> AlternateSet<'a> {
    /// The alternate glyphs, in designer-preferred order.
    pub fn alternate_glyph_ids(&self) -> &'a [BigEndian<GlyphId16>] {
        self.alternate_glyph_ids
    }
}

/// [Ligature Substitution Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#41-ligature-substitution-format-1): several glyphs to one.
#[derive(Clone)]
pub struct LigatureSubstFormat1<'a> {
    data: FontData<'a>,
    coverage_offset: Offset16,
    ligature_set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for LigatureSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let coverage_offset = cursor.read()?;
        let ligature_set_count: u16 = cursor.read()?;
        let ligature_set_offsets = cursor.read_array(ligature_set_count as usize)?;
        Ok(LigatureSubstFormat1 {
            data,
            coverage_offset,
            ligature_set_offsets,
        })
    }
}

impl<'a> LigatureSubstFormat1<'a> {
    /// Coverage of the first (leading) glyph of every ligature.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.coverage_offset.resolve(self.data)
    }

    /// The ligatures led by the glyph with the given coverage index.
    pub fn ligature_set(&self, index: u16) -> Result<LigatureSet<'a>, ReadError> {
        let offset = self
            .ligature_set_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }
}

/// All ligatures beginning with one covered glyph, in preference order.
#[derive(Clone)]
pub struct LigatureSet<'a> {
    data: FontData<'a>,
    ligature_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for LigatureSet<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let ligature_count: u16 = cursor.read()?;
        let ligature_offsets = cursor.read_array(ligature_count as usize)?;
        Ok(LigatureSet {
            data,
            ligature_offsets,
        })
    }
}

impl<'a> LigatureSet<'a> {
    /// The number of ligatures in the set.
    pub fn ligature_count(&self) -> u16 {
        self.ligature_offsets.len() as u16
    }

    /// The ligature at the given index.
    pub fn ligature(&self, index: u16) -> Result<Ligature<'a>, ReadError> {
        let offset = self
            .ligature_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        offset.resolve(self.data)
    }
}

/// One ligature: the glyph produced and the trailing components matched.
#[derive(Clone)]
pub struct Ligature<'a> {
    ligature_glyph: GlyphId16,
    component_glyph_ids: &'a [BigEndian<GlyphId16>],
}

impl<'a> FontRead<'a> for Ligature<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let ligature_glyph = cursor.read()?;
        let component_count: u16 = cursor.read()?;
        if component_count == 0 {
            return Err(ReadError::MalformedData("ligature with no components"));
        }
        let component_glyph_ids = cursor.read_array(component_count as usize - 1)?;
        Ok(Ligature {
            ligature_glyph,
            component_glyph_ids,
        })
    }
}

impl<'a> Ligature<'a> {
    /// The glyph substituted for the matched components.
    pub fn ligature_glyph(&self) -> GlyphId16 {
        self.ligature_glyph
    }

    /// The total number of components, including the leading glyph.
    pub fn component_count(&self) -> u16 {
        self.component_glyph_ids.len() as u16 + 1
    }

    /// The components after the leading glyph, in sequence order.
    pub fn component_glyph_ids(&self) -> &'a [BigEndian<GlyphId16>] {
        self.component_glyph_ids
    }
}

/// An [Extension Substitution](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#71-extension-substitution-format-1) subtable.
#[derive(Clone)]
pub struct ExtensionSubstFormat1<'a> {
    data: FontData<'a>,
    extension_lookup_type: u16,
    extension_offset: Offset32,
}

impl<'a> FontRead<'a> for ExtensionSubstFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let extension_lookup_type = cursor.read()?;
        let extension_offset = cursor.read()?;
        Ok(ExtensionSubstFormat1 {
            data,
            extension_lookup_type,
            extension_offset,
        })
    }
}

impl<'a> ExtensionSubstFormat1<'a> {
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
    fn single_subst_format_1() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(6u16) // coverage offset
            .push(-3i16) // delta
            // coverage format 1
            .push(1u16)
            .push(1u16)
            .push(8u16);
        let subst = SingleSubst::read(FontData::new(buf.data())).unwrap();
        let SingleSubst::Format1(subst) = subst else {
            panic!("expected format 1");
        };
        assert_eq!(subst.delta_glyph_id(), -3);
        assert_eq!(subst.coverage().unwrap().get(GlyphId16::new(8)), Some(0));
    }

    #[test]
    fn ligature_components() {
        // LigatureSet with one ligature "f + i -> fi"
        let buf = BeBuffer::new()
            .push(1u16) // ligature count
            .push(4u16) // ligature offset
            .push(100u16) // ligature glyph
            .push(2u16) // component count
            .push(20u16); // second component
        let set = LigatureSet::read(FontData::new(buf.data())).unwrap();
        assert_eq!(set.ligature_count(), 1);
        let ligature = set.ligature(0).unwrap();
        assert_eq!(ligature.ligature_glyph(), GlyphId16::new(100));
        assert_eq!(ligature.component_count(), 2);
        assert_eq!(ligature.component_glyph_ids()[0].get(), GlyphId16::new(20));
    }
}
