//! The caller-supplied font abstraction.

use raw::tables::gdef::Gdef;
use raw::tables::layout::LayoutHeader;
use raw::tables::{gdef, gpos, gsub};
use raw::types::{GlyphId16, Tag};
use raw::{FontData, FontRead};

/// The metrics layout an advance is queried for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontLayout {
    Horizontal,
    Vertical,
}

/// The operations the engine needs from a font.
///
/// The engine does not parse font files; the caller supplies raw table
/// bytes, the nominal code-point to glyph mapping, and glyph advances
/// through this trait.
pub trait FontSource {
    /// The raw bytes of the table with the given tag, if the font has it.
    fn table_data(&self, tag: Tag) -> Option<&[u8]>;

    /// The nominal glyph for a code point; `.notdef` (glyph 0) when
    /// unmapped.
    fn glyph_for_codepoint(&self, codepoint: u32) -> GlyphId16;

    /// The advance of a glyph, in design units.
    fn glyph_advance(&self, layout: FontLayout, glyph: GlyphId16) -> i32;
}

/// A font prepared for shaping.
///
/// Construction loads the three layout tables through the source; the blobs
/// are referenced for the lifetime of the font, and all table parsing views
/// borrow from them. A `Font` is a small copyable handle.
#[derive(Clone, Copy)]
pub struct Font<'a> {
    source: &'a dyn FontSource,
    gdef: Option<&'a [u8]>,
    gsub: Option<&'a [u8]>,
    gpos: Option<&'a [u8]>,
}

impl<'a> Font<'a> {
    /// Prepare a font, caching its `GDEF`, `GSUB` and `GPOS` tables.
    pub fn new(source: &'a dyn FontSource) -> Self {
        Font {
            source,
            gdef: source.table_data(gdef::TAG),
            gsub: source.table_data(gsub::TAG),
            gpos: source.table_data(gpos::TAG),
        }
    }

    /// The parsed `GDEF` table, if present and readable.
    pub(crate) fn gdef(&self) -> Option<Gdef<'a>> {
        self.gdef
            .and_then(|data| Gdef::read(FontData::new(data)).ok())
    }

    /// The parsed `GSUB` header, if present and readable.
    pub(crate) fn gsub(&self) -> Option<LayoutHeader<'a>> {
        self.gsub
            .and_then(|data| LayoutHeader::read(FontData::new(data)).ok())
    }

    /// The parsed `GPOS` header, if present and readable.
    pub(crate) fn gpos(&self) -> Option<LayoutHeader<'a>> {
        self.gpos
            .and_then(|data| LayoutHeader::read(FontData::new(data)).ok())
    }

    /// The nominal glyph for a code point.
    pub fn glyph_for_codepoint(&self, codepoint: u32) -> GlyphId16 {
        self.source.glyph_for_codepoint(codepoint)
    }

    /// The advance of a glyph, in design units.
    pub fn glyph_advance(&self, layout: FontLayout, glyph: GlyphId16) -> i32 {
        self.source.glyph_advance(layout, glyph)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct EmptyFontSource;

    impl FontSource for EmptyFontSource {
        fn table_data(&self, _tag: Tag) -> Option<&[u8]> {
            None
        }

        fn glyph_for_codepoint(&self, _codepoint: u32) -> GlyphId16 {
            GlyphId16::NOTDEF
        }

        fn glyph_advance(&self, _layout: FontLayout, _glyph: GlyphId16) -> i32 {
            0
        }
    }

    pub(crate) fn empty_font_source() -> EmptyFontSource {
        EmptyFontSource
    }

    #[test]
    fn tables_absent() {
        let source = empty_font_source();
        let font = Font::new(&source);
        assert!(font.gdef().is_none());
        assert!(font.gsub().is_none());
        assert!(font.gpos().is_none());
    }
}
