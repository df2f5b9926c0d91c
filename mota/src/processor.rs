//! The text processor: orchestrating one shaping run.

use raw::tables::gdef::GlyphClassDef;
use raw::tables::layout::{ClassDef, LayoutHeader};
use raw::types::GlyphId16;

use crate::album::{Album, GlyphTraits};
use crate::artist::{TextDirection, TextMode};
use crate::codepoints::{Codepoints, EncodedText};
use crate::font::FontLayout;
use crate::locator::Locator;
use crate::pattern::{FeatureKind, Pattern};

/// Drives one shaping run: discover glyphs, substitute, position, resolve
/// attachments, and build the code-unit map.
///
/// The GSUB and GPOS executors and the context matcher are implemented in
/// their own modules as further `impl` blocks on this type.
pub(crate) struct TextProcessor<'a, 'b> {
    pub(crate) pattern: &'b Pattern<'a>,
    pub(crate) album: &'b mut Album,
    text: EncodedText<'b>,
    pub(crate) text_direction: TextDirection,
    text_mode: TextMode,
    glyph_class_def: Option<ClassDef<'a>>,
    pub(crate) locator: Locator<'a>,
    pub(crate) feature_kind: FeatureKind,
}

impl<'a, 'b> TextProcessor<'a, 'b> {
    pub fn new(
        pattern: &'b Pattern<'a>,
        album: &'b mut Album,
        text: EncodedText<'b>,
        text_direction: TextDirection,
        text_mode: TextMode,
    ) -> Self {
        let gdef = pattern.font.gdef();
        let glyph_class_def = gdef
            .as_ref()
            .and_then(|gdef| gdef.glyph_class_def())
            .and_then(Result::ok);
        let locator = Locator::new(gdef.as_ref());

        TextProcessor {
            pattern,
            album,
            text,
            text_direction,
            text_mode,
            glyph_class_def,
            locator,
            feature_kind: FeatureKind::Substitution,
        }
    }

    pub fn text(&self) -> EncodedText<'b> {
        self.text
    }

    pub fn album_mut(&mut self) -> &mut Album {
        self.album
    }

    /// The traits implied by the font's glyph class for `glyph`.
    pub(crate) fn traits_for_glyph(&self, glyph: GlyphId16) -> GlyphTraits {
        let Some(class_def) = &self.glyph_class_def else {
            return GlyphTraits::NONE;
        };
        match GlyphClassDef::new(class_def.get(glyph)) {
            Some(GlyphClassDef::Base) => GlyphTraits::BASE,
            Some(GlyphClassDef::Ligature) => GlyphTraits::LIGATURE,
            Some(GlyphClassDef::Mark) => GlyphTraits::MARK,
            Some(GlyphClassDef::Component) => GlyphTraits::COMPONENT,
            None => GlyphTraits::NONE,
        }
    }

    /// Map every code point to its nominal glyph, in the order implied by
    /// the text mode.
    pub fn discover_glyphs(&mut self) {
        self.album.begin_filling();
        let backward = self.text_mode == TextMode::Backward;
        for (association, codepoint) in Codepoints::new(self.text, backward) {
            let glyph = self.pattern.font.glyph_for_codepoint(codepoint);
            let traits = self.traits_for_glyph(glyph);
            self.album.add_glyph(glyph, traits, association);
        }
    }

    /// Run the substitution half of the pipeline.
    pub fn substitute_glyphs(&mut self) {
        self.apply_feature_range(0, self.pattern.gsub_unit_count, FeatureKind::Substitution);
        self.album.end_filling();
    }

    /// Run the positioning half of the pipeline and resolve attachments.
    pub fn position_glyphs(&mut self) {
        self.album.begin_arranging();

        for index in 0..self.album.glyph_count() {
            // consumed ligature components occupy their slot but take no
            // space
            let advance = if self.album.traits(index).contains(GlyphTraits::PLACEHOLDER) {
                0
            } else {
                let glyph = self.album.glyph(index);
                self.pattern.font.glyph_advance(FontLayout::Horizontal, glyph)
            };
            self.album.set_advance(index, advance);
        }

        self.apply_feature_range(
            self.pattern.gsub_unit_count,
            self.pattern.gpos_unit_count,
            FeatureKind::Positioning,
        );
        self.resolve_attachments();

        self.album.end_arranging();
    }

    /// Build the code-unit to glyph map.
    pub fn wrap_up(&mut self) {
        self.album.wrap_up();
    }

    fn apply_feature_range(&mut self, start: usize, count: usize, kind: FeatureKind) {
        self.feature_kind = kind;

        for unit_index in start..start + count {
            let unit = &self.pattern.feature_units[unit_index];
            let feature_mask = unit.feature_mask;
            let lookup_indices = unit.lookup_indices.clone();

            for lookup_index in lookup_indices {
                let glyph_count = self.album.glyph_count();
                self.locator.reset(self.album, 0, glyph_count);
                self.locator.set_feature_mask(feature_mask);
                self.apply_lookup(lookup_index);
            }
        }
    }

    fn layout_header(&self) -> Option<LayoutHeader<'a>> {
        match self.feature_kind {
            FeatureKind::Substitution => self.pattern.font.gsub(),
            FeatureKind::Positioning => self.pattern.font.gpos(),
        }
    }

    /// Apply one lookup over the locator's current window.
    ///
    /// Also the entry point for lookups nested in contextual rules, which
    /// install a restricted locator first.
    pub(crate) fn apply_lookup(&mut self, lookup_index: u16) {
        let Some(header) = self.layout_header() else {
            return;
        };
        let Ok(lookup_list) = header.lookup_list() else {
            return;
        };
        let Ok(lookup) = lookup_list.lookup(lookup_index) else {
            return;
        };

        self.locator.set_lookup_flag(lookup.lookup_flag());
        self.locator.set_mark_filtering_set(lookup.mark_filtering_set());

        while self.locator.move_next(self.album).is_some() {
            // apply subtables in order until one of them takes effect
            for subtable_index in 0..lookup.subtable_count() {
                let Ok(subtable) = lookup.subtable_data(subtable_index) else {
                    continue;
                };
                let applied = match self.feature_kind {
                    FeatureKind::Substitution => {
                        self.apply_substitution_subtable(lookup.lookup_type(), subtable)
                    }
                    FeatureKind::Positioning => {
                        self.apply_positioning_subtable(lookup.lookup_type(), subtable)
                    }
                };
                if applied {
                    break;
                }
            }
        }
    }
}
