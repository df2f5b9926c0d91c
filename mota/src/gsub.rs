//! Applying GSUB subtables to the album.

use raw::tables::gsub::{
    lookup_type, AlternateSubstFormat1, ExtensionSubstFormat1, LigatureSubstFormat1,
    MultipleSubstFormat1, SingleSubst,
};
use raw::types::GlyphId16;
use raw::{FontData, FontRead};

use crate::album::GlyphTraits;
use crate::processor::TextProcessor;

impl<'a, 'b> TextProcessor<'a, 'b> {
    /// Apply one substitution subtable at the locator's current position.
    ///
    /// Returns `true` if a substitution took place; unrecognized kinds and
    /// formats report `false` so processing continues.
    pub(crate) fn apply_substitution_subtable(
        &mut self,
        lookup_type: u16,
        subtable: FontData<'a>,
    ) -> bool {
        match lookup_type {
            lookup_type::SINGLE => self.apply_single_subst(subtable),
            lookup_type::MULTIPLE => self.apply_multiple_subst(subtable),
            lookup_type::ALTERNATE => self.apply_alternate_subst(subtable),
            lookup_type::LIGATURE => self.apply_ligature_subst(subtable),
            lookup_type::CONTEXTUAL => self.apply_context_subtable(subtable),
            lookup_type::CHAINED_CONTEXTUAL => self.apply_chained_context_subtable(subtable),
            lookup_type::EXTENSION => self.apply_extension_subst(subtable),
            // reverse chaining substitution is recognized but not applied
            _ => false,
        }
    }

    /// Replace the current glyph, refreshing its traits from the glyph
    /// class of the substitute.
    fn set_substitute(&mut self, index: usize, substitute: GlyphId16) {
        let traits = self.traits_for_glyph(substitute);
        self.album.set_glyph(index, substitute);
        self.album.set_traits(index, traits);
    }

    fn apply_single_subst(&mut self, subtable: FontData<'a>) -> bool {
        let input_index = self.locator.index();
        let input_glyph = self.album.glyph(input_index);
        let Ok(subst) = SingleSubst::read(subtable) else {
            return false;
        };

        match subst {
            SingleSubst::Format1(subst) => {
                let Some(_) = subst.coverage().ok().and_then(|cov| cov.get(input_glyph)) else {
                    return false;
                };
                let substitute = GlyphId16::new(
                    input_glyph.to_u16().wrapping_add(subst.delta_glyph_id() as u16),
                );
                self.set_substitute(input_index, substitute);
                true
            }
            SingleSubst::Format2(subst) => {
                let Some(coverage_index) =
                    subst.coverage().ok().and_then(|cov| cov.get(input_glyph))
                else {
                    return false;
                };
                let Some(substitute) = subst
                    .substitute_glyph_ids()
                    .get(coverage_index as usize)
                    .map(|glyph| glyph.get())
                else {
                    return false;
                };
                self.set_substitute(input_index, substitute);
                true
            }
        }
    }

    fn apply_multiple_subst(&mut self, subtable: FontData<'a>) -> bool {
        let input_index = self.locator.index();
        let input_glyph = self.album.glyph(input_index);
        let Ok(subst) = MultipleSubstFormat1::read(subtable) else {
            return false;
        };
        let Some(coverage_index) = subst.coverage().ok().and_then(|cov| cov.get(input_glyph))
        else {
            return false;
        };
        let Ok(sequence) = subst.sequence(coverage_index) else {
            return false;
        };

        let substitutes = sequence.substitute_glyph_ids();
        let glyph_count = substitutes.len();
        if glyph_count == 0 {
            // the latest OpenType standard prohibits the removal of the
            // glyph for an empty sequence
            return false;
        }

        self.set_substitute(input_index, substitutes[0].get());

        if glyph_count != 1 {
            let association = self.album.association(input_index);

            // reserve slots for the remaining substitutes right after the
            // input glyph
            self.locator.reserve_glyphs(self.album, glyph_count - 1);

            for (sub_index, substitute) in substitutes.iter().enumerate().skip(1) {
                let new_index = input_index + sub_index;
                self.set_substitute(new_index, substitute.get());
                self.album.set_association(new_index, association);
            }

            // skip the inserted glyphs so the locator does not revisit them
            self.locator.jump_to(self.album, input_index + glyph_count);
        }

        true
    }

    fn apply_alternate_subst(&mut self, subtable: FontData<'a>) -> bool {
        let input_index = self.locator.index();
        let input_glyph = self.album.glyph(input_index);
        let Ok(subst) = AlternateSubstFormat1::read(subtable) else {
            return false;
        };
        let Some(coverage_index) = subst.coverage().ok().and_then(|cov| cov.get(input_glyph))
        else {
            return false;
        };
        let Ok(alternates) = subst.alternate_set(coverage_index) else {
            return false;
        };

        // no alternate selector is threaded through; take the first
        let Some(substitute) = alternates.alternate_glyph_ids().first() else {
            return false;
        };
        self.set_substitute(input_index, substitute.get());

        true
    }

    fn apply_ligature_subst(&mut self, subtable: FontData<'a>) -> bool {
        let input_index = self.locator.index();
        let input_glyph = self.album.glyph(input_index);
        let Ok(subst) = LigatureSubstFormat1::read(subtable) else {
            return false;
        };
        let Some(coverage_index) = subst.coverage().ok().and_then(|cov| cov.get(input_glyph))
        else {
            return false;
        };
        let Ok(ligature_set) = subst.ligature_set(coverage_index) else {
            return false;
        };

        // match each ligature sequentially as they are ordered by
        // preference
        'ligatures: for ligature_index in 0..ligature_set.ligature_count() {
            let Ok(ligature) = ligature_set.ligature(ligature_index) else {
                continue;
            };

            let mut component_indices = Vec::with_capacity(ligature.component_glyph_ids().len());
            let mut prev_index = input_index;
            for component in ligature.component_glyph_ids() {
                let Some(next_index) =
                    self.locator
                        .next_after(self.album, prev_index, self.locator.lookup_flag())
                else {
                    continue 'ligatures;
                };
                if self.album.glyph(next_index) != component.get() {
                    continue 'ligatures;
                }
                component_indices.push(next_index);
                prev_index = next_index;
            }

            // full match: substitute the ligature glyph at the leader and
            // turn the consumed components into placeholders carrying the
            // leader's association
            self.set_substitute(input_index, ligature.ligature_glyph());
            let association = self.album.association(input_index);

            for component_index in component_indices {
                self.album.set_glyph(component_index, GlyphId16::NOTDEF);
                self.album
                    .set_traits(component_index, GlyphTraits::PLACEHOLDER);
                self.album.set_association(component_index, association);
            }

            return true;
        }

        false
    }

    fn apply_extension_subst(&mut self, subtable: FontData<'a>) -> bool {
        let Ok(extension) = ExtensionSubstFormat1::read(subtable) else {
            return false;
        };
        let Ok(inner) = extension.extension_data() else {
            return false;
        };
        if extension.extension_lookup_type() == lookup_type::EXTENSION {
            return false;
        }

        self.apply_substitution_subtable(extension.extension_lookup_type(), inner)
    }
}
