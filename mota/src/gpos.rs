//! Applying GPOS subtables to the album, and attachment resolution.

use raw::tables::gpos::{
    lookup_type, AnchorTable, CursivePosFormat1, ExtensionPosFormat1, MarkBasePosFormat1,
    MarkLigPosFormat1, MarkMarkPosFormat1, PairPos, SinglePos, ValueRecord,
};
use raw::tables::layout::LookupFlag;
use raw::types::Point;
use raw::{FontData, FontRead};

use crate::album::GlyphTraits;
use crate::artist::TextDirection;
use crate::locator::Locator;
use crate::processor::TextProcessor;

impl<'a, 'b> TextProcessor<'a, 'b> {
    /// Apply one positioning subtable at the locator's current position.
    ///
    /// Returns `true` if an adjustment took place; unrecognized kinds and
    /// formats report `false` so processing continues.
    pub(crate) fn apply_positioning_subtable(
        &mut self,
        lookup_type: u16,
        subtable: FontData<'a>,
    ) -> bool {
        match lookup_type {
            lookup_type::SINGLE_ADJUSTMENT => self.apply_single_pos(subtable),
            lookup_type::PAIR_ADJUSTMENT => self.apply_pair_pos(subtable),
            lookup_type::CURSIVE_ATTACHMENT => self.apply_cursive_pos(subtable),
            lookup_type::MARK_TO_BASE_ATTACHMENT => self.apply_mark_to_base_pos(subtable),
            lookup_type::MARK_TO_LIGATURE_ATTACHMENT => self.apply_mark_to_lig_pos(subtable),
            lookup_type::MARK_TO_MARK_ATTACHMENT => self.apply_mark_to_mark_pos(subtable),
            lookup_type::CONTEXTUAL => self.apply_context_subtable(subtable),
            lookup_type::CHAINED_CONTEXTUAL => self.apply_chained_context_subtable(subtable),
            lookup_type::EXTENSION => self.apply_extension_pos(subtable),
            _ => false,
        }
    }

    /// Add a value record's placement to the glyph's offset and its advance
    /// adjustment to the glyph's advance.
    fn apply_value_record(&mut self, record: &ValueRecord, index: usize) {
        let mut position = self.album.position(index);
        position.x += record.x_placement() as i32;
        position.y += record.y_placement() as i32;
        self.album.set_position(index, position);

        // horizontal layout only; the y advance is not wired up
        let advance = self.album.advance(index) + record.x_advance() as i32;
        self.album.set_advance(index, advance);
    }

    fn apply_single_pos(&mut self, subtable: FontData<'a>) -> bool {
        let input_index = self.locator.index();
        let input_glyph = self.album.glyph(input_index);
        let Ok(pos) = SinglePos::read(subtable) else {
            return false;
        };

        match pos {
            SinglePos::Format1(pos) => {
                if pos
                    .coverage()
                    .ok()
                    .and_then(|cov| cov.get(input_glyph))
                    .is_none()
                {
                    return false;
                }
                let record = pos.value_record().clone();
                self.apply_value_record(&record, input_index);
                true
            }
            SinglePos::Format2(pos) => {
                let Some(coverage_index) =
                    pos.coverage().ok().and_then(|cov| cov.get(input_glyph))
                else {
                    return false;
                };
                let Ok(record) = pos.value_record(coverage_index) else {
                    return false;
                };
                self.apply_value_record(&record, input_index);
                true
            }
        }
    }

    fn apply_pair_pos(&mut self, subtable: FontData<'a>) -> bool {
        let first_index = self.locator.index();
        let Some(second_index) =
            self.locator
                .next_after(self.album, first_index, self.locator.lookup_flag())
        else {
            return false;
        };
        let first_glyph = self.album.glyph(first_index);
        let second_glyph = self.album.glyph(second_index);
        let Ok(pos) = PairPos::read(subtable) else {
            return false;
        };

        let (records, skip_second) = match &pos {
            PairPos::Format1(pos) => {
                let Some(coverage_index) =
                    pos.coverage().ok().and_then(|cov| cov.get(first_glyph))
                else {
                    return false;
                };
                let Ok(pair_set) = pos.pair_set(coverage_index) else {
                    return false;
                };
                let Some(records) = pair_set.pair_value_record(second_glyph) else {
                    return false;
                };
                (records, pos.value_format2().bits() != 0)
            }
            PairPos::Format2(pos) => {
                if pos
                    .coverage()
                    .ok()
                    .and_then(|cov| cov.get(first_glyph))
                    .is_none()
                {
                    return false;
                }
                let (Ok(class_def1), Ok(class_def2)) = (pos.class_def1(), pos.class_def2())
                else {
                    return false;
                };
                let class1 = class_def1.get(first_glyph);
                let class2 = class_def2.get(second_glyph);
                let Ok(records) = pos.class_pair_value_records(class1, class2) else {
                    return false;
                };
                (records, pos.value_format2().bits() != 0)
            }
        };

        let (value1, value2) = records;
        self.apply_value_record(&value1, first_index);
        if skip_second {
            self.apply_value_record(&value2, second_index);
            // the pair element is consumed only when a value record for the
            // second glyph is available
            self.locator.jump_to(self.album, second_index + 1);
        }

        true
    }

    fn apply_cursive_pos(&mut self, subtable: FontData<'a>) -> bool {
        let first_index = self.locator.index();
        let first_glyph = self.album.glyph(first_index);
        let Ok(pos) = CursivePosFormat1::read(subtable) else {
            return false;
        };
        let Ok(coverage) = pos.coverage() else {
            return false;
        };

        let Some(first_coverage) = coverage.get(first_glyph) else {
            return false;
        };
        let Some(Ok(exit_anchor)) = pos.exit_anchor(first_coverage) else {
            return false;
        };

        let Some(second_index) =
            self.locator
                .next_after(self.album, first_index, self.locator.lookup_flag())
        else {
            return false;
        };
        let Some(second_coverage) = coverage.get(self.album.glyph(second_index)) else {
            return false;
        };
        let Some(Ok(entry_anchor)) = pos.entry_anchor(second_coverage) else {
            return false;
        };

        let exit_point = anchor_point(&exit_anchor);
        let entry_point = anchor_point(&entry_anchor);
        let first_position = self.album.position(first_index);
        let mut second_position = self.album.position(second_index);
        let mut second_advance = self.album.advance(second_index);

        // the exit glyph ends at its exit anchor, replacing its advance
        // while keeping its offset, and the entry glyph starts at its entry
        // anchor, keeping its advance so the pen lands where it should
        self.album
            .set_advance(first_index, first_position.x + exit_point.x);
        second_advance -= second_position.x + entry_point.x;
        second_position.x = -entry_point.x;
        second_position.y = exit_point.y - entry_point.y;
        self.album.set_position(second_index, second_position);
        self.album.set_advance(second_index, second_advance);

        self.album
            .set_cursive_offset(first_index, (second_index - first_index) as u16);
        self.album.insert_traits(first_index, GlyphTraits::CURSIVE);
        self.album.insert_traits(second_index, GlyphTraits::CURSIVE);
        if self.locator.lookup_flag().contains(LookupFlag::RIGHT_TO_LEFT) {
            self.album
                .insert_traits(first_index, GlyphTraits::RIGHT_TO_LEFT);
            self.album
                .insert_traits(second_index, GlyphTraits::RIGHT_TO_LEFT);
        }

        true
    }

    /// Attach the mark at `mark_index` to `target_index` using the given
    /// anchors.
    fn attach_mark(
        &mut self,
        mark_index: usize,
        target_index: usize,
        mark_anchor: &AnchorTable,
        target_anchor: &AnchorTable,
    ) {
        let position = anchor_point(target_anchor) - anchor_point(mark_anchor);
        self.album.set_position(mark_index, position);
        self.album
            .set_attachment_offset(mark_index, (mark_index - target_index) as u16);
        self.album.insert_traits(mark_index, GlyphTraits::ATTACHED);
    }

    fn apply_mark_to_base_pos(&mut self, subtable: FontData<'a>) -> bool {
        let mark_index = self.locator.index();
        let mark_glyph = self.album.glyph(mark_index);
        let Ok(pos) = MarkBasePosFormat1::read(subtable) else {
            return false;
        };
        let Some(mark_coverage) = pos
            .mark_coverage()
            .ok()
            .and_then(|cov| cov.get(mark_glyph))
        else {
            return false;
        };

        // the previous non-mark glyph is taken as the base; whether it
        // really is one is decided by the base coverage
        let base_flag = self
            .locator
            .lookup_flag()
            .union(LookupFlag::IGNORE_MARKS);
        let Some(base_index) = self
            .locator
            .previous_before(self.album, mark_index, base_flag)
        else {
            return false;
        };
        let Some(base_coverage) = pos
            .base_coverage()
            .ok()
            .and_then(|cov| cov.get(self.album.glyph(base_index)))
        else {
            return false;
        };

        let Ok(mark_array) = pos.mark_array() else {
            return false;
        };
        let Some((mark_class, Ok(mark_anchor))) = mark_array.mark_anchor(mark_coverage) else {
            return false;
        };
        if mark_class >= pos.mark_class_count() {
            return false;
        }
        let Ok(base_array) = pos.base_array() else {
            return false;
        };
        let Some(Ok(base_anchor)) = base_array.anchor(base_coverage, mark_class) else {
            return false;
        };

        self.attach_mark(mark_index, base_index, &mark_anchor, &base_anchor);
        true
    }

    fn apply_mark_to_lig_pos(&mut self, subtable: FontData<'a>) -> bool {
        let mark_index = self.locator.index();
        let mark_glyph = self.album.glyph(mark_index);
        let Ok(pos) = MarkLigPosFormat1::read(subtable) else {
            return false;
        };
        let Some(mark_coverage) = pos
            .mark_coverage()
            .ok()
            .and_then(|cov| cov.get(mark_glyph))
        else {
            return false;
        };

        let ligature_flag = self
            .locator
            .lookup_flag()
            .union(LookupFlag::IGNORE_MARKS);
        let Some(ligature_index) =
            self.locator
                .previous_before(self.album, mark_index, ligature_flag)
        else {
            return false;
        };
        let Some(ligature_coverage) = pos
            .ligature_coverage()
            .ok()
            .and_then(|cov| cov.get(self.album.glyph(ligature_index)))
        else {
            return false;
        };

        let Ok(mark_array) = pos.mark_array() else {
            return false;
        };
        let Some((mark_class, Ok(mark_anchor))) = mark_array.mark_anchor(mark_coverage) else {
            return false;
        };
        if mark_class >= pos.mark_class_count() {
            return false;
        }
        let Ok(ligature_array) = pos.ligature_array() else {
            return false;
        };
        let Ok(attach) = ligature_array.ligature_attach(ligature_coverage) else {
            return false;
        };
        if attach.row_count() == 0 {
            return false;
        }

        // the mark attaches to the component it follows: placeholders
        // between the ligature and the mark count the consumed components
        let mut component = 0u16;
        for index in ligature_index + 1..mark_index {
            if self.album.traits(index).contains(GlyphTraits::PLACEHOLDER) {
                component += 1;
            }
        }
        let component = component.min(attach.row_count() - 1);

        let Some(Ok(ligature_anchor)) = attach.anchor(component, mark_class) else {
            return false;
        };

        self.attach_mark(mark_index, ligature_index, &mark_anchor, &ligature_anchor);
        true
    }

    fn apply_mark_to_mark_pos(&mut self, subtable: FontData<'a>) -> bool {
        let mark1_index = self.locator.index();
        let mark1_glyph = self.album.glyph(mark1_index);
        let Ok(pos) = MarkMarkPosFormat1::read(subtable) else {
            return false;
        };
        let Some(mark1_coverage) = pos
            .mark1_coverage()
            .ok()
            .and_then(|cov| cov.get(mark1_glyph))
        else {
            return false;
        };

        // the previous glyph is assumed to be the attachment-target mark;
        // placeholders stay visible so a ligature component boundary blocks
        // the attachment
        let mark2_flag = self.locator.lookup_flag().difference(
            LookupFlag::IGNORE_BASE_GLYPHS
                .union(LookupFlag::IGNORE_LIGATURES)
                .union(LookupFlag::IGNORE_MARKS),
        );
        let Some(mark2_index) = self.locator.previous_before_with(
            self.album,
            mark1_index,
            mark2_flag,
            GlyphTraits::NONE,
        ) else {
            return false;
        };
        if self
            .album
            .traits(mark2_index)
            .contains(GlyphTraits::PLACEHOLDER)
        {
            return false;
        }
        let Some(mark2_coverage) = pos
            .mark2_coverage()
            .ok()
            .and_then(|cov| cov.get(self.album.glyph(mark2_index)))
        else {
            return false;
        };

        let Ok(mark1_array) = pos.mark1_array() else {
            return false;
        };
        let Some((mark_class, Ok(mark1_anchor))) = mark1_array.mark_anchor(mark1_coverage) else {
            return false;
        };
        if mark_class >= pos.mark_class_count() {
            return false;
        }
        let Ok(mark2_array) = pos.mark2_array() else {
            return false;
        };
        let Some(Ok(mark2_anchor)) = mark2_array.anchor(mark2_coverage, mark_class) else {
            return false;
        };

        self.attach_mark(mark1_index, mark2_index, &mark1_anchor, &mark2_anchor);
        true
    }

    fn apply_extension_pos(&mut self, subtable: FontData<'a>) -> bool {
        let Ok(extension) = ExtensionPosFormat1::read(subtable) else {
            return false;
        };
        let Ok(inner) = extension.extension_data() else {
            return false;
        };
        if extension.extension_lookup_type() == lookup_type::EXTENSION {
            return false;
        }

        self.apply_positioning_subtable(extension.extension_lookup_type(), inner)
    }

    // ---- attachment resolution ----

    /// Propagate cursive and mark attachments into absolute offsets.
    ///
    /// Runs once after all positioning lookups, in two passes over the
    /// whole album with an unfiltered locator.
    pub(crate) fn resolve_attachments(&mut self) {
        let mut locator = Locator::new(None);

        locator.reset(self.album, 0, self.album.glyph_count());
        while let Some(index) = locator.move_next(self.album) {
            let traits = self.album.traits(index);
            if traits.contains(GlyphTraits::CURSIVE) && !traits.contains(GlyphTraits::RESOLVED) {
                self.resolve_cursive_chain(index);
            }
        }

        locator.reset(self.album, 0, self.album.glyph_count());
        while let Some(index) = locator.move_next(self.album) {
            if self.album.traits(index).contains(GlyphTraits::ATTACHED) {
                self.resolve_mark_position(index);
            }
        }
    }

    /// Walk one cursive chain, accumulating the vertical offsets so the
    /// anchored end of the chain sits on the baseline.
    fn resolve_cursive_chain(&mut self, index: usize) {
        // marking up front keeps a malformed cyclic chain from recursing
        // forever
        self.album.insert_traits(index, GlyphTraits::RESOLVED);

        let offset = self.album.cursive_offset(index) as usize;
        if offset == 0 {
            return;
        }
        let next = index + offset;
        if next >= self.album.glyph_count() {
            return;
        }

        if self.album.traits(index).contains(GlyphTraits::RIGHT_TO_LEFT) {
            // the last glyph of the segment anchors at the baseline and
            // earlier glyphs rise relative to it
            if !self.album.traits(next).contains(GlyphTraits::RESOLVED) {
                self.resolve_cursive_chain(next);
            }
            let mut position = self.album.position(index);
            position.y += self.album.position(next).y;
            self.album.set_position(index, position);
        } else {
            // the first glyph anchors at the baseline and later glyphs
            // descend from it
            let mut next_position = self.album.position(next);
            next_position.y += self.album.position(index).y;
            self.album.set_position(next, next_position);
            if !self.album.traits(next).contains(GlyphTraits::RESOLVED) {
                self.resolve_cursive_chain(next);
            }
        }
    }

    /// Let the mark follow its target's position, then close the
    /// direction-dependent horizontal gap the pen has moved since the
    /// target.
    fn resolve_mark_position(&mut self, index: usize) {
        let offset = self.album.attachment_offset(index) as usize;
        if offset == 0 || offset > index {
            return;
        }
        let target = index - offset;

        let mut position = self.album.position(index) + self.album.position(target);
        match self.text_direction {
            TextDirection::LeftToRight => {
                for advance_index in target..index {
                    position.x -= self.album.advance(advance_index);
                }
            }
            TextDirection::RightToLeft => {
                for advance_index in target + 1..=index {
                    position.x += self.album.advance(advance_index);
                }
            }
        }
        self.album.set_position(index, position);
    }
}

fn anchor_point(anchor: &AnchorTable) -> Point<i32> {
    Point::new(anchor.x_coordinate() as i32, anchor.y_coordinate() as i32)
}
