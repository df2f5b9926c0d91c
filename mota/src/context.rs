//! Contextual and chained-contextual rule matching.
//!
//! All six variants (three formats each of Context and ChainingContext,
//! shared by GSUB and GPOS) funnel into one matching walk: backtrack
//! positions via the locator's backward search, input positions forward
//! from the current glyph, lookahead past the last input glyph. On a match
//! the nested lookup records are dispatched under a locator restricted to
//! the matched input range, and the outer locator takes over the nested
//! cursor so it does not revisit consumed input.

use raw::tables::layout::{
    ChainedSequenceContext, ChainedSequenceContextFormat1, ChainedSequenceContextFormat2,
    ChainedSequenceContextFormat3, ChainedSequenceRule, SequenceContext, SequenceContextFormat1,
    SequenceContextFormat2, SequenceContextFormat3, SequenceLookupRecord,
};
use raw::types::GlyphId16;
use raw::{FontData, FontRead};

use crate::processor::TextProcessor;

/// A per-position predicate over the glyphs of one context phase.
type Pred<'p> = &'p dyn Fn(u16, GlyphId16) -> bool;

impl<'a, 'b> TextProcessor<'a, 'b> {
    pub(crate) fn apply_context_subtable(&mut self, subtable: FontData<'a>) -> bool {
        let Ok(context) = SequenceContext::read(subtable) else {
            return false;
        };

        match context {
            SequenceContext::Format1(table) => self.apply_context_format1(&table),
            SequenceContext::Format2(table) => self.apply_context_format2(&table),
            SequenceContext::Format3(table) => self.apply_context_format3(&table),
        }
    }

    pub(crate) fn apply_chained_context_subtable(&mut self, subtable: FontData<'a>) -> bool {
        let Ok(context) = ChainedSequenceContext::read(subtable) else {
            return false;
        };

        match context {
            ChainedSequenceContext::Format1(table) => self.apply_chained_context_format1(&table),
            ChainedSequenceContext::Format2(table) => self.apply_chained_context_format2(&table),
            ChainedSequenceContext::Format3(table) => self.apply_chained_context_format3(&table),
        }
    }

    fn apply_context_format1(&mut self, table: &SequenceContextFormat1<'a>) -> bool {
        let first_glyph = self.album.glyph(self.locator.index());
        let Some(coverage_index) = table.coverage().ok().and_then(|cov| cov.get(first_glyph))
        else {
            return false;
        };
        let Some(Ok(rule_set)) = table.seq_rule_set(coverage_index) else {
            return false;
        };

        for rule_index in 0..rule_set.rule_count() {
            let Ok(rule) = rule_set.rule(rule_index) else {
                continue;
            };
            let input = rule.input_sequence();
            let pred = move |position: u16, glyph: GlyphId16| {
                position == 0 || input[position as usize - 1].get() == glyph.to_u16()
            };
            if self.try_rule(None, rule.glyph_count(), None, &pred, rule.seq_lookup_records()) {
                return true;
            }
        }

        false
    }

    fn apply_context_format2(&mut self, table: &SequenceContextFormat2<'a>) -> bool {
        let first_glyph = self.album.glyph(self.locator.index());
        if table
            .coverage()
            .ok()
            .and_then(|cov| cov.get(first_glyph))
            .is_none()
        {
            return false;
        }
        let Ok(class_def) = table.class_def() else {
            return false;
        };
        let Some(Ok(rule_set)) = table.class_seq_rule_set(class_def.get(first_glyph)) else {
            return false;
        };

        for rule_index in 0..rule_set.rule_count() {
            let Ok(rule) = rule_set.rule(rule_index) else {
                continue;
            };
            let input = rule.input_sequence();
            let class_def = &class_def;
            let pred = move |position: u16, glyph: GlyphId16| {
                position == 0 || input[position as usize - 1].get() == class_def.get(glyph)
            };
            if self.try_rule(None, rule.glyph_count(), None, &pred, rule.seq_lookup_records()) {
                return true;
            }
        }

        false
    }

    fn apply_context_format3(&mut self, table: &SequenceContextFormat3<'a>) -> bool {
        let input_pred = |position: u16, glyph: GlyphId16| {
            table
                .coverage(position)
                .ok()
                .and_then(|cov| cov.get(glyph))
                .is_some()
        };
        self.try_rule(
            None,
            table.glyph_count(),
            None,
            &input_pred,
            table.seq_lookup_records(),
        )
    }

    fn apply_chained_context_format1(&mut self, table: &ChainedSequenceContextFormat1<'a>) -> bool {
        let first_glyph = self.album.glyph(self.locator.index());
        let Some(coverage_index) = table.coverage().ok().and_then(|cov| cov.get(first_glyph))
        else {
            return false;
        };
        let Some(Ok(rule_set)) = table.chained_seq_rule_set(coverage_index) else {
            return false;
        };

        for rule_index in 0..rule_set.rule_count() {
            let Ok(rule) = rule_set.rule(rule_index) else {
                continue;
            };
            if self.try_chained_rule_by_value(&rule, |value, glyph| value == glyph.to_u16()) {
                return true;
            }
        }

        false
    }

    fn apply_chained_context_format2(&mut self, table: &ChainedSequenceContextFormat2<'a>) -> bool {
        let first_glyph = self.album.glyph(self.locator.index());
        if table
            .coverage()
            .ok()
            .and_then(|cov| cov.get(first_glyph))
            .is_none()
        {
            return false;
        }
        let (Ok(backtrack_classes), Ok(input_classes), Ok(lookahead_classes)) = (
            table.backtrack_class_def(),
            table.input_class_def(),
            table.lookahead_class_def(),
        ) else {
            return false;
        };
        let Some(Ok(rule_set)) =
            table.chained_class_seq_rule_set(input_classes.get(first_glyph))
        else {
            return false;
        };

        for rule_index in 0..rule_set.rule_count() {
            let Ok(rule) = rule_set.rule(rule_index) else {
                continue;
            };
            let backtrack = rule.backtrack_sequence();
            let input = rule.input_sequence();
            let lookahead = rule.lookahead_sequence();
            let backtrack_pred = |position: u16, glyph: GlyphId16| {
                backtrack[position as usize].get() == backtrack_classes.get(glyph)
            };
            let input_pred = |position: u16, glyph: GlyphId16| {
                position == 0 || input[position as usize - 1].get() == input_classes.get(glyph)
            };
            let lookahead_pred = |position: u16, glyph: GlyphId16| {
                lookahead[position as usize].get() == lookahead_classes.get(glyph)
            };
            if self.try_rule(
                Some((&backtrack_pred, backtrack.len() as u16)),
                rule.glyph_count(),
                Some((&lookahead_pred, lookahead.len() as u16)),
                &input_pred,
                rule.seq_lookup_records(),
            ) {
                return true;
            }
        }

        false
    }

    fn apply_chained_context_format3(&mut self, table: &ChainedSequenceContextFormat3<'a>) -> bool {
        let backtrack_pred = |position: u16, glyph: GlyphId16| {
            table
                .backtrack_coverage(position)
                .ok()
                .and_then(|cov| cov.get(glyph))
                .is_some()
        };
        let input_pred = |position: u16, glyph: GlyphId16| {
            table
                .input_coverage(position)
                .ok()
                .and_then(|cov| cov.get(glyph))
                .is_some()
        };
        let lookahead_pred = |position: u16, glyph: GlyphId16| {
            table
                .lookahead_coverage(position)
                .ok()
                .and_then(|cov| cov.get(glyph))
                .is_some()
        };
        self.try_rule(
            Some((&backtrack_pred, table.backtrack_glyph_count())),
            table.input_glyph_count(),
            Some((&lookahead_pred, table.lookahead_glyph_count())),
            &input_pred,
            table.seq_lookup_records(),
        )
    }

    fn try_chained_rule_by_value(
        &mut self,
        rule: &ChainedSequenceRule<'a>,
        matches: impl Fn(u16, GlyphId16) -> bool,
    ) -> bool {
        let backtrack = rule.backtrack_sequence();
        let input = rule.input_sequence();
        let lookahead = rule.lookahead_sequence();
        let backtrack_pred =
            |position: u16, glyph: GlyphId16| matches(backtrack[position as usize].get(), glyph);
        let input_pred = |position: u16, glyph: GlyphId16| {
            position == 0 || matches(input[position as usize - 1].get(), glyph)
        };
        let lookahead_pred =
            |position: u16, glyph: GlyphId16| matches(lookahead[position as usize].get(), glyph);
        self.try_rule(
            Some((&backtrack_pred, backtrack.len() as u16)),
            rule.glyph_count(),
            Some((&lookahead_pred, lookahead.len() as u16)),
            &input_pred,
            rule.seq_lookup_records(),
        )
    }

    /// Match one rule at the locator's current position and dispatch its
    /// lookup records on success.
    fn try_rule(
        &mut self,
        backtrack: Option<(Pred, u16)>,
        input_count: u16,
        lookahead: Option<(Pred, u16)>,
        input_pred: Pred,
        records: &[SequenceLookupRecord],
    ) -> bool {
        if let Some((pred, count)) = backtrack {
            if !self.match_backtrack(pred, count) {
                return false;
            }
        }
        let Some(context_end) = self.match_input(input_pred, input_count) else {
            return false;
        };
        if let Some((pred, count)) = lookahead {
            if !self.match_lookahead(context_end, pred, count) {
                return false;
            }
        }

        self.apply_context_records(self.locator.index(), context_end, records);
        true
    }

    /// Walk `count` positions backward from the current glyph, closest
    /// first.
    fn match_backtrack(&self, pred: Pred, count: u16) -> bool {
        let mut index = self.locator.index();
        for position in 0..count {
            let Some(previous) =
                self.locator
                    .previous_before(self.album, index, self.locator.lookup_flag())
            else {
                return false;
            };
            if !pred(position, self.album.glyph(previous)) {
                return false;
            }
            index = previous;
        }

        true
    }

    /// Walk `count` positions forward including the current glyph; returns
    /// the index of the last input glyph.
    fn match_input(&self, pred: Pred, count: u16) -> Option<usize> {
        let mut index = self.locator.index();
        if !pred(0, self.album.glyph(index)) {
            return None;
        }
        for position in 1..count {
            let next = self
                .locator
                .next_after(self.album, index, self.locator.lookup_flag())?;
            if !pred(position, self.album.glyph(next)) {
                return None;
            }
            index = next;
        }

        Some(index)
    }

    /// Walk `count` positions forward from just past the last input glyph.
    fn match_lookahead(&self, context_end: usize, pred: Pred, count: u16) -> bool {
        let mut index = context_end;
        for position in 0..count {
            let Some(next) =
                self.locator
                    .next_after(self.album, index, self.locator.lookup_flag())
            else {
                return false;
            };
            if !pred(position, self.album.glyph(next)) {
                return false;
            }
            index = next;
        }

        true
    }

    /// Dispatch nested lookup records over the matched input range.
    fn apply_context_records(
        &mut self,
        context_start: usize,
        context_end: usize,
        records: &[SequenceLookupRecord],
    ) {
        let previous = self.locator.clone();
        let mut consumed = None;

        for record in records {
            let mut context_locator = previous.clone();
            context_locator.reset(self.album, context_start, context_end + 1 - context_start);

            if context_locator.skip(self.album, record.sequence_index() as usize) {
                self.locator = context_locator;
                self.apply_lookup(record.lookup_list_index());
                consumed = Some(self.locator.clone());
            }
        }

        // resume the outer iteration past whatever the nested lookups
        // consumed
        self.locator = previous;
        if let Some(context_locator) = consumed {
            self.locator.take_state(&context_locator);
        }
    }
}
