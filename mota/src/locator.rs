//! The filtering iterator over an album.

use raw::tables::gdef::{Gdef, MarkGlyphSets};
use raw::tables::layout::{ClassDef, LookupFlag};

use crate::album::{anti_feature_mask, Album, GlyphTraits, INVALID_INDEX};

/// An iterator over the album that visits only glyphs passing the filter
/// composed from the current lookup flag, feature mask, and GDEF mark
/// filtering data.
///
/// The locator holds no reference to the album; the album is passed to each
/// call, which keeps mutation of the album between iterator steps
/// borrow-exclusive. Several locators may walk one album at a time during
/// context matching, the nested one restricted to the matched range.
#[derive(Clone)]
pub(crate) struct Locator<'a> {
    start_index: usize,
    limit_index: usize,
    state_index: usize,
    index: usize,
    version: u64,
    lookup_flag: LookupFlag,
    ignore_feature_mask: u16,
    ignore_traits: GlyphTraits,
    mark_attach_class_def: Option<ClassDef<'a>>,
    mark_glyph_sets: Option<MarkGlyphSets<'a>>,
    mark_filtering_set: Option<u16>,
}

impl<'a> Locator<'a> {
    /// Create a locator, pulling the mark-attachment class definition and
    /// mark glyph sets out of the GDEF table if present.
    pub fn new(gdef: Option<&Gdef<'a>>) -> Self {
        let mark_attach_class_def = gdef
            .and_then(|gdef| gdef.mark_attach_class_def())
            .and_then(Result::ok);
        let mark_glyph_sets = gdef
            .and_then(|gdef| gdef.mark_glyph_sets())
            .and_then(Result::ok);
        Locator {
            start_index: 0,
            limit_index: 0,
            state_index: 0,
            index: INVALID_INDEX,
            version: 0,
            lookup_flag: LookupFlag::empty(),
            ignore_feature_mask: anti_feature_mask(0),
            ignore_traits: GlyphTraits::PLACEHOLDER,
            mark_attach_class_def,
            mark_glyph_sets,
            mark_filtering_set: None,
        }
    }

    /// Set the iteration window to `count` glyphs starting at `index`.
    pub fn reset(&mut self, album: &Album, index: usize, count: usize) {
        debug_assert!(index <= album.glyph_count() && count <= album.glyph_count() - index);

        self.version = album.version();
        self.start_index = index;
        self.limit_index = index + count;
        self.state_index = index;
        self.index = INVALID_INDEX;
    }

    /// The current lookup flag.
    pub fn lookup_flag(&self) -> LookupFlag {
        self.lookup_flag
    }

    pub fn set_lookup_flag(&mut self, lookup_flag: LookupFlag) {
        self.lookup_flag = lookup_flag;
    }

    /// Configure the feature-mask filter; zero disables it.
    pub fn set_feature_mask(&mut self, feature_mask: u16) {
        self.ignore_feature_mask = anti_feature_mask(feature_mask);
    }

    /// Select a GDEF mark glyph set for UseMarkFilteringSet lookups.
    pub fn set_mark_filtering_set(&mut self, set_index: Option<u16>) {
        self.mark_filtering_set = set_index;
    }

    /// The index yielded by the last successful [`move_next`](Self::move_next).
    pub fn index(&self) -> usize {
        self.index
    }

    fn validate_version(&mut self, album: &Album) {
        debug_assert_eq!(self.version, album.version(), "locator out of sync with album");

        if self.version != album.version() {
            self.version = album.version();
            self.limit_index = self.limit_index.min(album.glyph_count());
            self.state_index = self.state_index.min(self.limit_index);
        }
    }

    fn is_ignored(
        &self,
        album: &Album,
        index: usize,
        lookup_flag: LookupFlag,
        ignore_traits: GlyphTraits,
    ) -> bool {
        let mask = album.glyph_mask(index);

        if mask.feature & self.ignore_feature_mask != 0 {
            return true;
        }
        if mask.traits.intersects(ignore_traits) {
            return true;
        }

        let is_mark = mask.traits.contains(GlyphTraits::MARK);
        if lookup_flag.contains(LookupFlag::IGNORE_MARKS) && is_mark {
            return true;
        }
        if lookup_flag.contains(LookupFlag::IGNORE_LIGATURES)
            && mask.traits.contains(GlyphTraits::LIGATURE)
        {
            return true;
        }
        if lookup_flag.contains(LookupFlag::IGNORE_BASE_GLYPHS)
            && mask.traits.contains(GlyphTraits::BASE)
        {
            return true;
        }

        if is_mark {
            if lookup_flag.contains(LookupFlag::USE_MARK_FILTERING_SET) {
                if let (Some(sets), Some(set_index)) =
                    (&self.mark_glyph_sets, self.mark_filtering_set)
                {
                    let covered = sets
                        .coverage(set_index)
                        .and_then(Result::ok)
                        .and_then(|coverage| coverage.get(album.glyph(index)))
                        .is_some();
                    if !covered {
                        return true;
                    }
                }
            }

            let attach_class = lookup_flag.mark_attachment_class();
            if attach_class != 0 {
                if let Some(class_def) = &self.mark_attach_class_def {
                    if class_def.get(album.glyph(index)) != attach_class {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Advance to the next glyph passing the filter; returns its index.
    pub fn move_next(&mut self, album: &Album) -> Option<usize> {
        debug_assert!(self.state_index <= self.limit_index);
        self.validate_version(album);

        while self.state_index < self.limit_index {
            let index = self.state_index;
            self.state_index += 1;

            if !self.is_ignored(album, index, self.lookup_flag, self.ignore_traits) {
                self.index = index;
                return Some(index);
            }
        }

        None
    }

    /// Call [`move_next`](Self::move_next) `count` times; `true` if every
    /// call yielded a glyph.
    pub fn skip(&mut self, album: &Album, count: usize) -> bool {
        for _ in 0..count {
            if self.move_next(album).is_none() {
                return false;
            }
        }

        true
    }

    /// Position the cursor so that the next [`move_next`](Self::move_next)
    /// starts at `index`.
    ///
    /// It is legal to jump to the limit index, after which `move_next`
    /// reports exhaustion.
    pub fn jump_to(&mut self, album: &Album, index: usize) {
        self.validate_version(album);
        debug_assert!(index <= self.limit_index);

        self.state_index = index.min(self.limit_index);
    }

    /// The next non-ignored index after `index`, without consuming state.
    pub fn next_after(
        &self,
        album: &Album,
        index: usize,
        lookup_flag: LookupFlag,
    ) -> Option<usize> {
        (index + 1..self.limit_index.min(album.glyph_count()))
            .find(|&next| !self.is_ignored(album, next, lookup_flag, self.ignore_traits))
    }

    /// The previous non-ignored index before `index`, without consuming
    /// state.
    pub fn previous_before(
        &self,
        album: &Album,
        index: usize,
        lookup_flag: LookupFlag,
    ) -> Option<usize> {
        self.previous_before_with(album, index, lookup_flag, self.ignore_traits)
    }

    /// As [`previous_before`](Self::previous_before), with an explicit
    /// ignored-traits set.
    ///
    /// Mark-to-mark positioning passes an empty set so that placeholder
    /// glyphs stay visible as ligature component boundaries.
    pub fn previous_before_with(
        &self,
        album: &Album,
        index: usize,
        lookup_flag: LookupFlag,
        ignore_traits: GlyphTraits,
    ) -> Option<usize> {
        (self.start_index..index.min(album.glyph_count()))
            .rev()
            .find(|&prev| !self.is_ignored(album, prev, lookup_flag, ignore_traits))
    }

    /// Copy a sibling locator's cursor back, so that iteration resumes past
    /// whatever the sibling consumed.
    pub fn take_state(&mut self, sibling: &Locator) {
        debug_assert!(sibling.state_index <= self.limit_index.max(sibling.limit_index));

        self.state_index = sibling.state_index.min(self.limit_index);
        self.version = self.version.max(sibling.version);
    }

    /// Insert `count` slots at the cursor and grow the window to match.
    pub fn reserve_glyphs(&mut self, album: &mut Album, count: usize) {
        self.validate_version(album);
        album.reserve_glyphs(self.state_index, count);

        self.version = album.version();
        self.limit_index += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw::types::GlyphId16;

    fn album_with_traits(traits: &[GlyphTraits]) -> Album {
        let mut album = Album::new();
        album.reset(traits.len().max(1));
        album.begin_filling();
        for (i, t) in traits.iter().enumerate() {
            album.add_glyph(GlyphId16::new(i as u16 + 1), *t, i.min(album.codeunit_count() - 1));
        }
        album
    }

    #[test]
    fn ignore_marks() {
        let album = album_with_traits(&[
            GlyphTraits::BASE,
            GlyphTraits::MARK,
            GlyphTraits::BASE,
            GlyphTraits::MARK,
        ]);
        let mut locator = Locator::new(None);
        locator.reset(&album, 0, album.glyph_count());
        locator.set_lookup_flag(LookupFlag::IGNORE_MARKS);

        let mut visited = Vec::new();
        while let Some(index) = locator.move_next(&album) {
            visited.push(index);
        }
        assert_eq!(visited, [0, 2]);
    }

    #[test]
    fn placeholders_are_skipped_by_default() {
        let album = album_with_traits(&[
            GlyphTraits::LIGATURE,
            GlyphTraits::PLACEHOLDER,
            GlyphTraits::MARK,
        ]);
        let mut locator = Locator::new(None);
        locator.reset(&album, 0, album.glyph_count());

        assert_eq!(locator.next_after(&album, 0, LookupFlag::empty()), Some(2));
        assert_eq!(
            locator.previous_before(&album, 2, LookupFlag::empty()),
            Some(0)
        );
        // with placeholders visible, the boundary shows up
        assert_eq!(
            locator.previous_before_with(&album, 2, LookupFlag::empty(), GlyphTraits::NONE),
            Some(1)
        );
    }

    #[test]
    fn feature_mask_filter() {
        let mut album = album_with_traits(&[GlyphTraits::NONE, GlyphTraits::NONE]);
        album.set_feature_mask(0, 0x0001); // say, an initial form
        album.set_feature_mask(1, 0x0008); // a final form

        let mut locator = Locator::new(None);
        locator.reset(&album, 0, album.glyph_count());
        locator.set_feature_mask(0x0001);

        let mut visited = Vec::new();
        while let Some(index) = locator.move_next(&album) {
            visited.push(index);
        }
        assert_eq!(visited, [0]);

        // sentinel masks fail any nonzero feature filter
        let album = album_with_traits(&[GlyphTraits::NONE]);
        locator.reset(&album, 0, 1);
        assert_eq!(locator.move_next(&album), None);
    }

    #[test]
    fn jump_and_window() {
        let album = album_with_traits(&[GlyphTraits::NONE; 5]);
        let mut locator = Locator::new(None);
        locator.reset(&album, 1, 3);

        assert_eq!(locator.move_next(&album), Some(1));
        locator.jump_to(&album, 3);
        assert_eq!(locator.move_next(&album), Some(3));
        assert_eq!(locator.move_next(&album), None);
        assert_eq!(locator.next_after(&album, 3, LookupFlag::empty()), None);
    }

    fn gdef_with_mark_filters() -> Vec<u8> {
        // version 1.2: a mark attachment class definition (glyph 2 -> class
        // 1, glyph 3 -> class 2) and one mark glyph set covering glyph 2
        layout_test_data::BeBuffer::new()
            .push(1u16)
            .push(2u16)
            .push(0u16) // glyph class def
            .push(0u16) // attach list
            .push(0u16) // lig caret list
            .push(14u16) // mark attach class def
            .push(30u16) // mark glyph sets def
            // class def format 2 at 14, length 16
            .push(2u16)
            .push(2u16)
            .push(2u16)
            .push(2u16)
            .push(1u16)
            .push(3u16)
            .push(3u16)
            .push(2u16)
            // mark glyph sets at 30: one set, coverage at offset 8
            .push(1u16)
            .push(1u16)
            .push(8u32)
            .push(1u16)
            .push(1u16)
            .push(2u16)
            .into_vec()
    }

    #[test]
    fn mark_attachment_class_filter() {
        use raw::tables::gdef::Gdef;
        use raw::{FontData, FontRead};

        let gdef_data = gdef_with_mark_filters();
        let gdef = Gdef::read(FontData::new(&gdef_data)).unwrap();
        let album = album_with_traits(&[GlyphTraits::BASE, GlyphTraits::MARK, GlyphTraits::MARK]);

        let mut flag = LookupFlag::empty();
        flag.set_mark_attachment_class(1);
        let mut locator = Locator::new(Some(&gdef));
        locator.reset(&album, 0, album.glyph_count());
        locator.set_lookup_flag(flag);

        // glyph 2 (index 1) carries class 1; glyph 3 (index 2) carries
        // class 2 and is skipped
        let mut visited = Vec::new();
        while let Some(index) = locator.move_next(&album) {
            visited.push(index);
        }
        assert_eq!(visited, [0, 1]);
    }

    #[test]
    fn mark_filtering_set() {
        use raw::tables::gdef::Gdef;
        use raw::{FontData, FontRead};

        let gdef_data = gdef_with_mark_filters();
        let gdef = Gdef::read(FontData::new(&gdef_data)).unwrap();
        let album = album_with_traits(&[GlyphTraits::BASE, GlyphTraits::MARK, GlyphTraits::MARK]);

        let mut locator = Locator::new(Some(&gdef));
        locator.reset(&album, 0, album.glyph_count());
        locator.set_lookup_flag(LookupFlag::USE_MARK_FILTERING_SET);
        locator.set_mark_filtering_set(Some(0));

        // only glyph 2 (index 1) is in the referenced set; glyph 3 is not
        let mut visited = Vec::new();
        while let Some(index) = locator.move_next(&album) {
            visited.push(index);
        }
        assert_eq!(visited, [0, 1]);
    }

    #[test]
    fn reserve_updates_limit() {
        let mut album = album_with_traits(&[GlyphTraits::NONE, GlyphTraits::NONE]);
        let mut locator = Locator::new(None);
        locator.reset(&album, 0, 2);
        assert_eq!(locator.move_next(&album), Some(0));

        locator.reserve_glyphs(&mut album, 2);
        assert_eq!(album.glyph_count(), 4);
        // the reserved slots sit at the cursor and carry the sentinel mask,
        // so plain iteration still reaches the shifted tail
        album.set_feature_mask(1, 0);
        album.set_feature_mask(2, 0);
        let mut visited = Vec::new();
        while let Some(index) = locator.move_next(&album) {
            visited.push(index);
        }
        assert_eq!(visited, [1, 2, 3]);
    }
}
