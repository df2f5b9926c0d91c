//! The compiled shaping plan and its builder.

use raw::types::Tag;

use crate::artist::TextDirection;
use crate::font::Font;

/// Which half of the layout pipeline a feature or lookup belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FeatureKind {
    Substitution,
    Positioning,
}

/// One stage of the shaping pipeline: the lookups of one feature, or of a
/// group of features that apply simultaneously.
#[derive(Clone, Debug)]
pub(crate) struct FeatureUnit {
    /// Range into the pattern's feature tags covered by this unit.
    pub covered_start: usize,
    pub covered_count: usize,
    /// Union of the feature masks of the covered features.
    pub feature_mask: u16,
    /// Lookup indices, ascending and duplicate-free.
    pub lookup_indices: Vec<u16>,
}

/// An immutable, compiled shaping plan for one (font, script, language)
/// triple.
///
/// Patterns are produced by a [`Scheme`](crate::Scheme), are immutable once
/// built, and may be shared freely by reference between artists and across
/// threads.
pub struct Pattern<'a> {
    pub(crate) font: Font<'a>,
    pub(crate) script_tag: Tag,
    pub(crate) language_tag: Tag,
    pub(crate) default_direction: TextDirection,
    pub(crate) feature_tags: Vec<Tag>,
    pub(crate) feature_units: Vec<FeatureUnit>,
    pub(crate) gsub_unit_count: usize,
    pub(crate) gpos_unit_count: usize,
}

impl<'a> Pattern<'a> {
    /// The font this pattern was compiled against.
    pub fn font(&self) -> Font<'a> {
        self.font
    }

    /// The script the pattern shapes.
    pub fn script_tag(&self) -> Tag {
        self.script_tag
    }

    /// The language system the pattern selects.
    pub fn language_tag(&self) -> Tag {
        self.language_tag
    }

    /// The default text direction of the script.
    pub fn default_direction(&self) -> TextDirection {
        self.default_direction
    }

    /// The font features the pattern applies, in implementation order.
    pub fn feature_tags(&self) -> &[Tag] {
        &self.feature_tags
    }
}

/// Collects features and lookups into a [`Pattern`].
///
/// Usage follows the pipeline order: `begin_features(kind)`, then for each
/// feature `add_feature` and its `add_lookup`s, closing each unit with
/// `make_feature_unit` (several features may be batched into one unit when
/// they apply simultaneously), then `end_features`, and finally `build`.
pub(crate) struct PatternBuilder<'a> {
    font: Font<'a>,
    script_tag: Tag,
    language_tag: Tag,
    default_direction: TextDirection,
    feature_tags: Vec<Tag>,
    feature_units: Vec<FeatureUnit>,
    lookup_indices: Vec<u16>,
    feature_index: usize,
    feature_mask: u16,
    feature_kind: Option<FeatureKind>,
    gsub_unit_count: usize,
    gpos_unit_count: usize,
}

impl<'a> PatternBuilder<'a> {
    pub fn new(font: Font<'a>) -> Self {
        PatternBuilder {
            font,
            script_tag: Tag::default(),
            language_tag: Tag::default(),
            default_direction: TextDirection::LeftToRight,
            feature_tags: Vec::with_capacity(24),
            feature_units: Vec::with_capacity(24),
            lookup_indices: Vec::with_capacity(32),
            feature_index: 0,
            feature_mask: 0,
            feature_kind: None,
            gsub_unit_count: 0,
            gpos_unit_count: 0,
        }
    }

    pub fn set_script(&mut self, script_tag: Tag, default_direction: TextDirection) {
        self.script_tag = script_tag;
        self.default_direction = default_direction;
    }

    pub fn set_language(&mut self, language_tag: Tag) {
        self.language_tag = language_tag;
    }

    pub fn begin_features(&mut self, kind: FeatureKind) {
        // one kind of features must be ended before beginning new ones
        debug_assert!(self.feature_kind.is_none());

        self.feature_kind = Some(kind);
    }

    pub fn add_feature(&mut self, feature_tag: Tag, feature_mask: u16) {
        // the kind of features must be specified before adding them
        debug_assert!(self.feature_kind.is_some());
        // only unique features can be added
        debug_assert!(!self.feature_tags.contains(&feature_tag));

        self.feature_tags.push(feature_tag);
        self.feature_mask |= feature_mask;
    }

    pub fn add_lookup(&mut self, lookup_index: u16) {
        // a feature must be available before adding lookups
        debug_assert!(self.feature_tags.len() > self.feature_index);

        if !self.lookup_indices.contains(&lookup_index) {
            self.lookup_indices.push(lookup_index);
        }
    }

    /// Close the current unit over the features added since the last one.
    ///
    /// Lookup indices are sorted ascending so the text processor applies
    /// them in lookup-list order.
    pub fn make_feature_unit(&mut self) {
        // at least one feature must be available before making a unit
        debug_assert!(self.feature_tags.len() > self.feature_index);

        let mut lookup_indices = std::mem::take(&mut self.lookup_indices);
        lookup_indices.sort_unstable();

        let covered_start = self.feature_index;
        let covered_count = self.feature_tags.len() - self.feature_index;
        self.feature_units.push(FeatureUnit {
            covered_start,
            covered_count,
            feature_mask: self.feature_mask,
            lookup_indices,
        });

        match self.feature_kind {
            Some(FeatureKind::Substitution) => self.gsub_unit_count += 1,
            Some(FeatureKind::Positioning) => self.gpos_unit_count += 1,
            None => debug_assert!(false, "feature unit outside begin/end"),
        }

        self.feature_index += covered_count;
        self.lookup_indices = Vec::with_capacity(32);
        self.feature_mask = 0;
    }

    pub fn end_features(&mut self) {
        // the features of the specified kind must be begun before ending
        debug_assert!(self.feature_kind.is_some());
        // there should be no pending feature unit
        debug_assert_eq!(self.feature_tags.len(), self.feature_index);

        self.feature_kind = None;
    }

    pub fn build(self) -> Pattern<'a> {
        // all features must be ended before building the pattern
        debug_assert!(self.feature_kind.is_none());

        Pattern {
            font: self.font,
            script_tag: self.script_tag,
            language_tag: self.language_tag,
            default_direction: self.default_direction,
            feature_tags: self.feature_tags,
            feature_units: self.feature_units,
            gsub_unit_count: self.gsub_unit_count,
            gpos_unit_count: self.gpos_unit_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::empty_font_source;

    #[test]
    fn lookups_sorted_and_deduplicated() {
        let source = empty_font_source();
        let mut builder = PatternBuilder::new(Font::new(&source));
        builder.set_script(Tag::new(b"latn"), TextDirection::LeftToRight);
        builder.begin_features(FeatureKind::Substitution);
        builder.add_feature(Tag::new(b"liga"), 0);
        builder.add_lookup(9);
        builder.add_lookup(2);
        builder.add_lookup(9);
        builder.add_lookup(4);
        builder.make_feature_unit();
        builder.end_features();

        let pattern = builder.build();
        assert_eq!(pattern.gsub_unit_count, 1);
        assert_eq!(pattern.feature_units[0].lookup_indices, [2, 4, 9]);
    }

    #[test]
    fn simultaneous_features_share_a_unit() {
        let source = empty_font_source();
        let mut builder = PatternBuilder::new(Font::new(&source));
        builder.begin_features(FeatureKind::Substitution);
        builder.add_feature(Tag::new(b"init"), 0x2);
        builder.add_lookup(1);
        builder.add_feature(Tag::new(b"fina"), 0x8);
        builder.add_lookup(3);
        builder.make_feature_unit();
        builder.add_feature(Tag::new(b"liga"), 0);
        builder.add_lookup(5);
        builder.make_feature_unit();
        builder.end_features();
        builder.begin_features(FeatureKind::Positioning);
        builder.add_feature(Tag::new(b"kern"), 0);
        builder.add_lookup(0);
        builder.make_feature_unit();
        builder.end_features();

        let pattern = builder.build();
        assert_eq!(pattern.gsub_unit_count, 2);
        assert_eq!(pattern.gpos_unit_count, 1);
        assert_eq!(pattern.feature_units[0].covered_count, 2);
        assert_eq!(pattern.feature_units[0].feature_mask, 0xA);
        assert_eq!(pattern.feature_units[1].covered_start, 2);
        assert_eq!(
            pattern.feature_tags(),
            [
                Tag::new(b"init"),
                Tag::new(b"fina"),
                Tag::new(b"liga"),
                Tag::new(b"kern")
            ]
        );
    }
}
