//! Compiling a shaping plan from a font and script knowledge.

use raw::tables::layout::{Feature, FeatureList, LangSys, LayoutHeader};
use raw::types::Tag;

use crate::font::Font;
use crate::knowledge::{self, FeatureBehavior, ScriptKnowledge};
use crate::pattern::{FeatureKind, Pattern, PatternBuilder};

/// The default language-system tag.
pub const DFLT: Tag = Tag::new(b"DFLT");

/// Builds [`Pattern`]s by crossing the engine's script knowledge with the
/// features a font actually provides for a (script, language) pair.
pub struct Scheme<'a> {
    font: Option<Font<'a>>,
    script_tag: Tag,
    language_tag: Tag,
}

impl<'a> Scheme<'a> {
    /// Create a scheme with no font bound, selecting the default language
    /// system.
    pub fn new() -> Self {
        Scheme {
            font: None,
            script_tag: Tag::default(),
            language_tag: DFLT,
        }
    }

    pub fn set_font(&mut self, font: Font<'a>) {
        self.font = Some(font);
    }

    pub fn set_script(&mut self, script_tag: Tag) {
        self.script_tag = script_tag;
    }

    pub fn set_language(&mut self, language_tag: Tag) {
        self.language_tag = language_tag;
    }

    /// Compile the pattern for the configured font, script and language.
    ///
    /// Returns `None` when the engine has no knowledge of the script, when
    /// the font exposes neither `GSUB` nor `GPOS`, or when no exposed table
    /// lists the script.
    pub fn build_pattern(&self) -> Option<Pattern<'a>> {
        let font = self.font?;
        let knowledge = knowledge::script_knowledge(self.script_tag)?;

        let gsub = font.gsub();
        let gpos = font.gpos();
        if gsub.is_none() && gpos.is_none() {
            return None;
        }

        let mut builder = PatternBuilder::new(font);
        builder.set_script(self.script_tag, knowledge.default_direction);
        builder.set_language(self.language_tag);

        let mut script_found = false;
        if let Some(header) = gsub {
            builder.begin_features(FeatureKind::Substitution);
            script_found |= self.add_header_features(&mut builder, knowledge, &header);
            builder.end_features();
        }
        if let Some(header) = gpos {
            builder.begin_features(FeatureKind::Positioning);
            script_found |= self.add_header_features(&mut builder, knowledge, &header);
            builder.end_features();
        }
        if !script_found {
            return None;
        }

        Some(builder.build())
    }

    /// Add the features of one table; `true` if the table lists the script.
    fn add_header_features(
        &self,
        builder: &mut PatternBuilder<'a>,
        knowledge: &ScriptKnowledge,
        header: &LayoutHeader<'a>,
    ) -> bool {
        let Ok(script_list) = header.script_list() else {
            return false;
        };
        let Some(Ok(script)) = script_list.script_for_tag(self.script_tag) else {
            return false;
        };

        // an unlisted language tag falls back to the default language
        // system
        let lang_sys = if self.language_tag == DFLT {
            script.default_lang_sys()
        } else {
            script
                .lang_sys_for_tag(self.language_tag)
                .or_else(|| script.default_lang_sys())
        };
        let Some(Ok(lang_sys)) = lang_sys else {
            return false;
        };
        let Ok(feature_list) = header.feature_list() else {
            return false;
        };

        self.add_all_features(builder, knowledge, &lang_sys, &feature_list);
        true
    }

    /// Walk the knowledge's features in implementation order, grouping the
    /// simultaneous ranges into shared units.
    fn add_all_features(
        &self,
        builder: &mut PatternBuilder<'a>,
        knowledge: &ScriptKnowledge,
        lang_sys: &LangSys<'a>,
        feature_list: &FeatureList<'a>,
    ) {
        let feature_count = knowledge.feature_infos.len();
        let mut feature_index = 0;

        for range in knowledge.simultaneous_ranges {
            if range.start > feature_index {
                self.add_feature_range(
                    builder,
                    knowledge,
                    lang_sys,
                    feature_list,
                    feature_index,
                    range.start - feature_index,
                    false,
                );
            }
            self.add_feature_range(
                builder,
                knowledge,
                lang_sys,
                feature_list,
                range.start,
                range.count,
                true,
            );
            feature_index = range.start + range.count;
        }

        self.add_feature_range(
            builder,
            knowledge,
            lang_sys,
            feature_list,
            feature_index,
            feature_count - feature_index,
            false,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn add_feature_range(
        &self,
        builder: &mut PatternBuilder<'a>,
        knowledge: &ScriptKnowledge,
        lang_sys: &LangSys<'a>,
        feature_list: &FeatureList<'a>,
        index: usize,
        count: usize,
        simultaneous: bool,
    ) {
        let mut added_any = false;

        for info in &knowledge.feature_infos[index..index + count] {
            if info.behavior == FeatureBehavior::Off {
                continue;
            }
            let Some(feature) = search_feature(lang_sys, feature_list, info.feature_tag) else {
                continue;
            };

            builder.add_feature(info.feature_tag, info.feature_mask);
            for lookup_index in feature.lookup_list_indices() {
                builder.add_lookup(lookup_index.get());
            }
            added_any = true;

            if !simultaneous {
                builder.make_feature_unit();
            }
        }

        if simultaneous && added_any {
            builder.make_feature_unit();
        }
    }
}

impl Default for Scheme<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Find a feature of the language system by tag.
fn search_feature<'a>(
    lang_sys: &LangSys<'a>,
    feature_list: &FeatureList<'a>,
    feature_tag: Tag,
) -> Option<Feature<'a>> {
    for feature_index in lang_sys.feature_indices() {
        let Some(record) = feature_list.nth(feature_index.get()) else {
            continue;
        };
        if record.feature_tag() == feature_tag {
            return feature_list.feature(record).ok();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::empty_font_source;

    #[test]
    fn unknown_script_yields_no_pattern() {
        let source = empty_font_source();
        let mut scheme = Scheme::new();
        scheme.set_font(Font::new(&source));
        scheme.set_script(Tag::new(b"zzzz"));
        assert!(scheme.build_pattern().is_none());
    }

    #[test]
    fn missing_tables_yield_no_pattern() {
        let source = empty_font_source();
        let mut scheme = Scheme::new();
        scheme.set_font(Font::new(&source));
        scheme.set_script(Tag::new(b"latn"));
        assert!(scheme.build_pattern().is_none());
    }
}
