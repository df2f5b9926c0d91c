//! Shaping engine selection and the standard engine.

use raw::types::Tag;

use crate::album::Album;
use crate::arabic;
use crate::artist::{TextDirection, TextMode};
use crate::codepoints::EncodedText;
use crate::knowledge::{feature, FeatureBehavior, FeatureInfo, ScriptKnowledge};
use crate::pattern::Pattern;
use crate::processor::TextProcessor;

#[rustfmt::skip]
static STANDARD_FEATURE_INFOS: [FeatureInfo; 7] = [
    // language based forms
    feature(b"ccmp", FeatureBehavior::On, 0),
    // typographical forms
    feature(b"liga", FeatureBehavior::On, 0),
    feature(b"clig", FeatureBehavior::On, 0),
    // positioning features
    feature(b"dist", FeatureBehavior::Required, 0),
    feature(b"kern", FeatureBehavior::On,       0),
    feature(b"mark", FeatureBehavior::Required, 0),
    feature(b"mkmk", FeatureBehavior::Required, 0),
];

static STANDARD_SCRIPT_KNOWLEDGE: ScriptKnowledge = ScriptKnowledge {
    default_direction: TextDirection::LeftToRight,
    feature_infos: &STANDARD_FEATURE_INFOS,
    simultaneous_ranges: &[],
};

/// The knowledge of the standard engine, which shapes the scripts that need
/// no joining analysis.
pub(crate) fn standard_script_knowledge(script_tag: Tag) -> Option<&'static ScriptKnowledge> {
    match &script_tag.to_be_bytes() {
        b"armn" | b"cyrl" | b"geor" | b"grek" | b"latn" | b"ogam" | b"runr" => {
            Some(&STANDARD_SCRIPT_KNOWLEDGE)
        }
        _ => None,
    }
}

/// The script-specific engines, dispatched over one operation: processing
/// an album.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ShapingEngine {
    Standard,
    Arabic,
}

impl ShapingEngine {
    /// Select the engine for a script.
    pub fn for_script(script_tag: Tag) -> ShapingEngine {
        if arabic::script_knowledge(script_tag).is_some() {
            ShapingEngine::Arabic
        } else {
            ShapingEngine::Standard
        }
    }

    /// Run one shaping pass over the album.
    pub fn process_album(
        &self,
        pattern: &Pattern,
        text: EncodedText,
        text_direction: TextDirection,
        text_mode: TextMode,
        album: &mut Album,
    ) {
        let mut processor = TextProcessor::new(pattern, album, text, text_direction, text_mode);
        processor.discover_glyphs();
        if let ShapingEngine::Arabic = self {
            let text = processor.text();
            arabic::put_feature_masks(processor.album_mut(), text);
        }
        processor.substitute_glyphs();
        processor.position_glyphs();
        processor.wrap_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_selection() {
        assert_eq!(
            ShapingEngine::for_script(Tag::new(b"arab")),
            ShapingEngine::Arabic
        );
        assert_eq!(
            ShapingEngine::for_script(Tag::new(b"latn")),
            ShapingEngine::Standard
        );
        // unknown scripts run the plain pipeline
        assert_eq!(
            ShapingEngine::for_script(Tag::new(b"zzzz")),
            ShapingEngine::Standard
        );
    }
}
