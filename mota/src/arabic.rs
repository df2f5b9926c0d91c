//! The Arabic shaping engine: joining-form assignment.

use raw::types::Tag;

use crate::album::Album;
use crate::artist::TextDirection;
use crate::codepoints::EncodedText;
use crate::knowledge::{feature, FeatureBehavior, FeatureInfo, ScriptKnowledge};
use crate::unicode::{resolved_joining_type, JoiningType};

/// The glyph feature-mask bits selecting the Arabic joining forms.
pub(crate) mod feature_mask {
    pub const NONE: u16 = 0;
    pub const ISOLATED: u16 = 1 << 0;
    pub const INITIAL: u16 = 1 << 1;
    pub const MEDIAL: u16 = 1 << 2;
    pub const FINAL: u16 = 1 << 3;
}

#[rustfmt::skip]
static ARABIC_FEATURE_INFOS: [FeatureInfo; 15] = [
    // language based forms
    feature(b"ccmp", FeatureBehavior::Required, feature_mask::NONE),
    feature(b"isol", FeatureBehavior::Required, feature_mask::ISOLATED),
    feature(b"fina", FeatureBehavior::Required, feature_mask::FINAL),
    feature(b"medi", FeatureBehavior::Required, feature_mask::MEDIAL),
    feature(b"init", FeatureBehavior::Required, feature_mask::INITIAL),
    feature(b"rlig", FeatureBehavior::Required, feature_mask::NONE),
    feature(b"calt", FeatureBehavior::Required, feature_mask::NONE),
    // typographical forms
    feature(b"liga", FeatureBehavior::On,       feature_mask::NONE),
    feature(b"dlig", FeatureBehavior::Off,      feature_mask::NONE),
    feature(b"cswh", FeatureBehavior::Off,      feature_mask::NONE),
    feature(b"mset", FeatureBehavior::Required, feature_mask::NONE),
    // positioning features
    feature(b"curs", FeatureBehavior::Required, feature_mask::NONE),
    feature(b"mark", FeatureBehavior::Required, feature_mask::NONE),
    feature(b"mkmk", FeatureBehavior::Required, feature_mask::NONE),
    feature(b"kern", FeatureBehavior::Required, feature_mask::NONE),
];

static ARABIC_SCRIPT_KNOWLEDGE: ScriptKnowledge = ScriptKnowledge {
    default_direction: TextDirection::RightToLeft,
    feature_infos: &ARABIC_FEATURE_INFOS,
    simultaneous_ranges: &[],
};

pub(crate) fn script_knowledge(script_tag: Tag) -> Option<&'static ScriptKnowledge> {
    if script_tag == Tag::new(b"arab") {
        Some(&ARABIC_SCRIPT_KNOWLEDGE)
    } else {
        None
    }
}

fn joining_type_at(album: &Album, text: EncodedText, index: usize) -> JoiningType {
    let association = album.association(index);
    text.codepoint_at(association)
        .map(resolved_joining_type)
        .unwrap_or(JoiningType::U)
}

/// Assign a joining-form feature mask to every position of the album.
///
/// The album must hold the discovered glyphs, one per code point, with no
/// substitutions applied yet. Transparent code points are skipped by the
/// scan and keep the empty-sentinel mask, so masked lookups never target
/// them.
pub(crate) fn put_feature_masks(album: &mut Album, text: EncodedText) {
    let length = album.glyph_count();
    if length == 0 {
        return;
    }

    let mut index = 0;
    let mut prior = JoiningType::U;
    let mut joining = Some(joining_type_at(album, text, 0));

    while let Some(mut current) = joining {
        let mut feature_mask = feature_mask::NONE;

        // the joining type of the next non-transparent character
        let mut next_joining: Option<JoiningType> = None;
        let mut next_index = index;
        while next_index + 1 < length {
            next_index += 1;
            match joining_type_at(album, text, next_index) {
                JoiningType::T => continue,
                JoiningType::C => {
                    next_joining = Some(JoiningType::D);
                    break;
                }
                other => {
                    next_joining = Some(other);
                    break;
                }
            }
        }
        if next_joining.is_none() {
            next_index = length;
        }

        let joins_next = matches!(next_joining, Some(JoiningType::R | JoiningType::D));
        loop {
            match current {
                JoiningType::R => {
                    feature_mask = if prior == JoiningType::D {
                        feature_mask::FINAL
                    } else {
                        feature_mask::ISOLATED
                    };
                }
                JoiningType::D => {
                    feature_mask = match (prior == JoiningType::D, joins_next) {
                        (true, true) => feature_mask::MEDIAL,
                        (true, false) => feature_mask::FINAL,
                        (false, true) => feature_mask::INITIAL,
                        (false, false) => feature_mask::ISOLATED,
                    };
                }
                // can only occur at the head of the run; treated as dual
                // joining
                JoiningType::C => {
                    current = JoiningType::D;
                    continue;
                }
                // can only occur at the head of the run; treated as if
                // there were no character
                JoiningType::T => {
                    current = JoiningType::U;
                }
                _ => {}
            }
            break;
        }

        album.set_feature_mask(index, feature_mask);

        prior = current;
        index = next_index;
        joining = next_joining;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::GlyphTraits;
    use raw::types::GlyphId16;

    const BEH: u32 = 0x0628;
    const YEH: u32 = 0x064A;
    const ALEF: u32 = 0x0627;
    const HAMZA: u32 = 0x0621;
    const FATHA: u32 = 0x064E;

    fn discovered_album(text: EncodedText) -> Album {
        let mut album = Album::new();
        album.reset(text.len());
        album.begin_filling();
        let mut offset = 0;
        while let Some(_) = text.codepoint_at(offset) {
            album.add_glyph(GlyphId16::new(1), GlyphTraits::NONE, offset);
            offset += 1;
        }
        album
    }

    fn masks_for(codepoints: &[u32]) -> Vec<u16> {
        let text = EncodedText::Utf32(codepoints);
        let mut album = discovered_album(text);
        put_feature_masks(&mut album, text);
        (0..album.glyph_count())
            .map(|index| album.feature_mask(index))
            .collect()
    }

    #[test]
    fn dual_joining_pair() {
        assert_eq!(
            masks_for(&[BEH, YEH]),
            [feature_mask::INITIAL, feature_mask::FINAL]
        );
    }

    #[test]
    fn medial_run() {
        assert_eq!(
            masks_for(&[BEH, YEH, BEH]),
            [
                feature_mask::INITIAL,
                feature_mask::MEDIAL,
                feature_mask::FINAL
            ]
        );
    }

    #[test]
    fn right_joining_breaks_the_run() {
        // alef joins only to the right: beh takes its initial form, alef
        // its final, and the following beh starts over
        assert_eq!(
            masks_for(&[BEH, ALEF, BEH]),
            [
                feature_mask::INITIAL,
                feature_mask::FINAL,
                feature_mask::ISOLATED
            ]
        );
    }

    #[test]
    fn non_joining_is_isolated() {
        assert_eq!(
            masks_for(&[HAMZA, BEH]),
            [feature_mask::NONE, feature_mask::ISOLATED]
        );
    }

    #[test]
    fn transparent_marks_keep_the_sentinel() {
        let masks = masks_for(&[BEH, FATHA, YEH]);
        assert_eq!(masks[0], feature_mask::INITIAL);
        assert_eq!(masks[1], u16::MAX);
        assert_eq!(masks[2], feature_mask::FINAL);
    }

    #[test]
    fn assignment_is_idempotent() {
        let codepoints = [BEH, FATHA, YEH, ALEF, HAMZA];
        let text = EncodedText::Utf32(&codepoints);
        let mut album = discovered_album(text);
        put_feature_masks(&mut album, text);
        let first: Vec<_> = (0..album.glyph_count())
            .map(|index| album.feature_mask(index))
            .collect();
        put_feature_masks(&mut album, text);
        let second: Vec<_> = (0..album.glyph_count())
            .map(|index| album.feature_mask(index))
            .collect();
        assert_eq!(first, second);
    }
}
