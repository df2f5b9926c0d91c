//! What the engine knows about scripts, independent of any font.

use raw::types::Tag;

use crate::artist::TextDirection;
use crate::{arabic, engine};

/// How a feature participates in shaping when the font provides it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FeatureBehavior {
    /// Always applied; the script is incorrect without it.
    Required,
    /// Applied unless the caller turns it off.
    On,
    /// Not applied unless the caller turns it on.
    Off,
}

/// One feature a script's shaping uses, in implementation order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FeatureInfo {
    pub feature_tag: Tag,
    pub behavior: FeatureBehavior,
    /// The glyph feature-mask bits that select this feature per position;
    /// zero for features applied everywhere.
    pub feature_mask: u16,
}

pub(crate) const fn feature(tag: &[u8; 4], behavior: FeatureBehavior, mask: u16) -> FeatureInfo {
    FeatureInfo {
        feature_tag: Tag::new(tag),
        behavior,
        feature_mask: mask,
    }
}

/// A range of [`FeatureInfo`]s whose lookups must be applied together as
/// one feature unit.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FeatureRange {
    pub start: usize,
    pub count: usize,
}

/// Everything the engine knows about shaping one script.
pub(crate) struct ScriptKnowledge {
    pub default_direction: TextDirection,
    /// Features in implementation order.
    pub feature_infos: &'static [FeatureInfo],
    /// Ranges of features that must be applied simultaneously; features
    /// outside every range form one unit each.
    pub simultaneous_ranges: &'static [FeatureRange],
}

/// The knowledge for the given script, consulting every engine.
pub(crate) fn script_knowledge(script_tag: Tag) -> Option<&'static ScriptKnowledge> {
    arabic::script_knowledge(script_tag).or_else(|| engine::standard_script_knowledge(script_tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_scripts() {
        assert!(script_knowledge(Tag::new(b"arab")).is_some());
        assert!(script_knowledge(Tag::new(b"latn")).is_some());
        assert!(script_knowledge(Tag::new(b"cyrl")).is_some());
        assert!(script_knowledge(Tag::new(b"zzzz")).is_none());
    }

    #[test]
    fn directions() {
        assert_eq!(
            script_knowledge(Tag::new(b"arab")).unwrap().default_direction,
            TextDirection::RightToLeft
        );
        assert_eq!(
            script_knowledge(Tag::new(b"grek")).unwrap().default_direction,
            TextDirection::LeftToRight
        );
    }
}
