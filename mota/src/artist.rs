//! The artist: binding text, pattern and direction into a shaping run.

use raw::types::Tag;

use crate::album::Album;
use crate::codepoints::EncodedText;
use crate::engine::ShapingEngine;
use crate::knowledge;
use crate::pattern::Pattern;

/// The visual direction of a run.
///
/// The engine performs no bidirectional analysis; the caller supplies the
/// resolved direction of each run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// The order in which the text's code points are processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextMode {
    #[default]
    Forward,
    Backward,
}

/// Binds a pattern, a code-point sequence, a direction and a mode, and
/// drives one shaping run into a caller-supplied album.
#[derive(Default)]
pub struct Artist<'a> {
    text: Option<EncodedText<'a>>,
    pattern: Option<&'a Pattern<'a>>,
    text_direction: TextDirection,
    text_mode: TextMode,
}

impl<'a> Artist<'a> {
    /// Create an artist with no text or pattern bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default text direction of a script, from shaping knowledge;
    /// left-to-right for unknown scripts.
    pub fn default_direction_for_script(script_tag: Tag) -> TextDirection {
        knowledge::script_knowledge(script_tag)
            .map(|knowledge| knowledge.default_direction)
            .unwrap_or_default()
    }

    /// Bind the text to shape.
    pub fn set_text(&mut self, text: EncodedText<'a>) {
        self.text = Some(text);
    }

    /// Bind the compiled shaping plan.
    pub fn set_pattern(&mut self, pattern: &'a Pattern<'a>) {
        self.pattern = Some(pattern);
    }

    /// Set the visual direction of the run.
    pub fn set_text_direction(&mut self, text_direction: TextDirection) {
        self.text_direction = text_direction;
    }

    /// Set the processing order of the run.
    pub fn set_text_mode(&mut self, text_mode: TextMode) {
        self.text_mode = text_mode;
    }

    /// Shape the bound text into the album.
    ///
    /// With no pattern or no text bound, the album is reset to empty.
    pub fn fill_album(&self, album: &mut Album) {
        let (Some(pattern), Some(text)) = (self.pattern, self.text) else {
            album.reset(0);
            return;
        };
        if text.is_empty() {
            album.reset(0);
            return;
        }

        album.reset(text.len());
        let engine = ShapingEngine::for_script(pattern.script_tag());
        engine.process_album(pattern, text, self.text_direction, self.text_mode, album);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directions() {
        assert_eq!(
            Artist::default_direction_for_script(Tag::new(b"arab")),
            TextDirection::RightToLeft
        );
        assert_eq!(
            Artist::default_direction_for_script(Tag::new(b"latn")),
            TextDirection::LeftToRight
        );
        assert_eq!(
            Artist::default_direction_for_script(Tag::new(b"zzzz")),
            TextDirection::LeftToRight
        );
    }

    #[test]
    fn unbound_artist_empties_the_album() {
        let mut album = Album::new();
        let artist = Artist::new();
        artist.fill_album(&mut album);
        assert_eq!(album.glyph_count(), 0);
        assert_eq!(album.codeunit_count(), 0);
    }
}
