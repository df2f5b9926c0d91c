//! mota is a shaping engine for OpenType fonts.
//!
//! Shaping turns a sequence of Unicode code points into a positioned
//! sequence of glyphs by running the font's `GSUB` and `GPOS` rules. The
//! engine is organized around a handful of cooperating pieces:
//!
//! - an [`Album`]: the working buffer of one shaping run, holding glyphs,
//!   their details, positions and advances;
//! - a [`Pattern`]: an immutable, compiled shaping plan for one
//!   (font, script, language) triple, built by a [`Scheme`];
//! - an [`Artist`]: binds a pattern, a string and a direction, and drives
//!   one shaping run into a caller-supplied album.
//!
//! The font itself is abstracted behind the [`FontSource`] trait, so any
//! table store (a memory-mapped file, a test fixture) can be shaped from.

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::doc_markdown)]

/// Public re-export of the table parsing crate.
pub extern crate read_layout as raw;

mod album;
mod arabic;
mod artist;
mod codepoints;
mod context;
mod engine;
mod font;
mod gpos;
mod gsub;
mod knowledge;
mod locator;
mod pattern;
mod processor;
mod scheme;
pub mod unicode;

pub use album::{Album, GlyphTraits};
pub use artist::{Artist, TextDirection, TextMode};
pub use codepoints::EncodedText;
pub use font::{Font, FontLayout, FontSource};
pub use pattern::Pattern;
pub use scheme::Scheme;

/// Type for a glyph identifier.
pub type GlyphId = raw::types::GlyphId16;

/// Type for a four-byte OpenType tag.
pub type Tag = raw::types::Tag;

/// Type for a glyph offset or anchor point.
pub type Point = raw::types::Point<i32>;
