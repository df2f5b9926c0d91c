//! Common scalar data types used in OpenType layout tables.
//!
//! Everything in a font file is big-endian; the types in this crate exist so
//! that the parsing crates can move between raw bytes and native values
//! without caring about byte order at each use site.

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::doc_markdown)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate core as std;

mod glyph_id;
mod offset;
mod point;
mod raw;
mod tag;

pub use glyph_id::GlyphId16;
pub use offset::{Offset, Offset16, Offset32};
pub use point::Point;
pub use raw::{BigEndian, FixedSize, RawBytes, Scalar};
pub use tag::{InvalidTag, Tag};
