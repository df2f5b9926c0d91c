//! Parsing OpenType layout tables.

#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

/// Public re-export of the shape-types crate.
pub extern crate shape_types as types;

mod font_data;
mod read;
pub mod tables;

pub use font_data::{Cursor, FontData};
pub use read::{FontRead, ReadError, ResolveOffset};
