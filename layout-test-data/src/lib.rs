//! Shared test data for the workspace.
//!
//! Binary layout tables in tests are assembled by hand with [`BeBuffer`];
//! keeping the builder here lets the parsing and shaping crates share one
//! way of writing fixtures.

mod bebuffer;

pub use bebuffer::{BeBuffer, ToBeBytes};
