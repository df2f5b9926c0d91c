//! The OpenType layout tables consumed by shaping.

pub mod gdef;
pub mod gpos;
pub mod gsub;
pub mod layout;
