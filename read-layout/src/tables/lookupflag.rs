//! The lookup flag type.
//!
//! This is kind-of-but-not-quite-exactly a bit enumeration, and so we
//! implement it manually.

/// The [LookupFlag](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#lookupFlag) bit enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupFlag(u16);

impl LookupFlag {
    /// This bit relates only to the correct processing of the cursive
    /// attachment lookup type (GPOS lookup type 3).
    ///
    /// When this bit is set, the last glyph in a given sequence to which the
    /// cursive attachment lookup is applied, will be positioned on the
    /// baseline.
    pub const RIGHT_TO_LEFT: Self = LookupFlag(0x0001);
    /// If set, skips over base glyphs.
    pub const IGNORE_BASE_GLYPHS: Self = LookupFlag(0x0002);
    /// If set, skips over ligatures.
    pub const IGNORE_LIGATURES: Self = LookupFlag(0x0004);
    /// If set, skips over all combining marks.
    pub const IGNORE_MARKS: Self = LookupFlag(0x0008);
    /// If set, indicates that the lookup table structure is followed by a
    /// MarkFilteringSet field.
    ///
    /// The layout engine skips over all mark glyphs not in the mark
    /// filtering set indicated.
    pub const USE_MARK_FILTERING_SET: Self = LookupFlag(0x0010);

    /// Return new, empty flags.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Construct flags from a raw value, keeping all bits.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw transmutation to u16.
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// `true` if all the bits of `other` are set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two flag values.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// The flags of `self` with the bits of `other` cleared.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// If not zero, skips over all marks of attachment class different from
    /// the returned value.
    pub const fn mark_attachment_class(self) -> u16 {
        self.0 >> 8
    }

    /// Set the mark attachment class stored in the high byte.
    pub fn set_mark_attachment_class(&mut self, class: u16) {
        self.0 = (self.0 & 0x00FF) | ((class & 0xFF) << 8);
    }
}

impl types::Scalar for LookupFlag {
    type Raw = <u16 as types::Scalar>::Raw;

    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(<u16>::from_raw(raw))
    }
}

impl types::FixedSize for LookupFlag {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_queries() {
        let flag = LookupFlag::from_bits(0x0009);
        assert!(flag.contains(LookupFlag::RIGHT_TO_LEFT));
        assert!(flag.contains(LookupFlag::IGNORE_MARKS));
        assert!(!flag.contains(LookupFlag::IGNORE_LIGATURES));
        assert_eq!(flag.mark_attachment_class(), 0);
    }

    #[test]
    fn mark_attachment_class() {
        let mut flag = LookupFlag::empty();
        flag.set_mark_attachment_class(3);
        assert_eq!(flag.mark_attachment_class(), 3);
        assert_eq!(flag.to_bits(), 0x0300);
        assert_eq!(
            flag.union(LookupFlag::IGNORE_LIGATURES)
                .difference(LookupFlag::IGNORE_LIGATURES),
            flag
        );
    }
}
