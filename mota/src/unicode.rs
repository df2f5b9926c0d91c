//! Joining-type and general-category data for joining-script shaping.
//!
//! The shaping engine only consults Unicode properties in one place: the
//! Arabic engine's joining-form assignment. The tables here cover the
//! Arabic blocks, the joining controls, and the combining-mark and format
//! ranges that the default-transparency rule needs; they are not a general
//! Unicode property database.

/// The joining type of a code point, per the Arabic shaping rules.
///
/// Code points absent from the joining data carry [`JoiningType::F`]
/// ("unlisted") and are resolved by general category: nonspacing marks,
/// enclosing marks and format characters join transparently, everything
/// else is non-joining.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoiningType {
    /// Non-joining.
    U,
    /// Left-joining.
    L,
    /// Right-joining.
    R,
    /// Dual-joining.
    D,
    /// Join-causing.
    C,
    /// Transparent.
    T,
    /// Unlisted; resolve through the general category.
    F,
}

/// One row of joining data: an inclusive code-point range and its type.
struct JoiningRange {
    first: u32,
    last: u32,
    joining_type: JoiningType,
}

const fn row(first: u32, last: u32, joining_type: JoiningType) -> JoiningRange {
    JoiningRange {
        first,
        last,
        joining_type,
    }
}

/// Joining types for the Arabic block, Arabic Supplement, and the joining
/// controls, sorted by code point.
#[rustfmt::skip]
static JOINING_RANGES: [JoiningRange; 47] = [
    row(0x0600, 0x0605, JoiningType::U), // number signs
    row(0x0610, 0x061A, JoiningType::T),
    row(0x061C, 0x061C, JoiningType::T), // arabic letter mark
    row(0x0620, 0x0620, JoiningType::D),
    row(0x0621, 0x0621, JoiningType::U), // hamza
    row(0x0622, 0x0625, JoiningType::R),
    row(0x0626, 0x0626, JoiningType::D),
    row(0x0627, 0x0627, JoiningType::R), // alef
    row(0x0628, 0x0628, JoiningType::D), // beh
    row(0x0629, 0x0629, JoiningType::R), // teh marbuta
    row(0x062A, 0x062E, JoiningType::D),
    row(0x062F, 0x0632, JoiningType::R), // dal..zain
    row(0x0633, 0x063F, JoiningType::D),
    row(0x0640, 0x0640, JoiningType::C), // tatweel
    row(0x0641, 0x0647, JoiningType::D),
    row(0x0648, 0x0648, JoiningType::R), // waw
    row(0x0649, 0x064A, JoiningType::D), // alef maksura, yeh
    row(0x064B, 0x065F, JoiningType::T), // harakat
    row(0x0660, 0x0669, JoiningType::U), // digits
    row(0x066A, 0x066D, JoiningType::U),
    row(0x066E, 0x066F, JoiningType::D),
    row(0x0670, 0x0670, JoiningType::T), // superscript alef
    row(0x0671, 0x0673, JoiningType::R),
    row(0x0674, 0x0674, JoiningType::U), // high hamza
    row(0x0675, 0x0677, JoiningType::R),
    row(0x0678, 0x0687, JoiningType::D),
    row(0x0688, 0x0699, JoiningType::R),
    row(0x069A, 0x06BF, JoiningType::D),
    row(0x06C0, 0x06C0, JoiningType::R),
    row(0x06C1, 0x06C2, JoiningType::D),
    row(0x06C3, 0x06CB, JoiningType::R),
    row(0x06CC, 0x06CC, JoiningType::D), // farsi yeh
    row(0x06CD, 0x06CD, JoiningType::R),
    row(0x06CE, 0x06CE, JoiningType::D),
    row(0x06CF, 0x06CF, JoiningType::R),
    row(0x06D0, 0x06D1, JoiningType::D),
    row(0x06D2, 0x06D3, JoiningType::R), // yeh barree
    row(0x06D4, 0x06D4, JoiningType::U),
    row(0x06D5, 0x06D5, JoiningType::R),
    row(0x06D6, 0x06DC, JoiningType::T),
    row(0x06DD, 0x06DD, JoiningType::U), // end of ayah
    row(0x06DE, 0x06DE, JoiningType::U),
    row(0x06DF, 0x06E4, JoiningType::T),
    row(0x06E5, 0x06E6, JoiningType::U),
    row(0x06E7, 0x06E8, JoiningType::T),
    row(0x06E9, 0x06E9, JoiningType::U),
    row(0x06EA, 0x06ED, JoiningType::T),
];

/// Additional joining rows outside the Arabic block.
#[rustfmt::skip]
static JOINING_RANGES_EXTRA: [JoiningRange; 4] = [
    row(0x0750, 0x077F, JoiningType::D), // arabic supplement (predominantly dual)
    row(0x08A0, 0x08B4, JoiningType::D),
    row(0x200C, 0x200C, JoiningType::U), // zero width non-joiner
    row(0x200D, 0x200D, JoiningType::C), // zero width joiner
];

fn search(ranges: &[JoiningRange], codepoint: u32) -> Option<JoiningType> {
    ranges
        .binary_search_by(|range| {
            if range.last < codepoint {
                std::cmp::Ordering::Less
            } else if range.first > codepoint {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .ok()
        .map(|index| ranges[index].joining_type)
}

/// Look up the joining type of a code point.
pub fn joining_type(codepoint: u32) -> JoiningType {
    search(&JOINING_RANGES, codepoint)
        .or_else(|| search(&JOINING_RANGES_EXTRA, codepoint))
        .unwrap_or(JoiningType::F)
}

/// Ranges of nonspacing marks, enclosing marks and format characters that
/// may plausibly occur in a joining-script run, sorted by code point.
#[rustfmt::skip]
static TRANSPARENT_RANGES: [(u32, u32); 14] = [
    (0x00AD, 0x00AD), // soft hyphen
    (0x0300, 0x036F), // combining diacritical marks
    (0x0483, 0x0489),
    (0x0591, 0x05BD),
    (0x05BF, 0x05BF),
    (0x0711, 0x0711),
    (0x0730, 0x074A),
    (0x07A6, 0x07B0),
    (0x200B, 0x200F), // zero width space .. right-to-left mark
    (0x202A, 0x202E), // embedding controls
    (0x2060, 0x2064),
    (0xFE00, 0xFE0F), // variation selectors
    (0xFE20, 0xFE2F),
    (0xFEFF, 0xFEFF), // zero width no-break space
];

/// `true` if the code point's general category is Nonspacing Mark,
/// Enclosing Mark, or Format.
///
/// Only the ranges relevant to joining-script runs are covered.
pub fn is_transparent_category(codepoint: u32) -> bool {
    TRANSPARENT_RANGES
        .binary_search_by(|&(first, last)| {
            if last < codepoint {
                std::cmp::Ordering::Less
            } else if first > codepoint {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// The joining type used by the shaping engine: unlisted code points
/// resolve to transparent or non-joining by general category.
pub fn resolved_joining_type(codepoint: u32) -> JoiningType {
    match joining_type(codepoint) {
        JoiningType::F => {
            if is_transparent_category(codepoint) {
                JoiningType::T
            } else {
                JoiningType::U
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arabic_letters() {
        assert_eq!(joining_type(0x0628), JoiningType::D); // beh
        assert_eq!(joining_type(0x064A), JoiningType::D); // yeh
        assert_eq!(joining_type(0x0627), JoiningType::R); // alef
        assert_eq!(joining_type(0x0621), JoiningType::U); // hamza
        assert_eq!(joining_type(0x0640), JoiningType::C); // tatweel
        assert_eq!(joining_type(0x064B), JoiningType::T); // fathatan
    }

    #[test]
    fn unlisted_resolution() {
        assert_eq!(resolved_joining_type('a' as u32), JoiningType::U);
        assert_eq!(resolved_joining_type(0x0301), JoiningType::T); // combining acute
        assert_eq!(resolved_joining_type(0x200D), JoiningType::C);
        assert_eq!(resolved_joining_type(0x200C), JoiningType::U);
    }
}
