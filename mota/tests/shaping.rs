//! End-to-end shaping scenarios over hand-assembled layout tables.

use std::collections::HashMap;

use layout_test_data::BeBuffer;
use pretty_assertions::assert_eq;
use mota::{
    Album, Artist, EncodedText, Font, FontLayout, FontSource, GlyphId, GlyphTraits, Scheme, Tag,
    TextDirection, TextMode,
};

/// A font backed by hand-assembled tables and explicit mappings.
struct TestFont {
    tables: HashMap<Tag, Vec<u8>>,
    cmap: HashMap<u32, u16>,
    advances: HashMap<u16, i32>,
}

impl TestFont {
    fn new() -> Self {
        TestFont {
            tables: HashMap::new(),
            cmap: HashMap::new(),
            advances: HashMap::new(),
        }
    }

    fn with_table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.tables.insert(Tag::new(tag), data);
        self
    }

    fn with_glyph(mut self, codepoint: u32, glyph: u16, advance: i32) -> Self {
        self.cmap.insert(codepoint, glyph);
        self.advances.insert(glyph, advance);
        self
    }

    fn with_advance(mut self, glyph: u16, advance: i32) -> Self {
        self.advances.insert(glyph, advance);
        self
    }
}

impl FontSource for TestFont {
    fn table_data(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.get(&tag).map(|data| data.as_slice())
    }

    fn glyph_for_codepoint(&self, codepoint: u32) -> GlyphId {
        GlyphId::new(self.cmap.get(&codepoint).copied().unwrap_or_default())
    }

    fn glyph_advance(&self, _layout: FontLayout, glyph: GlyphId) -> i32 {
        self.advances.get(&glyph.to_u16()).copied().unwrap_or_default()
    }
}

fn shape(
    font: &TestFont,
    script: &[u8; 4],
    text: EncodedText,
    direction: TextDirection,
    mode: TextMode,
) -> Album {
    let font = Font::new(font);
    let mut scheme = Scheme::new();
    scheme.set_font(font);
    scheme.set_script(Tag::new(script));
    let pattern = scheme.build_pattern().expect("script should be shapable");

    let mut artist = Artist::new();
    artist.set_text(text);
    artist.set_pattern(&pattern);
    artist.set_text_direction(direction);
    artist.set_text_mode(mode);

    let mut album = Album::new();
    artist.fill_album(&mut album);
    album
}

// ---- table assembly ----

fn coverage(glyphs: &[u16]) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(glyphs.len() as u16)
        .extend(glyphs.iter().copied())
        .into_vec()
}

/// A lookup table wrapping the given subtables.
fn lookup(lookup_type: u16, lookup_flag: u16, subtables: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(lookup_type)
        .push(lookup_flag)
        .push(subtables.len() as u16);
    let mut offset = 6 + subtables.len() * 2;
    for subtable in subtables {
        buf = buf.push(offset as u16);
        offset += subtable.len();
    }
    for subtable in subtables {
        buf = buf.extend(subtable.iter().copied());
    }
    buf.into_vec()
}

/// A complete `GSUB`/`GPOS` table: one script with its default language
/// system, one feature record per entry, and the given lookups.
fn layout_table(script: &[u8; 4], features: &[(&[u8; 4], &[u16])], lookups: &[Vec<u8>]) -> Vec<u8> {
    // script list: one script, default language system listing every
    // feature
    let script_list = BeBuffer::new()
        .push(1u16)
        .push(*script)
        .push(8u16)
        // script table at offset 8
        .push(4u16) // default langsys offset
        .push(0u16) // langsys record count
        // langsys at offset 4 of the script table
        .push(0u16)
        .push(0xFFFFu16)
        .push(features.len() as u16)
        .extend(0..features.len() as u16)
        .into_vec();

    let mut feature_list = BeBuffer::new().push(features.len() as u16);
    let mut feature_offset = 2 + features.len() * 6;
    for (tag, lookup_indices) in features {
        feature_list = feature_list.push(**tag).push(feature_offset as u16);
        feature_offset += 4 + lookup_indices.len() * 2;
    }
    for (_, lookup_indices) in features {
        feature_list = feature_list
            .push(0u16)
            .push(lookup_indices.len() as u16)
            .extend(lookup_indices.iter().copied());
    }
    let feature_list = feature_list.into_vec();

    let mut lookup_list = BeBuffer::new().push(lookups.len() as u16);
    let mut lookup_offset = 2 + lookups.len() * 2;
    for table in lookups {
        lookup_list = lookup_list.push(lookup_offset as u16);
        lookup_offset += table.len();
    }
    for table in lookups {
        lookup_list = lookup_list.extend(table.iter().copied());
    }
    let lookup_list = lookup_list.into_vec();

    let script_list_offset = 10;
    let feature_list_offset = script_list_offset + script_list.len();
    let lookup_list_offset = feature_list_offset + feature_list.len();
    BeBuffer::new()
        .push(1u16)
        .push(0u16)
        .push(script_list_offset as u16)
        .push(feature_list_offset as u16)
        .push(lookup_list_offset as u16)
        .extend(script_list)
        .extend(feature_list)
        .extend(lookup_list)
        .into_vec()
}

/// A version 1.0 `GDEF` with a glyph class definition.
fn gdef_with_classes(classes: &[(u16, u16)]) -> Vec<u8> {
    let mut class_def = BeBuffer::new().push(2u16).push(classes.len() as u16);
    for (glyph, class) in classes {
        class_def = class_def.push(*glyph).push(*glyph).push(*class);
    }
    BeBuffer::new()
        .push(1u16)
        .push(0u16)
        .push(12u16) // glyph class def
        .push(0u16) // attach list
        .push(0u16) // lig caret list
        .push(0u16) // mark attach class def
        .extend(class_def.into_vec())
        .into_vec()
}

/// Single substitution format 2 mapping `inputs[i]` to `outputs[i]`.
fn single_subst(inputs: &[u16], outputs: &[u16]) -> Vec<u8> {
    let coverage_offset = 6 + outputs.len() * 2;
    BeBuffer::new()
        .push(2u16)
        .push(coverage_offset as u16)
        .push(outputs.len() as u16)
        .extend(outputs.iter().copied())
        .extend(coverage(inputs))
        .into_vec()
}

/// Ligature substitution: `first` followed by `rest` becomes `ligature`.
fn ligature_subst(first: u16, rest: &[u16], ligature: u16) -> Vec<u8> {
    let coverage_offset = 16 + rest.len() * 2;
    BeBuffer::new()
        .push(1u16)
        .push(coverage_offset as u16)
        .push(1u16) // ligature set count
        .push(8u16) // ligature set offset
        // ligature set at 8
        .push(1u16)
        .push(4u16)
        // ligature at 12
        .push(ligature)
        .push(rest.len() as u16 + 1)
        .extend(rest.iter().copied())
        .extend(coverage(&[first]))
        .into_vec()
}

/// Pair adjustment format 1 applying `x_advance` to `first` before
/// `second`.
fn pair_pos(first: u16, second: u16, x_advance: i16) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(18u16) // coverage offset
        .push(0x0004u16) // value format 1: x advance
        .push(0u16) // value format 2
        .push(1u16) // pair set count
        .push(12u16) // pair set offset
        // pair set at 12
        .push(1u16)
        .push(second)
        .push(x_advance)
        .extend(coverage(&[first]))
        .into_vec()
}

/// Multiple substitution: one covered glyph becomes `outputs`.
fn multiple_subst(input: u16, outputs: &[u16]) -> Vec<u8> {
    let coverage_offset = 8 + 2 + outputs.len() * 2;
    BeBuffer::new()
        .push(1u16)
        .push(coverage_offset as u16)
        .push(1u16) // sequence count
        .push(8u16) // sequence offset
        // sequence at 8
        .push(outputs.len() as u16)
        .extend(outputs.iter().copied())
        .extend(coverage(&[input]))
        .into_vec()
}

/// An extension subtable wrapping `inner` of the given lookup type.
fn extension(inner_lookup_type: u16, inner: Vec<u8>) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(inner_lookup_type)
        .push(8u32)
        .extend(inner)
        .into_vec()
}

fn anchor(x: i16, y: i16) -> Vec<u8> {
    BeBuffer::new().push(1u16).push(x).push(y).into_vec()
}

/// Mark-to-base attachment with a single mark class.
fn mark_base_pos(
    mark: u16,
    base: u16,
    mark_anchor: (i16, i16),
    base_anchor: (i16, i16),
) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(12u16) // mark coverage offset
        .push(18u16) // base coverage offset
        .push(1u16) // mark class count
        .push(24u16) // mark array offset
        .push(36u16) // base array offset
        .extend(coverage(&[mark]))
        .extend(coverage(&[base]))
        // mark array at 24: one record, class 0, anchor at 6
        .push(1u16)
        .push(0u16)
        .push(6u16)
        .extend(anchor(mark_anchor.0, mark_anchor.1))
        // base array at 36: one base, one class, anchor at 4
        .push(1u16)
        .push(4u16)
        .extend(anchor(base_anchor.0, base_anchor.1))
        .into_vec()
}

/// Cursive attachment over two glyphs: `first` carries an exit anchor,
/// `second` an entry anchor.
fn cursive_pos(first: u16, second: u16, exit: (i16, i16), entry: (i16, i16)) -> Vec<u8> {
    let coverage_offset = 6 + 2 * 4;
    let anchors_start = coverage_offset + coverage(&[first, second]).len();
    BeBuffer::new()
        .push(1u16)
        .push(coverage_offset as u16)
        .push(2u16) // entry exit count
        // first: no entry, exit anchor
        .push(0u16)
        .push(anchors_start as u16)
        // second: entry anchor, no exit
        .push((anchors_start + 6) as u16)
        .push(0u16)
        .extend(coverage(&[first, second]))
        .extend(anchor(exit.0, exit.1))
        .extend(anchor(entry.0, entry.1))
        .into_vec()
}

/// Chained context format 3: one backtrack, two input and one lookahead
/// coverage, dispatching `nested_lookup` at input position 0.
fn chain_context(backtrack: u16, input: (u16, u16), lookahead: u16, nested_lookup: u16) -> Vec<u8> {
    // format, counts and offsets: 2 + (2 + 2) + (2 + 4) + (2 + 2) + 2 + 4
    let header_len = 22;
    let coverage_len = coverage(&[0]).len(); // single-glyph format 1 coverage
    BeBuffer::new()
        .push(3u16)
        .push(1u16) // backtrack glyph count
        .push(header_len as u16)
        .push(2u16) // input glyph count
        .push((header_len + coverage_len) as u16)
        .push((header_len + coverage_len * 2) as u16)
        .push(1u16) // lookahead glyph count
        .push((header_len + coverage_len * 3) as u16)
        .push(1u16) // seq lookup count
        .push(0u16) // sequence index
        .push(nested_lookup)
        .extend(coverage(&[backtrack]))
        .extend(coverage(&[input.0]))
        .extend(coverage(&[input.1]))
        .extend(coverage(&[lookahead]))
        .into_vec()
}

// ---- scenarios ----

#[test]
fn latin_ligature() {
    const F: u16 = 1;
    const I: u16 = 2;
    const FI: u16 = 100;

    let gsub = layout_table(
        b"latn",
        &[(b"liga", &[0])],
        &[lookup(4, 0, &[ligature_subst(F, &[I], FI)])],
    );
    let font = TestFont::new()
        .with_table(b"GSUB", gsub)
        .with_glyph('f' as u32, F, 400)
        .with_glyph('i' as u32, I, 250)
        .with_advance(FI, 600);

    let album = shape(
        &font,
        b"latn",
        EncodedText::Utf8(b"fi"),
        TextDirection::LeftToRight,
        TextMode::Forward,
    );

    assert_eq!(album.glyph_count(), 2);
    assert_eq!(
        album.glyph_ids(),
        [GlyphId::new(FI), GlyphId::new(0)]
    );
    assert!(album.glyph_traits(1).contains(GlyphTraits::PLACEHOLDER));
    assert_eq!(album.codeunit_to_glyph_map(), [0, 0]);
    assert_eq!(album.glyph_advances(), [600, 0]);
}

#[test]
fn arabic_joining_forms() {
    const BEH: u32 = 0x0628;
    const YEH: u32 = 0x064A;
    const BEH_NOMINAL: u16 = 10;
    const YEH_NOMINAL: u16 = 11;
    const BEH_INIT: u16 = 20;
    const YEH_FINA: u16 = 21;
    const BEH_ISOL: u16 = 30;
    const YEH_ISOL: u16 = 31;

    let gsub = layout_table(
        b"arab",
        &[(b"isol", &[0]), (b"fina", &[1]), (b"init", &[2])],
        &[
            lookup(
                1,
                0,
                &[single_subst(
                    &[BEH_NOMINAL, YEH_NOMINAL],
                    &[BEH_ISOL, YEH_ISOL],
                )],
            ),
            lookup(1, 0, &[single_subst(&[YEH_NOMINAL], &[YEH_FINA])]),
            lookup(1, 0, &[single_subst(&[BEH_NOMINAL], &[BEH_INIT])]),
        ],
    );
    let font = TestFont::new()
        .with_table(b"GSUB", gsub)
        .with_glyph(BEH, BEH_NOMINAL, 300)
        .with_glyph(YEH, YEH_NOMINAL, 310);

    let codepoints = [BEH, YEH];
    let album = shape(
        &font,
        b"arab",
        EncodedText::Utf32(&codepoints),
        TextDirection::RightToLeft,
        TextMode::Forward,
    );

    // the initial and final forms fire; the isolated forms do not
    assert_eq!(
        album.glyph_ids(),
        [GlyphId::new(BEH_INIT), GlyphId::new(YEH_FINA)]
    );
}

#[test]
fn kerning_pair() {
    const A: u16 = 1;
    const V: u16 = 2;

    let gpos = layout_table(
        b"latn",
        &[(b"kern", &[0])],
        &[lookup(2, 0, &[pair_pos(A, V, -120)])],
    );
    let font = TestFont::new()
        .with_table(b"GPOS", gpos)
        .with_glyph('A' as u32, A, 500)
        .with_glyph('V' as u32, V, 480);

    let album = shape(
        &font,
        b"latn",
        EncodedText::Utf8(b"AV"),
        TextDirection::LeftToRight,
        TextMode::Forward,
    );

    assert_eq!(album.glyph_advances(), [500 - 120, 480]);
    assert_eq!(album.glyph_offsets()[0], mota::Point::new(0, 0));
    assert_eq!(album.glyph_offsets()[1], mota::Point::new(0, 0));
}

#[test]
fn mark_to_base() {
    const A: u16 = 1;
    const ACUTE: u16 = 3;
    const COMBINING_ACUTE: u32 = 0x0301;

    let gpos = layout_table(
        b"latn",
        &[(b"mark", &[0])],
        &[lookup(4, 0, &[mark_base_pos(ACUTE, A, (50, 0), (500, 700))])],
    );
    let font = TestFont::new()
        .with_table(b"GPOS", gpos)
        .with_table(b"GDEF", gdef_with_classes(&[(A, 1), (ACUTE, 3)]))
        .with_glyph('A' as u32, A, 500)
        .with_glyph(COMBINING_ACUTE, ACUTE, 0);

    let codepoints = ['A' as u32, COMBINING_ACUTE];
    let album = shape(
        &font,
        b"latn",
        EncodedText::Utf32(&codepoints),
        TextDirection::LeftToRight,
        TextMode::Forward,
    );

    assert!(album.glyph_traits(1).contains(GlyphTraits::ATTACHED));
    // the mark lands on the base anchor, pulled back by the base's advance
    assert_eq!(
        album.glyph_offsets()[1],
        mota::Point::new(500 - 50 - 500, 700)
    );
    assert_eq!(album.glyph_offsets()[0], mota::Point::new(0, 0));
    assert_eq!(album.glyph_advances(), [500, 0]);
}

#[test]
fn cursive_attachment() {
    const BEH_INIT: u32 = 0x0628;
    const YEH_FINA: u32 = 0x064A;
    const FIRST: u16 = 5;
    const SECOND: u16 = 6;

    let gpos = layout_table(
        b"arab",
        &[(b"curs", &[0])],
        &[lookup(3, 0, &[cursive_pos(FIRST, SECOND, (120, 40), (10, 15))])],
    );
    let font = TestFont::new()
        .with_table(b"GPOS", gpos)
        .with_glyph(BEH_INIT, FIRST, 300)
        .with_glyph(YEH_FINA, SECOND, 310);

    let codepoints = [BEH_INIT, YEH_FINA];
    let album = shape(
        &font,
        b"arab",
        EncodedText::Utf32(&codepoints),
        TextDirection::RightToLeft,
        TextMode::Forward,
    );

    // the first glyph now ends at its exit anchor; the second starts at
    // its entry anchor
    assert_eq!(album.glyph_advances()[0], 120);
    assert_eq!(album.glyph_offsets()[1].x, -10);
    assert_eq!(album.glyph_offsets()[1].y, 40 - 15);
    assert!(album.glyph_traits(0).contains(GlyphTraits::CURSIVE));
    assert!(album.glyph_traits(1).contains(GlyphTraits::CURSIVE));
    assert!(album.glyph_traits(0).contains(GlyphTraits::RESOLVED));
    assert!(album.glyph_traits(1).contains(GlyphTraits::RESOLVED));
    // the second glyph keeps its advance relative to the pen motion
    assert_eq!(album.glyph_advances()[1], 310 - 10);
}

#[test]
fn chained_context_substitution() {
    const X: u16 = 1;
    const A: u16 = 2;
    const B: u16 = 3;
    const Y: u16 = 4;
    const A_SWASH: u16 = 20;

    let gsub = layout_table(
        b"latn",
        &[(b"liga", &[0])],
        &[
            lookup(6, 0, &[chain_context(X, (A, B), Y, 1)]),
            lookup(1, 0, &[single_subst(&[A], &[A_SWASH])]),
        ],
    );
    let font = TestFont::new()
        .with_table(b"GSUB", gsub)
        .with_glyph('x' as u32, X, 100)
        .with_glyph('a' as u32, A, 200)
        .with_glyph('b' as u32, B, 300)
        .with_glyph('y' as u32, Y, 400);

    let album = shape(
        &font,
        b"latn",
        EncodedText::Utf8(b"xaby"),
        TextDirection::LeftToRight,
        TextMode::Forward,
    );

    assert_eq!(
        album.glyph_ids(),
        [
            GlyphId::new(X),
            GlyphId::new(A_SWASH),
            GlyphId::new(B),
            GlyphId::new(Y)
        ]
    );
    assert_eq!(album.glyph_advances(), [100, 200, 300, 400]);
}

#[test]
fn multiple_substitution() {
    const E_ACUTE: u32 = 0x00E9;
    const E_ACUTE_GLYPH: u16 = 5;
    const E: u16 = 1;
    const ACUTE: u16 = 3;

    let gsub = layout_table(
        b"latn",
        &[(b"ccmp", &[0])],
        &[lookup(2, 0, &[multiple_subst(E_ACUTE_GLYPH, &[E, ACUTE])])],
    );
    let font = TestFont::new()
        .with_table(b"GSUB", gsub)
        .with_glyph(E_ACUTE, E_ACUTE_GLYPH, 450)
        .with_advance(E, 440)
        .with_advance(ACUTE, 0);

    let codepoints = [E_ACUTE];
    let album = shape(
        &font,
        b"latn",
        EncodedText::Utf32(&codepoints),
        TextDirection::LeftToRight,
        TextMode::Forward,
    );

    assert_eq!(album.glyph_ids(), [GlyphId::new(E), GlyphId::new(ACUTE)]);
    // both glyphs derive from the one code point
    assert_eq!(album.codeunit_to_glyph_map(), [0]);
    assert_eq!(album.glyph_advances(), [440, 0]);
}

#[test]
fn extension_wrapped_kerning() {
    const A: u16 = 1;
    const V: u16 = 2;

    let gpos = layout_table(
        b"latn",
        &[(b"kern", &[0])],
        &[lookup(9, 0, &[extension(2, pair_pos(A, V, -80))])],
    );
    let font = TestFont::new()
        .with_table(b"GPOS", gpos)
        .with_glyph('A' as u32, A, 500)
        .with_glyph('V' as u32, V, 480);

    let album = shape(
        &font,
        b"latn",
        EncodedText::Utf8(b"AV"),
        TextDirection::LeftToRight,
        TextMode::Forward,
    );

    assert_eq!(album.glyph_advances(), [500 - 80, 480]);
}

#[test]
fn backward_mode_reverses_the_map() {
    const A: u16 = 1;
    const B: u16 = 2;

    // an empty-featured but valid GSUB so the pattern builds
    let gsub = layout_table(b"latn", &[(b"liga", &[])], &[]);
    let font = TestFont::new()
        .with_table(b"GSUB", gsub)
        .with_glyph('a' as u32, A, 100)
        .with_glyph('b' as u32, B, 100);

    let album = shape(
        &font,
        b"latn",
        EncodedText::Utf8(b"ab"),
        TextDirection::LeftToRight,
        TextMode::Backward,
    );

    assert_eq!(album.glyph_ids(), [GlyphId::new(B), GlyphId::new(A)]);
    assert_eq!(album.codeunit_to_glyph_map(), [1, 0]);
}
