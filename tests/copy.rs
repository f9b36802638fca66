//! End-to-end copy behavior over in-memory mock fonts, one per
//! representation.

use std::borrow::Cow;

use rustc_hash::FxHashMap;

use fontcopy::{
    copy_font, CidSystemInfo, CopyOptions, CopyStatus, Error, FontSource,
    FontType, GlyphData, GlyphId, GlyphInfo, GlyphSpace, Matrix, Metrics,
    OutlineHinting, Result, TrueTypeHinting, WritingMode,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn simple_info() -> GlyphInfo {
    GlyphInfo {
        widths: [0.5, 0.0],
        bbox: [0.0, 0.0, 0.5, 0.7],
        num_pieces: 0,
    }
}

// A name-keyed outline font.

struct OutlineGlyph {
    name: &'static [u8],
    data: &'static [u8],
}

struct MockOutlineFont {
    name: &'static [u8],
    glyphs: FxHashMap<u32, OutlineGlyph>,
    hinting: OutlineHinting,
    subrs: Vec<&'static [u8]>,
    encoding: FxHashMap<u32, u32>,
}

impl MockOutlineFont {
    fn new(
        name: &'static [u8],
        glyphs: &[(u32, &'static [u8], &'static [u8])],
    ) -> Self {
        let mut map = FxHashMap::default();
        for &(key, name, data) in glyphs {
            map.insert(key, OutlineGlyph { name, data });
        }
        MockOutlineFont {
            name,
            glyphs: map,
            hinting: OutlineHinting::default(),
            subrs: Vec::new(),
            encoding: FxHashMap::default(),
        }
    }

    fn lookup(&self, glyph: GlyphId) -> Result<&OutlineGlyph> {
        let GlyphId::Name(key) = glyph else {
            return Err(Error::Undefined);
        };
        self.glyphs.get(&key).ok_or(Error::Undefined)
    }
}

impl FontSource for MockOutlineFont {
    fn font_type(&self) -> FontType {
        FontType::Outline
    }

    fn font_name(&self) -> &[u8] {
        self.name
    }

    fn writing_mode(&self) -> WritingMode {
        WritingMode::Horizontal
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn enumerate_glyphs(
        &self,
        _space: GlyphSpace,
    ) -> Box<dyn Iterator<Item = GlyphId> + '_> {
        let mut keys: Vec<u32> = self.glyphs.keys().copied().collect();
        keys.sort_unstable();
        Box::new(keys.into_iter().map(GlyphId::Name))
    }

    fn glyph_name(&self, glyph: GlyphId) -> Result<Cow<'_, [u8]>> {
        self.lookup(glyph).map(|g| Cow::Borrowed(g.name))
    }

    fn glyph_data(&self, glyph: GlyphId) -> Result<GlyphData<'_>> {
        self.lookup(glyph).map(|g| GlyphData::new(g.data))
    }

    fn glyph_info(&self, glyph: GlyphId) -> Result<GlyphInfo> {
        self.lookup(glyph).map(|_| simple_info())
    }

    fn subr_data(&self, index: usize, global: bool) -> Result<Cow<'_, [u8]>> {
        if global {
            return Err(Error::Range);
        }
        self.subrs.get(index).map(|&s| Cow::Borrowed(s)).ok_or(Error::Range)
    }

    fn encode_char(&self, code: u32, _space: GlyphSpace) -> Option<GlyphId> {
        self.encoding.get(&code).map(|&key| GlyphId::Name(key))
    }

    fn outline_hinting(&self) -> Option<&OutlineHinting> {
        Some(&self.hinting)
    }
}

// An index-keyed TrueType-style font.

struct TtGlyph {
    name: Option<(u32, &'static [u8])>,
    data: &'static [u8],
    pieces: Vec<GlyphId>,
    metrics: Option<Metrics>,
}

struct MockTrueTypeFont {
    name: &'static [u8],
    glyphs: Vec<TtGlyph>,
    hinting: TrueTypeHinting,
    tables: &'static [u8],
    encoding: FxHashMap<u32, u32>,
}

impl MockTrueTypeFont {
    fn new(name: &'static [u8], glyphs: Vec<TtGlyph>) -> Self {
        MockTrueTypeFont {
            name,
            glyphs,
            hinting: TrueTypeHinting {
                units_per_em: 1000,
                ..Default::default()
            },
            tables: b"head+maxp",
            encoding: FxHashMap::default(),
        }
    }

    fn plain(name: Option<(u32, &'static [u8])>, data: &'static [u8]) -> TtGlyph {
        TtGlyph { name, data, pieces: Vec::new(), metrics: None }
    }

    fn gid(&self, glyph: GlyphId) -> Result<usize> {
        match glyph {
            GlyphId::Index(gid) => Ok(gid as usize),
            other => self
                .glyph_index(other)
                .map(|gid| gid as usize)
                .ok_or(Error::Undefined),
        }
    }

    fn lookup(&self, glyph: GlyphId) -> Result<&TtGlyph> {
        self.glyphs.get(self.gid(glyph)?).ok_or(Error::Undefined)
    }
}

impl FontSource for MockTrueTypeFont {
    fn font_type(&self) -> FontType {
        FontType::TrueType
    }

    fn font_name(&self) -> &[u8] {
        self.name
    }

    fn writing_mode(&self) -> WritingMode {
        WritingMode::Horizontal
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn enumerate_glyphs(
        &self,
        space: GlyphSpace,
    ) -> Box<dyn Iterator<Item = GlyphId> + '_> {
        match space {
            GlyphSpace::Name => Box::new(
                self.glyphs
                    .iter()
                    .filter_map(|g| g.name.map(|(key, _)| GlyphId::Name(key))),
            ),
            GlyphSpace::Index => Box::new(
                (0..self.glyphs.len()).map(|gid| GlyphId::Index(gid as u32)),
            ),
        }
    }

    fn glyph_name(&self, glyph: GlyphId) -> Result<Cow<'_, [u8]>> {
        self.lookup(glyph)?
            .name
            .map(|(_, name)| Cow::Borrowed(name))
            .ok_or(Error::Undefined)
    }

    fn glyph_data(&self, glyph: GlyphId) -> Result<GlyphData<'_>> {
        self.lookup(glyph).map(|g| GlyphData::new(g.data))
    }

    fn glyph_info(&self, glyph: GlyphId) -> Result<GlyphInfo> {
        let glyph = self.lookup(glyph)?;
        Ok(GlyphInfo { num_pieces: glyph.pieces.len(), ..simple_info() })
    }

    fn glyph_pieces(&self, glyph: GlyphId) -> Result<Vec<GlyphId>> {
        self.lookup(glyph).map(|g| g.pieces.clone())
    }

    fn glyph_metrics(
        &self,
        glyph: GlyphId,
        mode: WritingMode,
    ) -> Option<Metrics> {
        if mode == WritingMode::Vertical {
            return None;
        }
        self.lookup(glyph).ok()?.metrics
    }

    fn glyph_index(&self, glyph: GlyphId) -> Option<u32> {
        let GlyphId::Name(key) = glyph else { return None };
        self.glyphs
            .iter()
            .position(|g| g.name.map(|(k, _)| k) == Some(key))
            .map(|gid| gid as u32)
    }

    fn encode_char(&self, code: u32, _space: GlyphSpace) -> Option<GlyphId> {
        self.encoding.get(&code).map(|&key| GlyphId::Name(key))
    }

    fn stripped_tables(&self) -> Result<Vec<u8>> {
        Ok(self.tables.to_vec())
    }

    fn truetype_hinting(&self) -> Option<&TrueTypeHinting> {
        Some(&self.hinting)
    }
}

// A CID-keyed font with outline sub-fonts.

struct MockCidOutlineFont {
    name: &'static [u8],
    glyphs: FxHashMap<u32, (usize, &'static [u8])>,
    system: CidSystemInfo,
    subfonts: Vec<OutlineHinting>,
    subrs: Vec<Vec<&'static [u8]>>,
    global_subrs: Vec<&'static [u8]>,
}

impl MockCidOutlineFont {
    fn new(
        name: &'static [u8],
        glyphs: &[(u32, usize, &'static [u8])],
        subfont_count: usize,
    ) -> Self {
        let mut map = FxHashMap::default();
        for &(cid, subfont, data) in glyphs {
            map.insert(cid, (subfont, data));
        }
        MockCidOutlineFont {
            name,
            glyphs: map,
            system: CidSystemInfo {
                registry: b"Adobe".to_vec(),
                ordering: b"Japan1".to_vec(),
                supplement: 6,
            },
            subfonts: vec![OutlineHinting::default(); subfont_count],
            subrs: vec![Vec::new(); subfont_count],
            global_subrs: Vec::new(),
        }
    }
}

impl FontSource for MockCidOutlineFont {
    fn font_type(&self) -> FontType {
        FontType::CidOutline
    }

    fn font_name(&self) -> &[u8] {
        self.name
    }

    fn writing_mode(&self) -> WritingMode {
        WritingMode::Horizontal
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn max_cid(&self) -> u32 {
        self.glyphs.keys().copied().max().unwrap_or(0)
    }

    fn cid_system_info(&self) -> Option<&CidSystemInfo> {
        Some(&self.system)
    }

    fn enumerate_glyphs(
        &self,
        _space: GlyphSpace,
    ) -> Box<dyn Iterator<Item = GlyphId> + '_> {
        let mut cids: Vec<u32> = self.glyphs.keys().copied().collect();
        cids.sort_unstable();
        Box::new(cids.into_iter().map(GlyphId::Cid))
    }

    fn glyph_name(&self, _glyph: GlyphId) -> Result<Cow<'_, [u8]>> {
        Err(Error::Unregistered)
    }

    fn glyph_data(&self, glyph: GlyphId) -> Result<GlyphData<'_>> {
        let GlyphId::Cid(cid) = glyph else { return Err(Error::Undefined) };
        let &(subfont, data) =
            self.glyphs.get(&cid).ok_or(Error::Undefined)?;
        Ok(GlyphData { bytes: Cow::Borrowed(data), subfont })
    }

    fn glyph_info(&self, glyph: GlyphId) -> Result<GlyphInfo> {
        let GlyphId::Cid(cid) = glyph else { return Err(Error::Undefined) };
        self.glyphs.get(&cid).map(|_| simple_info()).ok_or(Error::Undefined)
    }

    fn subfont_count(&self) -> usize {
        self.subfonts.len()
    }

    fn subfont_name(&self, _index: usize) -> Option<&[u8]> {
        Some(b"sub")
    }

    fn subfont_hinting(&self, index: usize) -> Option<&OutlineHinting> {
        self.subfonts.get(index)
    }

    fn subfont_subr_data(
        &self,
        subfont: usize,
        index: usize,
        global: bool,
    ) -> Result<Cow<'_, [u8]>> {
        let set = if global {
            &self.global_subrs
        } else {
            self.subrs.get(subfont).ok_or(Error::Range)?
        };
        set.get(index).map(|&s| Cow::Borrowed(s)).ok_or(Error::Range)
    }
}

// A CID-keyed font resolved through a CID-to-index map.

struct MockCidTrueTypeFont {
    name: &'static [u8],
    glyphs: Vec<Option<&'static [u8]>>,
    cid_to_gid: FxHashMap<u32, u32>,
    system: CidSystemInfo,
    hinting: TrueTypeHinting,
}

impl MockCidTrueTypeFont {
    fn new(name: &'static [u8], glyphs: Vec<Option<&'static [u8]>>) -> Self {
        MockCidTrueTypeFont {
            name,
            glyphs,
            cid_to_gid: FxHashMap::default(),
            system: CidSystemInfo {
                registry: b"Adobe".to_vec(),
                ordering: b"Identity".to_vec(),
                supplement: 0,
            },
            hinting: TrueTypeHinting {
                units_per_em: 1000,
                ..Default::default()
            },
        }
    }

    fn lookup(&self, glyph: GlyphId) -> Result<&'static [u8]> {
        let number = match glyph {
            GlyphId::Cid(cid) => self.glyph_index(glyph).unwrap_or(cid),
            GlyphId::Index(gid) => gid,
            GlyphId::Name(_) => return Err(Error::Undefined),
        };
        self.glyphs
            .get(number as usize)
            .copied()
            .flatten()
            .ok_or(Error::Undefined)
    }
}

impl FontSource for MockCidTrueTypeFont {
    fn font_type(&self) -> FontType {
        FontType::CidTrueType
    }

    fn font_name(&self) -> &[u8] {
        self.name
    }

    fn writing_mode(&self) -> WritingMode {
        WritingMode::Horizontal
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn cid_count(&self) -> u32 {
        self.glyphs.len() as u32
    }

    fn cid_system_info(&self) -> Option<&CidSystemInfo> {
        Some(&self.system)
    }

    fn enumerate_glyphs(
        &self,
        _space: GlyphSpace,
    ) -> Box<dyn Iterator<Item = GlyphId> + '_> {
        Box::new(
            self.glyphs
                .iter()
                .enumerate()
                .filter(|(_, data)| data.is_some())
                .map(|(cid, _)| GlyphId::Cid(cid as u32)),
        )
    }

    fn glyph_name(&self, _glyph: GlyphId) -> Result<Cow<'_, [u8]>> {
        Err(Error::Unregistered)
    }

    fn glyph_data(&self, glyph: GlyphId) -> Result<GlyphData<'_>> {
        self.lookup(glyph).map(GlyphData::new)
    }

    fn glyph_info(&self, glyph: GlyphId) -> Result<GlyphInfo> {
        self.lookup(glyph).map(|_| simple_info())
    }

    fn glyph_index(&self, glyph: GlyphId) -> Option<u32> {
        let GlyphId::Cid(cid) = glyph else { return None };
        self.cid_to_gid.get(&cid).copied()
    }

    fn stripped_tables(&self) -> Result<Vec<u8>> {
        Ok(b"head+maxp".to_vec())
    }

    fn truetype_hinting(&self) -> Option<&TrueTypeHinting> {
        Some(&self.hinting)
    }
}

const NOTDEF: u32 = 1;
const A: u32 = 2;
const M: u32 = 3;
const Z: u32 = 4;

fn test_outline_font() -> MockOutlineFont {
    MockOutlineFont::new(
        b"TestSerif",
        &[
            (NOTDEF, b".notdef", b"nd"),
            (A, b"a", b"outline-a"),
            (M, b"m", b"outline-m"),
            (Z, b"z", b"outline-z"),
        ],
    )
}

#[test]
fn copying_a_glyph_twice_is_idempotent() {
    let source = test_outline_font();
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();

    let options = CopyOptions::default();
    let first = copied.copy_glyph(&source, GlyphId::Name(A), options).unwrap();
    assert_eq!(first, CopyStatus::Added);
    let second =
        copied.copy_glyph(&source, GlyphId::Name(A), options).unwrap();
    assert_eq!(second, CopyStatus::AlreadyPresent);

    let data = copied.glyph_data(GlyphId::Name(A)).unwrap();
    assert_eq!(data.bytes.as_ref(), b"outline-a");
}

#[test]
fn redefinition_conflicts_are_rejected() {
    let source = test_outline_font();
    let mut other = test_outline_font();
    other.glyphs.get_mut(&A).unwrap().data = b"different";

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied
        .copy_glyph(&source, GlyphId::Name(A), CopyOptions::default())
        .unwrap();

    // Same key, different bytes.
    assert_eq!(
        copied.copy_glyph(&other, GlyphId::Name(A), CopyOptions::default()),
        Err(Error::InvalidAccess)
    );
    // Identical bytes are still a conflict when the caller demands a fresh
    // definition.
    let must_be_new = CopyOptions { must_be_new: true, ..Default::default() };
    assert_eq!(
        copied.copy_glyph(&source, GlyphId::Name(A), must_be_new),
        Err(Error::InvalidAccess)
    );
    assert_eq!(
        copied.glyph_data(GlyphId::Name(A)).unwrap().bytes.as_ref(),
        b"outline-a"
    );
}

#[test]
fn complete_copy_round_trips_the_glyph_set() {
    init_logging();
    let source = test_outline_font();
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied.copy_font_complete(&source).unwrap();

    let mut copied_keys: Vec<GlyphId> =
        copied.enumerate_glyphs(GlyphSpace::Name).collect();
    copied_keys.sort();
    let source_keys: Vec<GlyphId> =
        source.enumerate_glyphs(GlyphSpace::Name).collect();
    assert_eq!(copied_keys, source_keys);

    for glyph in source_keys {
        assert_eq!(
            copied.glyph_name(glyph).unwrap(),
            source.glyph_name(glyph).unwrap()
        );
        assert_eq!(
            copied.glyph_data(glyph).unwrap().bytes,
            source.glyph_data(glyph).unwrap().bytes
        );
    }
}

#[test]
fn encoding_survives_a_complete_copy() {
    let mut source = test_outline_font();
    source.encoding.insert(97, A);
    source.encoding.insert(122, Z);

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied.copy_font_complete(&source).unwrap();

    assert_eq!(
        copied.encode_char(97, GlyphSpace::Name),
        Some(GlyphId::Name(A))
    );
    assert_eq!(
        copied.encode_char(122, GlyphSpace::Name),
        Some(GlyphId::Name(Z))
    );
    assert_eq!(copied.encode_char(98, GlyphSpace::Name), None);
    assert_eq!(copied.encoded_chars().count(), 2);

    // Remapping a code to the same glyph is fine, to another glyph not.
    copied.add_encoding(97, GlyphId::Name(A)).unwrap();
    assert_eq!(
        copied.add_encoding(97, GlyphId::Name(M)),
        Err(Error::InvalidAccess)
    );
}

#[test]
fn ordering_sorts_enumeration_by_name() {
    let source = test_outline_font();
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied.copy_font_complete(&source).unwrap();
    copied.order_font().unwrap();

    let ordered: Vec<GlyphId> =
        copied.enumerate_glyphs(GlyphSpace::Name).collect();
    // ".notdef" < "a" < "m" < "z" byte-wise.
    assert_eq!(
        ordered,
        vec![
            GlyphId::Name(NOTDEF),
            GlyphId::Name(A),
            GlyphId::Name(M),
            GlyphId::Name(Z),
        ]
    );
}

#[test]
fn mutation_after_ordering_is_rejected() {
    let source = test_outline_font();
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied
        .copy_glyph(&source, GlyphId::Name(A), CopyOptions::default())
        .unwrap();
    copied.order_font().unwrap();

    assert_eq!(
        copied.copy_glyph(&source, GlyphId::Name(M), CopyOptions::default()),
        Err(Error::InvalidAccess)
    );
    assert_eq!(
        copied.add_encoding(97, GlyphId::Name(A)),
        Err(Error::InvalidAccess)
    );
}

#[test]
fn subroutines_are_copied_verbatim() {
    let mut source = test_outline_font();
    source.subrs = vec![b"flex", b"", b"hint-replacement"];

    let copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    assert_eq!(copied.subr_data(0, false).unwrap().as_ref(), b"flex");
    assert_eq!(copied.subr_data(1, false).unwrap().as_ref(), b"");
    assert_eq!(
        copied.subr_data(2, false).unwrap().as_ref(),
        b"hint-replacement"
    );
    assert_eq!(copied.subr_data(3, false), Err(Error::Range));
    assert_eq!(copied.subr_digest().unwrap(), source.subr_digest().unwrap());
}

#[test]
fn notdef_is_copied_eagerly() {
    let source = test_outline_font();
    let copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    assert_eq!(copied.get_notdef(), Some(GlyphId::Name(NOTDEF)));
    assert!(copied.glyph_data(GlyphId::Name(NOTDEF)).is_ok());

    let tt = MockTrueTypeFont::new(
        b"TestSans",
        vec![
            MockTrueTypeFont::plain(None, b"tt-notdef"),
            MockTrueTypeFont::plain(Some((A, b"a")), b"tt-a"),
        ],
    );
    let copied = copy_font(&tt, Matrix::IDENTITY, None).unwrap();
    assert_eq!(copied.get_notdef(), Some(GlyphId::Index(0)));
    assert_eq!(
        copied.glyph_data(GlyphId::Index(0)).unwrap().bytes.as_ref(),
        b"tt-notdef"
    );
}

#[test]
fn composite_glyphs_pull_their_pieces() {
    let mut glyphs = vec![
        MockTrueTypeFont::plain(None, b"tt-notdef"),
        MockTrueTypeFont::plain(None, b"base"),
        MockTrueTypeFont::plain(None, b"accent"),
        MockTrueTypeFont::plain(Some((A, b"abreve")), b"composite"),
    ];
    glyphs[3].pieces = vec![GlyphId::Index(1), GlyphId::Index(2)];
    let source = MockTrueTypeFont::new(b"TestSans", glyphs);

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    let by_index = CopyOptions { by_index: true, ..Default::default() };
    copied.copy_glyph(&source, GlyphId::Index(3), by_index).unwrap();

    assert_eq!(
        copied.glyph_data(GlyphId::Index(1)).unwrap().bytes.as_ref(),
        b"base"
    );
    assert_eq!(
        copied.glyph_data(GlyphId::Index(2)).unwrap().bytes.as_ref(),
        b"accent"
    );
    assert_eq!(
        copied.glyph_pieces(GlyphId::Index(3)).unwrap(),
        vec![GlyphId::Index(1), GlyphId::Index(2)]
    );
}

#[test]
fn pieces_of_named_composites_get_name_entries() {
    let mut glyphs = vec![
        MockTrueTypeFont::plain(None, b"tt-notdef"),
        MockTrueTypeFont::plain(None, b"base"),
        MockTrueTypeFont::plain(Some((A, b"abreve")), b"composite"),
    ];
    glyphs[2].pieces = vec![GlyphId::Index(1)];
    let source = MockTrueTypeFont::new(b"TestSans", glyphs);

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied
        .copy_glyph(&source, GlyphId::Name(A), CopyOptions::default())
        .unwrap();

    // The nameless piece, copied by index, still gets a minted name entry
    // keyed by its glyph index.
    assert_eq!(
        copied.glyph_name(GlyphId::Index(1)).unwrap().as_ref(),
        b"gid1"
    );
    assert!(copied
        .enumerate_glyphs(GlyphSpace::Name)
        .any(|g| g == GlyphId::Index(1)));
}

#[test]
fn name_arrives_on_a_later_name_keyed_copy() {
    let source = MockTrueTypeFont::new(
        b"TestSans",
        vec![
            MockTrueTypeFont::plain(None, b"tt-notdef"),
            MockTrueTypeFont::plain(Some((A, b"a")), b"tt-a"),
        ],
    );
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();

    let by_index = CopyOptions { by_index: true, ..Default::default() };
    let first =
        copied.copy_glyph(&source, GlyphId::Index(1), by_index).unwrap();
    assert_eq!(first, CopyStatus::Added);

    // The name-keyed copy finds the data already present but must still
    // record the name.
    let second = copied
        .copy_glyph(&source, GlyphId::Name(A), CopyOptions::default())
        .unwrap();
    assert_eq!(second, CopyStatus::AlreadyPresent);
    assert_eq!(copied.glyph_name(GlyphId::Name(A)).unwrap().as_ref(), b"a");
    assert_eq!(
        copied.glyph_data(GlyphId::Name(A)).unwrap().bytes.as_ref(),
        b"tt-a"
    );
}

#[test]
fn failed_piece_rolls_back_the_whole_composite() {
    init_logging();
    let mut glyphs = vec![
        MockTrueTypeFont::plain(None, b"tt-notdef"),
        MockTrueTypeFont::plain(None, b"base"),
        MockTrueTypeFont::plain(None, b"composite"),
    ];
    // The second piece points outside the font.
    glyphs[2].pieces = vec![GlyphId::Index(1), GlyphId::Index(9)];
    let source = MockTrueTypeFont::new(b"TestSans", glyphs);

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    let by_index = CopyOptions { by_index: true, ..Default::default() };
    assert_eq!(
        copied.copy_glyph(&source, GlyphId::Index(2), by_index),
        Err(Error::Range)
    );

    // Both the composite and the piece it did add are gone again.
    assert_eq!(copied.glyph_data(GlyphId::Index(2)), Err(Error::Undefined));
    assert_eq!(copied.glyph_data(GlyphId::Index(1)), Err(Error::Undefined));
    // The eagerly copied .notdef is not part of the rollback.
    assert!(copied.glyph_data(GlyphId::Index(0)).is_ok());
}

#[test]
fn piece_chains_hit_the_depth_limit() {
    let mut glyphs: Vec<TtGlyph> =
        (0..9).map(|_| MockTrueTypeFont::plain(None, b"link")).collect();
    for gid in 1..8 {
        glyphs[gid].pieces = vec![GlyphId::Index(gid as u32 + 1)];
    }
    let source = MockTrueTypeFont::new(b"TestSans", glyphs);

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    let by_index = CopyOptions { by_index: true, ..Default::default() };
    assert_eq!(
        copied.copy_glyph(&source, GlyphId::Index(1), by_index),
        Err(Error::LimitExceeded)
    );
    assert_eq!(copied.glyph_data(GlyphId::Index(1)), Err(Error::Undefined));
}

#[test]
fn truetype_metrics_survive_the_copy() {
    let mut glyphs = vec![
        MockTrueTypeFont::plain(None, b"tt-notdef"),
        MockTrueTypeFont::plain(Some((A, b"a")), b"tt-a"),
    ];
    glyphs[1].metrics = Some(Metrics { advance: 0.5, side_bearing: 0.05 });
    let source = MockTrueTypeFont::new(b"TestSans", glyphs);

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied
        .copy_glyph(&source, GlyphId::Name(A), CopyOptions::default())
        .unwrap();

    let metrics = copied
        .glyph_metrics(GlyphId::Index(1), WritingMode::Horizontal)
        .unwrap();
    assert!((metrics.advance - 0.5).abs() < 1e-3);
    assert!((metrics.side_bearing - 0.05).abs() < 1e-3);
    assert_eq!(
        copied.glyph_metrics(GlyphId::Index(1), WritingMode::Vertical),
        None
    );
}

#[test]
fn stripped_tables_are_carried_over() {
    let source = MockTrueTypeFont::new(
        b"TestSans",
        vec![MockTrueTypeFont::plain(None, b"tt-notdef")],
    );
    let copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    assert_eq!(copied.stripped_tables().unwrap(), b"head+maxp");
    assert_eq!(copied.table_data(0, 4).unwrap(), b"head");
    assert_eq!(copied.table_data(usize::MAX, 2), Err(Error::Range));
}

#[test]
fn subfont_tags_round_trip() {
    let source = MockCidOutlineFont::new(
        b"TestMincho",
        &[(0, 0, b"cid-notdef"), (5, 1, b"cid-five")],
        2,
    );
    let copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    assert_eq!(copied.subfont_count(), 2);

    let mut target = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    target
        .copy_glyph(&source, GlyphId::Cid(5), CopyOptions::default())
        .unwrap();
    let data = target.glyph_data(GlyphId::Cid(5)).unwrap();
    assert_eq!(data.bytes.as_ref(), b"cid-five");
    assert_eq!(data.subfont, 1);
    assert_eq!(target.get_notdef(), Some(GlyphId::Cid(0)));
}

#[test]
fn cid_map_grows_as_cids_are_copied() {
    let mut glyphs = vec![None; 20];
    glyphs[0] = Some(b"nd".as_slice());
    glyphs[3] = Some(b"three".as_slice());
    glyphs[15] = Some(b"fifteen".as_slice());
    let source = MockCidTrueTypeFont::new(b"TestGothic", glyphs);

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied
        .copy_glyph(&source, GlyphId::Cid(15), CopyOptions::default())
        .unwrap();

    assert_eq!(copied.glyph_index(GlyphId::Cid(15)), Some(15));
    assert_eq!(copied.glyph_index(GlyphId::Cid(3)), None);
    assert_eq!(
        copied.glyph_data(GlyphId::Cid(15)).unwrap().bytes.as_ref(),
        b"fifteen"
    );
    // Beyond the configured CID count.
    assert_eq!(
        copied.copy_glyph(&source, GlyphId::Cid(25), CopyOptions::default()),
        Err(Error::Range)
    );
}

#[test]
fn source_cid_translation_drives_the_map() {
    let mut source = MockCidTrueTypeFont::new(
        b"TestGothic",
        vec![Some(b"nd".as_slice()), None, Some(b"shared".as_slice())],
    );
    // Two CIDs resolve to the same source glyph.
    source.cid_to_gid.insert(7, 2);
    source.cid_to_gid.insert(8, 2);

    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    let first = copied
        .copy_glyph(&source, GlyphId::Cid(7), CopyOptions::default())
        .unwrap();
    assert_eq!(first, CopyStatus::Added);
    let second = copied
        .copy_glyph(&source, GlyphId::Cid(8), CopyOptions::default())
        .unwrap();
    assert_eq!(second, CopyStatus::AlreadyPresent);

    // Both CIDs share the translated slot instead of squatting on their
    // own numbers.
    assert_eq!(copied.glyph_index(GlyphId::Cid(7)), Some(2));
    assert_eq!(copied.glyph_index(GlyphId::Cid(8)), Some(2));
    assert_eq!(
        copied.glyph_data(GlyphId::Cid(7)).unwrap().bytes.as_ref(),
        b"shared"
    );
    assert_eq!(
        copied.glyph_data(GlyphId::Cid(8)).unwrap().bytes.as_ref(),
        b"shared"
    );
    assert_eq!(copied.glyph_data(GlyphId::Cid(2)), Err(Error::Undefined));
}

#[test]
fn compatibility_check_gates() {
    let source = test_outline_font();
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied.copy_font_complete(&source).unwrap();

    // Identity short-circuits.
    let set = [GlyphId::Name(A), GlyphId::Name(Z)];
    assert!(copied.can_copy_glyphs(&copied, &set, true).unwrap());

    // Same font again, through a fresh source object.
    assert!(copied.can_copy_glyphs(&source, &set, true).unwrap());

    // A different font type never merges.
    let tt = MockTrueTypeFont::new(
        b"TestSerif",
        vec![MockTrueTypeFont::plain(None, b"tt-notdef")],
    );
    assert!(!copied.can_copy_glyphs(&tt, &set, false).unwrap());

    // A shared glyph with different bytes never merges.
    let mut variant = test_outline_font();
    variant.glyphs.get_mut(&A).unwrap().data = b"different";
    assert!(!copied.can_copy_glyphs(&variant, &set, false).unwrap());

    // A different font name never merges either.
    let renamed = MockOutlineFont::new(b"OtherSerif", &[(A, b"a", b"x")]);
    assert!(!copied.can_copy_glyphs(&renamed, &set, false).unwrap());
}

#[test]
fn hinting_differences_block_merging() {
    let source = test_outline_font();
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied.copy_font_complete(&source).unwrap();

    let mut rehinted = test_outline_font();
    rehinted.hinting.blue_values = vec![-10.0, 0.0];
    let set = [GlyphId::Name(A)];
    assert!(!copied.can_copy_glyphs(&rehinted, &set, true).unwrap());
    // Without the hinting gate the same font still merges.
    assert!(copied.can_copy_glyphs(&rehinted, &set, false).unwrap());
}

#[test]
fn extension_glyph_copies_are_dropped() {
    let source = MockTrueTypeFont::new(
        b"TestSans",
        vec![
            MockTrueTypeFont::plain(None, b"tt-notdef"),
            MockTrueTypeFont::plain(Some((A, b"a")), b"same-outline"),
            MockTrueTypeFont::plain(Some((M, b"a~x~1")), b"same-outline"),
        ],
    );
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied.copy_font_complete(&source).unwrap();

    copied.drop_extension_glyphs().unwrap();
    assert!(copied.glyph_data(GlyphId::Name(A)).is_ok());
    assert_eq!(copied.glyph_data(GlyphId::Name(M)), Err(Error::Range));
    assert_eq!(copied.glyph_data(GlyphId::Index(2)), Err(Error::Undefined));
}

#[test]
fn extension_glyphs_only_fold_into_their_base() {
    let source = MockTrueTypeFont::new(
        b"TestSans",
        vec![
            MockTrueTypeFont::plain(None, b"tt-notdef"),
            MockTrueTypeFont::plain(Some((Z, b"z")), b"dup"),
            // Byte-identical to "z", but "z" is not its base name.
            MockTrueTypeFont::plain(Some((A, b"q~x~1")), b"dup"),
            MockTrueTypeFont::plain(Some((M, b"m~x~1")), b"lone"),
        ],
    );
    let mut copied = copy_font(&source, Matrix::IDENTITY, None).unwrap();
    copied.copy_font_complete(&source).unwrap();

    copied.drop_extension_glyphs().unwrap();

    // A coincidental byte match with an unrelated glyph is not a
    // duplicate; both extension glyphs survive with truncated names.
    assert!(copied.glyph_data(GlyphId::Name(A)).is_ok());
    assert_eq!(copied.glyph_name(GlyphId::Name(A)).unwrap().as_ref(), b"q");
    assert!(copied.glyph_data(GlyphId::Name(M)).is_ok());
    assert_eq!(copied.glyph_name(GlyphId::Name(M)).unwrap().as_ref(), b"m");
    assert_eq!(copied.glyph_name(GlyphId::Name(Z)).unwrap().as_ref(), b"z");
}
