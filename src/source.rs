//! The capability interface a font must offer to be copied.
//!
//! The engine never parses a font file. Everything it needs — glyph bytes,
//! names, metrics, subroutines, encoding, stripped binary tables — is pulled
//! through [`FontSource`]. Copied fonts implement the trait themselves, which
//! is what makes cross-font comparison and re-copying uniform.

use std::borrow::Cow;

use crate::subrs;
use crate::{Error, FontType, GlyphId, Result};

/// Selects which key space a glyph enumeration or encoding lookup yields.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GlyphSpace {
    /// Name-keyed glyphs (CIDs for composite fonts, which have no names).
    Name,
    /// Raw glyph indices.
    Index,
}

/// Horizontal or vertical metrics selection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WritingMode {
    /// Horizontal advance semantics.
    Horizontal,
    /// Vertical advance semantics.
    Vertical,
}

impl WritingMode {
    /// The numeric index of this mode, 0 or 1.
    pub fn index(self) -> usize {
        match self {
            WritingMode::Horizontal => 0,
            WritingMode::Vertical => 1,
        }
    }
}

/// The raw bytes of one glyph, plus the sub-font it belongs to.
///
/// `subfont` is only meaningful for CID-keyed fonts with outline sub-fonts;
/// it is zero everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphData<'a> {
    /// The outline program bytes.
    pub bytes: Cow<'a, [u8]>,
    /// The index of the sub-font that interprets the bytes.
    pub subfont: usize,
}

impl<'a> GlyphData<'a> {
    /// Wrap borrowed bytes belonging to sub-font zero.
    pub fn new(bytes: &'a [u8]) -> Self {
        GlyphData { bytes: Cow::Borrowed(bytes), subfont: 0 }
    }
}

/// Shape summary of one glyph, used by the compatibility check.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GlyphInfo {
    /// Advance width per writing mode, in em units.
    pub widths: [f32; 2],
    /// Bounding box `[x_min, y_min, x_max, y_max]` in em units.
    pub bbox: [f32; 4],
    /// The number of component pieces for composite glyphs, zero otherwise.
    pub num_pieces: usize,
}

/// Side bearing and advance for one glyph and writing mode, in em units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Metrics {
    /// The advance width.
    pub advance: f32,
    /// The side bearing.
    pub side_bearing: f32,
}

/// Hinting parameters of a simple outline font.
///
/// Two fonts may share glyphs only if these compare equal; see
/// [`CopiedFont::can_copy_glyphs`](crate::CopiedFont::can_copy_glyphs).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutlineHinting {
    /// Charstring initial-bytes count.
    pub len_iv: i32,
    /// Overshoot suppression fuzz.
    pub blue_fuzz: f32,
    /// Overshoot suppression scale.
    pub blue_scale: f32,
    /// Overshoot suppression shift.
    pub blue_shift: f32,
    /// Primary alignment zones.
    pub blue_values: Vec<f32>,
    /// Secondary alignment zones.
    pub other_blues: Vec<f32>,
    /// Family primary alignment zones.
    pub family_blues: Vec<f32>,
    /// Family secondary alignment zones.
    pub family_other_blues: Vec<f32>,
    /// Counter expansion factor.
    pub expansion_factor: f32,
    /// Forced bolding at small sizes.
    pub force_bold: bool,
    /// Language group (0 latin, 1 ideographic).
    pub language_group: i32,
    /// Stem rounding direction.
    pub rnd_stem_up: bool,
    /// Dominant horizontal stem width.
    pub std_hw: Vec<f32>,
    /// Dominant vertical stem width.
    pub std_vw: Vec<f32>,
    /// Horizontal stem snap widths.
    pub stem_snap_h: Vec<f32>,
    /// Vertical stem snap widths.
    pub stem_snap_v: Vec<f32>,
    /// Multiple-master weight vector.
    pub weight_vector: Vec<f32>,
}

/// Hinting state of a TrueType-style font.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrueTypeHinting {
    /// Design units per em.
    pub units_per_em: u16,
    /// Maximum points in a simple glyph.
    pub max_points: u16,
    /// Maximum contours in a simple glyph.
    pub max_contours: u16,
    /// Maximum points in a composite glyph.
    pub max_composite_points: u16,
    /// Maximum contours in a composite glyph.
    pub max_composite_contours: u16,
    /// The control value program.
    pub prep: Vec<u8>,
    /// The control value table.
    pub cvt: Vec<u8>,
    /// The font program.
    pub fpgm: Vec<u8>,
}

impl TrueTypeHinting {
    /// Whether this font's interpreter limits cover `other`'s, so glyphs
    /// hinted for `other` execute safely here.
    pub fn covers(&self, other: &TrueTypeHinting) -> bool {
        self.max_points >= other.max_points
            && self.max_contours >= other.max_contours
            && self.max_composite_points >= other.max_composite_points
            && self.max_composite_contours >= other.max_composite_contours
    }

    /// Whether the hint programs and unit scale are identical.
    pub fn same_programs(&self, other: &TrueTypeHinting) -> bool {
        self.units_per_em == other.units_per_em
            && self.prep == other.prep
            && self.cvt == other.cvt
            && self.fpgm == other.fpgm
    }
}

/// Registry, ordering and supplement of a CID-keyed font.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CidSystemInfo {
    /// The issuing registry.
    pub registry: Vec<u8>,
    /// The character collection ordering.
    pub ordering: Vec<u8>,
    /// The supplement number.
    pub supplement: u32,
}

impl CidSystemInfo {
    /// Whether two collections are compatible: same registry and ordering.
    /// The supplement may differ.
    pub fn compatible(&self, other: &CidSystemInfo) -> bool {
        self.registry == other.registry && self.ordering == other.ordering
    }
}

/// A digest over a font's subroutines, used to compare hinting cheaply.
///
/// Global subroutines are hashed before local ones, and the two counts are
/// kept apart so that merely redistributing subroutines between the sets
/// cannot collide.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SubrDigest {
    /// MD5 over all subroutine bytes, globals first.
    pub hash: [u8; 16],
    /// The number of global subroutines.
    pub globals: usize,
    /// The number of local subroutines.
    pub locals: usize,
}

/// A live font the engine can copy from.
///
/// Methods that only apply to some font types have defaults that report the
/// capability as absent; a source only implements what its type supports.
pub trait FontSource {
    /// The font's representation type.
    fn font_type(&self) -> FontType;

    /// The font's name, compared byte-wise when merging fonts.
    fn font_name(&self) -> &[u8];

    /// The font's writing mode.
    fn writing_mode(&self) -> WritingMode;

    /// The number of glyph storage positions. For TrueType-style fonts this
    /// is the true glyph count; simple outline fonts may return zero and be
    /// sized by enumeration instead.
    fn glyph_count(&self) -> usize;

    /// The highest CID of a sub-font-keyed composite font.
    fn max_cid(&self) -> u32 {
        0
    }

    /// The CID count of a map-keyed composite font.
    fn cid_count(&self) -> u32 {
        0
    }

    /// The character collection of a CID-keyed font.
    fn cid_system_info(&self) -> Option<&CidSystemInfo> {
        None
    }

    /// Enumerate the font's glyphs in the given key space.
    fn enumerate_glyphs(
        &self,
        space: GlyphSpace,
    ) -> Box<dyn Iterator<Item = GlyphId> + '_>;

    /// The canonical name of a glyph.
    fn glyph_name(&self, glyph: GlyphId) -> Result<Cow<'_, [u8]>>;

    /// The outline program bytes of a glyph.
    fn glyph_data(&self, glyph: GlyphId) -> Result<GlyphData<'_>>;

    /// Width, bounding box and piece count of a glyph.
    fn glyph_info(&self, glyph: GlyphId) -> Result<GlyphInfo>;

    /// The sub-glyphs a composite glyph is built from. Pieces are addressed
    /// by raw index so that nameless components can be reached.
    fn glyph_pieces(&self, glyph: GlyphId) -> Result<Vec<GlyphId>> {
        let _ = glyph;
        Ok(Vec::new())
    }

    /// Per-glyph metrics for one writing mode, if the font stores them
    /// separately from the outline. TrueType-style fonts only.
    fn glyph_metrics(&self, glyph: GlyphId, mode: WritingMode) -> Option<Metrics> {
        let _ = (glyph, mode);
        None
    }

    /// Translate a name or CID to the font's internal glyph index.
    fn glyph_index(&self, glyph: GlyphId) -> Option<u32> {
        let _ = glyph;
        None
    }

    /// Map a character code to a glyph.
    fn encode_char(&self, code: u32, space: GlyphSpace) -> Option<GlyphId> {
        let _ = (code, space);
        None
    }

    /// Fetch subroutine `index` from the local or global set.
    ///
    /// The sets are enumerated by walking indices from zero until
    /// [`Error::Range`] signals the end; there is no count accessor.
    fn subr_data(&self, index: usize, global: bool) -> Result<Cow<'_, [u8]>> {
        let _ = (index, global);
        Err(Error::Range)
    }

    /// A digest over the font's subroutines. The default enumerates them
    /// through [`FontSource::subr_data`].
    fn subr_digest(&self) -> Result<SubrDigest> {
        subrs::digest(|i, global| self.subr_data(i, global))
    }

    /// A minimal re-serialized blob of the font's binary tables, excluding
    /// the glyph outline and character map tables, which the engine manages
    /// itself. TrueType-style fonts only.
    fn stripped_tables(&self) -> Result<Vec<u8>> {
        Err(Error::Unregistered)
    }

    /// Hinting parameters of a simple outline font.
    fn outline_hinting(&self) -> Option<&OutlineHinting> {
        None
    }

    /// Hinting state of a TrueType-style font.
    fn truetype_hinting(&self) -> Option<&TrueTypeHinting> {
        None
    }

    /// The number of outline sub-fonts of a composite font.
    fn subfont_count(&self) -> usize {
        0
    }

    /// The name of one outline sub-font.
    fn subfont_name(&self, index: usize) -> Option<&[u8]> {
        let _ = index;
        None
    }

    /// Hinting parameters of one outline sub-font.
    fn subfont_hinting(&self, index: usize) -> Option<&OutlineHinting> {
        let _ = index;
        None
    }

    /// Fetch a subroutine of one outline sub-font. Global subroutines are
    /// shared across sub-fonts; by convention they are reachable through any
    /// sub-font index.
    fn subfont_subr_data(
        &self,
        subfont: usize,
        index: usize,
        global: bool,
    ) -> Result<Cow<'_, [u8]>> {
        let _ = (subfont, index, global);
        Err(Error::Unregistered)
    }

    /// A digest over one sub-font's subroutines.
    fn subfont_subr_digest(&self, subfont: usize) -> Result<SubrDigest> {
        subrs::digest(|i, global| self.subfont_subr_data(subfont, i, global))
    }
}
