/*!
Copies live fonts into minimal standalone subsets for embedding.

Given a fully functional font object (anything implementing [`FontSource`]),
this crate produces a [`CopiedFont`]: a self-contained copy holding only the
glyphs, names, encoding entries and charstring subroutines that were actually
copied into it. A downstream writer can then serialize the copy without ever
touching the original font again.

Four structurally different font representations are supported behind one
storage model:

- simple outline fonts, addressed by glyph name through a hashed name table;
- TrueType-style fonts, addressed by glyph index with a linear name table;
- CID-keyed composite fonts resolved through embedded outline sub-fonts;
- CID-keyed composite fonts resolved through a CID-to-index map.

# Example

```no_run
# fn main() -> Result<(), fontcopy::Error> {
# let font: &dyn fontcopy::FontSource = unimplemented!();
use fontcopy::{copy_font, CopyOptions, FontSource, Matrix};

// Copy the font shell: containers, subroutines, encoding, .notdef.
let mut copied = copy_font(font, Matrix::IDENTITY, None)?;

// Pull over the glyphs the document actually uses.
for glyph in font.enumerate_glyphs(fontcopy::GlyphSpace::Name) {
    copied.copy_glyph(font, glyph, CopyOptions::default())?;
}

// Fix the serialization order, then hand `copied` to the writer.
copied.order_font()?;
# Ok(())
# }
```

A copy is itself a font: [`CopiedFont`] implements [`FontSource`], so glyphs
can be enumerated, retrieved and even re-copied from it.
*/

#![deny(unsafe_code)]
#![deny(missing_docs)]

mod cidmap;
mod compare;
mod copied;
mod encoding;
mod glyphs;
mod names;
mod source;
mod strategy;
mod subrs;

use std::collections::TryReserveError;
use std::fmt::{self, Display, Formatter};

pub use crate::copied::{CopiedFont, CopyStatus};
pub use crate::source::{
    CidSystemInfo, FontSource, GlyphData, GlyphInfo, GlyphSpace, Metrics,
    OutlineHinting, SubrDigest, TrueTypeHinting, WritingMode,
};
pub use crate::subrs::SubrStore;

/// The maximum number of pieces a composite glyph copy may expand into,
/// counting the glyph itself.
pub const MAX_GLYPH_PIECES: usize = 64;

/// The maximum nesting depth for composite glyph copies and comparisons.
pub const MAX_PIECE_DEPTH: usize = 5;

/// The marker embedded in synthetic glyph names that were minted to give one
/// outline a second set of metrics. See [`CopiedFont::drop_extension_glyphs`].
pub const EXTENSION_NAME_SEPARATOR: &[u8] = b"~x~";

/// Identifies a glyph of a source or copied font.
///
/// The numeric payloads are keys in three disjoint spaces, mirroring how the
/// four font representations address their glyphs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum GlyphId {
    /// A name-keyed glyph. The number is an opaque key assigned by the source
    /// font's name table; the canonical byte string is retrieved separately
    /// via [`FontSource::glyph_name`].
    Name(u32),
    /// A character identifier of a CID-keyed composite font.
    Cid(u32),
    /// A position in a font's internal glyph storage (a GID).
    Index(u32),
}

/// The four supported font representations.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FontType {
    /// A simple outline font addressed by glyph name.
    Outline,
    /// A TrueType-style font addressed by glyph index.
    TrueType,
    /// A CID-keyed composite font resolved through outline sub-fonts.
    CidOutline,
    /// A CID-keyed composite font resolved through a CID-to-index map.
    CidTrueType,
}

/// A font transformation matrix, recorded on the copy for the downstream
/// writer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix {
    /// Horizontal scaling.
    pub xx: f64,
    /// Horizontal skewing.
    pub xy: f64,
    /// Vertical skewing.
    pub yx: f64,
    /// Vertical scaling.
    pub yy: f64,
    /// Horizontal translation.
    pub tx: f64,
    /// Vertical translation.
    pub ty: f64,
}

impl Matrix {
    /// The identity matrix.
    pub const IDENTITY: Self =
        Matrix { xx: 1.0, xy: 0.0, yx: 0.0, yy: 1.0, tx: 0.0, ty: 0.0 };
}

/// Options controlling a single glyph copy.
#[derive(Debug, Copy, Clone, Default)]
pub struct CopyOptions {
    /// Fail with [`Error::InvalidAccess`] if the glyph is already present,
    /// even when the stored bytes match.
    pub must_be_new: bool,
    /// Fail with [`Error::Undefined`] instead of adding an absent glyph.
    /// The copy then only verifies an existing definition.
    pub no_new: bool,
    /// Interpret the glyph as a raw glyph index, bypassing name and CID
    /// translation. Only meaningful for TrueType-style fonts.
    pub by_index: bool,
}

/// The result type for everything.
pub type Result<T> = std::result::Result<T, Error>;

/// An operation on a copied font failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// A glyph, character code or subroutine index lies outside the
    /// configured capacity.
    Range,
    /// The addressed slot is unoccupied, or the glyph is absent from the
    /// source font.
    Undefined,
    /// A conflicting redefinition of an already-defined glyph or encoding
    /// entry, or a mutation attempted after [`CopiedFont::order_font`].
    InvalidAccess,
    /// An allocation failed.
    OutOfMemory,
    /// A composite glyph exceeded the piece count or recursion depth limit.
    LimitExceeded,
    /// An internal invariant was violated, e.g. an unsupported font-type
    /// combination reached a code path that assumes otherwise. This signals a
    /// programming error, not a recoverable condition.
    Unregistered,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Range => f.pad("glyph or index out of range"),
            Self::Undefined => f.pad("glyph undefined"),
            Self::InvalidAccess => f.pad("conflicting redefinition"),
            Self::OutOfMemory => f.pad("allocation failed"),
            Self::LimitExceeded => f.pad("composite glyph limit exceeded"),
            Self::Unregistered => f.pad("internal invariant violated"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

/// Copy a font, aside from its glyphs.
///
/// Sizes and initializes all containers for the source's font type, copies
/// the subroutines and any binary table data the target representation
/// needs, and copies the `.notdef` glyph. Further glyphs are then pulled
/// over one at a time with [`CopiedFont::copy_glyph`].
///
/// For simple outline fonts, `max_reserved_glyphs` clamps the number of
/// glyph slots reserved beyond the source's counted glyph total.
pub fn copy_font(
    source: &dyn FontSource,
    matrix: Matrix,
    max_reserved_glyphs: Option<usize>,
) -> Result<CopiedFont> {
    CopiedFont::copy(source, matrix, max_reserved_glyphs)
}

/// Release a copied font.
///
/// Equivalent to dropping it; provided for callers that prefer an explicit
/// release point. Sub-fonts and side tables owned by composite copies go
/// with it.
pub fn free_copied_font(font: CopiedFont) {
    drop(font);
}
