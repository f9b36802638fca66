//! Per-font-type copying behavior.
//!
//! The containers below this layer know nothing about font types; everything
//! type-specific (how a glyph id resolves to a slot, what gets copied at
//! construction time, how encoding entries are stored) lives in one of the
//! four submodules and is selected by a `match` on the copy's type tag.

pub(crate) mod cid_outline;
pub(crate) mod cid_truetype;
pub(crate) mod outline;
pub(crate) mod truetype;

use crate::copied::{CopiedFont, CopyStatus};
use crate::source::FontSource;
use crate::{CopyOptions, Error, FontType, GlyphId, Result};

/// The outcome of one per-type glyph copy, carrying what a rollback needs.
pub(crate) struct GlyphCopy {
    pub status: CopyStatus,
    /// The glyph table slot the copy landed in.
    pub slot: usize,
    /// A CID mapping created by this copy, undone when rolling back.
    pub new_cid: Option<u32>,
}

/// Finish the glyph-less part of a font copy: allocate the type-specific
/// side tables and pull over subroutines, hinting state and binary tables.
pub(crate) fn finish_copy(
    font: &mut CopiedFont,
    source: &dyn FontSource,
) -> Result<()> {
    match font.font_type {
        FontType::Outline => outline::finish_copy(font, source),
        FontType::TrueType => truetype::finish_copy(font, source),
        FontType::CidOutline => cid_outline::finish_copy(font, source),
        FontType::CidTrueType => cid_truetype::finish_copy(font, source),
    }
}

/// Copy one glyph, without piece expansion.
pub(crate) fn copy_glyph(
    font: &mut CopiedFont,
    source: &dyn FontSource,
    glyph: GlyphId,
    options: CopyOptions,
) -> Result<GlyphCopy> {
    match font.font_type {
        FontType::Outline => outline::copy_glyph(font, source, glyph, options),
        FontType::TrueType => {
            truetype::copy_glyph(font, source, glyph, options)
        }
        FontType::CidOutline => {
            cid_outline::copy_glyph(font, source, glyph, options)
        }
        FontType::CidTrueType => {
            cid_truetype::copy_glyph(font, source, glyph, options)
        }
    }
}

/// The exact rollback of an `Added` glyph copy.
pub(crate) fn uncopy(font: &mut CopiedFont, copy: &GlyphCopy) {
    font.glyphs.clear(copy.slot);
    match font.font_type {
        FontType::Outline | FontType::TrueType => {
            if let Some(names) = font.names.as_mut() {
                *names.entry_mut(copy.slot) = Default::default();
                names.clear_extra(copy.slot);
            }
        }
        FontType::CidOutline => {}
        FontType::CidTrueType => {
            if let (Some(cid), Some(map)) =
                (copy.new_cid, font.cid_map.as_mut())
            {
                map.clear(cid);
            }
        }
    }
}

/// Record a code-to-glyph mapping on the copy. Only name-keyed font types
/// carry an encoding.
pub(crate) fn add_encoding(
    font: &mut CopiedFont,
    code: u32,
    glyph: GlyphId,
) -> Result<()> {
    match font.font_type {
        FontType::Outline => outline::add_encoding(font, code, glyph),
        FontType::TrueType => truetype::add_encoding(font, code, glyph),
        FontType::CidOutline | FontType::CidTrueType => {
            Err(Error::Unregistered)
        }
    }
}
