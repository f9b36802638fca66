//! Cross-font glyph-sharing compatibility.
//!
//! Decides whether glyphs from a live font could be merged into an existing
//! copy. The gates fail fast and cheap before any glyph content is touched;
//! the content walk then compares bytes, shape summaries and composite
//! structure, tolerating glyphs the copy would merely have to add, up to
//! its remaining capacity.

use rustc_hash::FxHashSet;

use crate::copied::CopiedFont;
use crate::source::FontSource;
use crate::{Error, FontType, GlyphId, Result, MAX_PIECE_DEPTH};

pub(crate) fn can_copy_glyphs(
    copied: &CopiedFont,
    source: &dyn FontSource,
    glyphs: &[GlyphId],
    check_hinting: bool,
) -> Result<bool> {
    // Comparing a font against itself is trivially compatible.
    let same = std::ptr::eq(
        copied as *const CopiedFont as *const (),
        source as *const dyn FontSource as *const (),
    );
    if same {
        return Ok(true);
    }
    if copied.font_type != source.font_type() {
        return Ok(false);
    }
    if copied.writing_mode() != source.writing_mode() {
        return Ok(false);
    }
    // Merging arbitrary unrelated fonts is never intended.
    if copied.font_name() != source.font_name() {
        return Ok(false);
    }
    if check_hinting && !hinting_compatible(copied, source)? {
        return Ok(false);
    }

    let mut budget =
        copied.glyph_count() - copied.copied_glyph_count();
    let mut seen = FxHashSet::default();
    for &glyph in glyphs {
        if !compare_glyph(copied, source, glyph, 0, &mut budget, &mut seen)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// The font-type-specific hinting gate.
fn hinting_compatible(
    copied: &CopiedFont,
    source: &dyn FontSource,
) -> Result<bool> {
    match copied.font_type {
        FontType::Outline => {
            if copied.outline_hinting() != source.outline_hinting() {
                return Ok(false);
            }
            Ok(copied.subr_digest()? == source.subr_digest()?)
        }
        FontType::TrueType => Ok(truetype_compatible(copied, source)),
        FontType::CidOutline => {
            if !collections_compatible(copied, source) {
                return Ok(false);
            }
            if copied.subfont_count() != source.subfont_count() {
                return Ok(false);
            }
            for index in 0..copied.subfont_count() {
                if copied.subfont_hinting(index)
                    != source.subfont_hinting(index)
                {
                    return Ok(false);
                }
                if copied.subfont_subr_digest(index)?
                    != source.subfont_subr_digest(index)?
                {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        FontType::CidTrueType => Ok(collections_compatible(copied, source)
            && truetype_compatible(copied, source)),
    }
}

fn collections_compatible(
    copied: &CopiedFont,
    source: &dyn FontSource,
) -> bool {
    match (copied.cid_system_info(), source.cid_system_info()) {
        (Some(a), Some(b)) => a.compatible(b),
        _ => false,
    }
}

fn truetype_compatible(copied: &CopiedFont, source: &dyn FontSource) -> bool {
    match (copied.truetype_hinting(), source.truetype_hinting()) {
        (Some(a), Some(b)) => a.same_programs(b) && a.covers(b),
        (None, None) => true,
        _ => false,
    }
}

/// Compare one glyph across the two fonts, recursing into composite
/// pieces. `budget` counts the glyphs the copy still has room to add;
/// `seen` cuts off repeated and cyclic piece references.
fn compare_glyph(
    copied: &CopiedFont,
    source: &dyn FontSource,
    glyph: GlyphId,
    depth: usize,
    budget: &mut usize,
    seen: &mut FxHashSet<GlyphId>,
) -> Result<bool> {
    if depth > MAX_PIECE_DEPTH {
        return Err(Error::LimitExceeded);
    }
    if !seen.insert(glyph) {
        return Ok(true);
    }

    let ours = match copied.resolve_slot(glyph) {
        Ok(slot) if slot.used => true,
        Ok(_) | Err(Error::Undefined) => false,
        // An unknown name would get a fresh slot; anything else the copy
        // cannot even address, so it cannot be merged.
        Err(Error::Range) if matches!(glyph, GlyphId::Name(_)) => false,
        Err(Error::Range) => return Ok(false),
        Err(err) => return Err(err),
    };
    let theirs = match source.glyph_data(glyph) {
        Ok(data) => Some(data),
        Err(Error::Undefined) | Err(Error::Range) => None,
        Err(err) => return Err(err),
    };

    let data = match (ours, theirs) {
        // Nothing to bring over.
        (_, None) => return Ok(true),
        (false, Some(_)) => {
            if *budget == 0 {
                return Ok(false);
            }
            *budget -= 1;
            return Ok(true);
        }
        (true, Some(data)) => data,
    };

    let stored = copied.glyph_data(glyph)?;
    if stored.bytes != data.bytes || stored.subfont != data.subfont {
        return Ok(false);
    }
    if copied.glyph_info(glyph)? != source.glyph_info(glyph)? {
        return Ok(false);
    }
    let stored_pieces = copied.glyph_pieces(glyph)?;
    let source_pieces = source.glyph_pieces(glyph)?;
    if stored_pieces != source_pieces {
        return Ok(false);
    }
    for piece in source_pieces {
        if !compare_glyph(copied, source, piece, depth + 1, budget, seen)? {
            return Ok(false);
        }
    }
    Ok(true)
}
