//! TrueType-style fonts, addressed by glyph index.
//!
//! The copy keeps a re-serialized blob of the source's binary tables
//! (excluding outlines and character maps, which the slot array and the
//! encoding replace) and appends a synthesized metrics area: four bytes per
//! glyph and writing mode, advance as a big-endian `u16` followed by the
//! side bearing as a big-endian `i16`, in design units.

use crate::copied::{CopiedFont, CopyStatus};
use crate::encoding::Encoding;
use crate::source::{FontSource, WritingMode};
use crate::strategy::GlyphCopy;
use crate::{CopyOptions, Error, GlyphId, Result};

/// Pull the stripped table blob and reserve the metrics area behind it.
/// Shared with the map-keyed composite variant, which stores its glyphs the
/// same way.
pub(crate) fn init_tables(
    font: &mut CopiedFont,
    source: &dyn FontSource,
) -> Result<()> {
    let hinting = source.truetype_hinting().cloned().unwrap_or_default();
    font.units_per_em =
        if hinting.units_per_em == 0 { 1000 } else { hinting.units_per_em };
    font.truetype_hinting = Some(hinting);

    let tables = source.stripped_tables()?;
    let glyph_count = font.glyphs.capacity();
    let mut data = Vec::new();
    data.try_reserve_exact(tables.len() + glyph_count * 8)?;
    data.extend_from_slice(&tables);
    font.table_len = data.len();
    font.metrics_offset = [data.len(), data.len() + glyph_count * 4];
    data.resize(data.len() + glyph_count * 8, 0);
    font.data = data;
    Ok(())
}

pub(crate) fn finish_copy(
    font: &mut CopiedFont,
    source: &dyn FontSource,
) -> Result<()> {
    init_tables(font, source)?;
    font.encoding = Some(Encoding::new());
    Ok(())
}

/// Resolve a glyph reference to the glyph index it is stored under.
///
/// A name or CID with no index in the source falls back to glyph zero, the
/// conventional `.notdef` position.
fn resolve_gid(
    source: &dyn FontSource,
    glyph: GlyphId,
    options: CopyOptions,
) -> Result<(u32, GlyphId)> {
    if let GlyphId::Index(gid) = glyph {
        return Ok((gid, glyph));
    }
    if options.by_index {
        return Err(Error::Unregistered);
    }
    match source.glyph_index(glyph) {
        Some(gid) => Ok((gid, glyph)),
        None => {
            log::warn!(
                "glyph {glyph:?} has no index in the source font, \
                 copying .notdef instead"
            );
            Ok((0, GlyphId::Index(0)))
        }
    }
}

/// Copy the per-glyph metrics the source stores apart from the outline.
pub(crate) fn copy_metrics(
    font: &mut CopiedFont,
    source: &dyn FontSource,
    glyph: GlyphId,
    gid: u32,
) -> Result<()> {
    for mode in [WritingMode::Horizontal, WritingMode::Vertical] {
        if let Some(metrics) = source.glyph_metrics(glyph, mode) {
            font.record_metrics(gid, mode, metrics)?;
        }
    }
    Ok(())
}

pub(crate) fn copy_glyph(
    font: &mut CopiedFont,
    source: &dyn FontSource,
    glyph: GlyphId,
    options: CopyOptions,
) -> Result<GlyphCopy> {
    let (gid, fetch) = resolve_gid(source, glyph, options)?;
    let slot = font.glyphs.direct(gid)?.index;

    let data = source.glyph_data(fetch)?;
    let info = source.glyph_info(fetch)?;
    let pieces = source.glyph_pieces(fetch)?;

    let status = font.store_glyph(slot, b"", &data.bytes, options)?;
    if status == CopyStatus::Added {
        let stored = font.glyphs.slot_mut(slot);
        stored.info = info;
        stored.pieces = pieces;
        copy_metrics(font, source, fetch, gid)?;
    }
    // A glyph first copied by bare index gets its name on a later
    // name-keyed copy, even though the data was already present.
    if !options.by_index {
        if let Ok(name) = source.glyph_name(glyph) {
            let name = name.into_owned();
            if let Some(names) = font.names.as_mut() {
                names.record(slot, glyph, name);
            }
        }
    }
    Ok(GlyphCopy { status, slot, new_cid: None })
}

pub(crate) fn add_encoding(
    font: &mut CopiedFont,
    code: u32,
    glyph: GlyphId,
) -> Result<()> {
    // The encoding stores glyph indices; a name is resolved against the
    // copy's own name table, so the glyph must have been copied already.
    let stored = match glyph {
        GlyphId::Index(gid) => {
            font.glyphs.direct(gid)?;
            glyph
        }
        GlyphId::Name(_) => {
            let slot = font
                .names
                .as_ref()
                .ok_or(Error::Unregistered)?
                .linear_slot(glyph)?;
            GlyphId::Index(slot as u32)
        }
        GlyphId::Cid(_) => return Err(Error::Unregistered),
    };
    font.encoding.as_mut().ok_or(Error::Unregistered)?.set(code, stored)
}
