//! Simple outline fonts, addressed by glyph name through the hashed name
//! table. The glyph table slot is wherever the name key hashes to, so the
//! name table fully determines slot assignment.

use crate::copied::{CopiedFont, CopyStatus};
use crate::encoding::Encoding;
use crate::source::FontSource;
use crate::strategy::GlyphCopy;
use crate::subrs::SubrStore;
use crate::{CopyOptions, Error, GlyphId, Result};

pub(crate) fn finish_copy(
    font: &mut CopiedFont,
    source: &dyn FontSource,
) -> Result<()> {
    font.encoding = Some(Encoding::new());
    font.outline_hinting = source.outline_hinting().cloned();
    font.local_subrs = SubrStore::copy_from(|i| source.subr_data(i, false))?;
    font.global_subrs = SubrStore::copy_from(|i| source.subr_data(i, true))?;
    Ok(())
}

pub(crate) fn copy_glyph(
    font: &mut CopiedFont,
    source: &dyn FontSource,
    glyph: GlyphId,
    options: CopyOptions,
) -> Result<GlyphCopy> {
    let key = match glyph {
        GlyphId::Name(key) => key,
        _ => return Err(Error::Unregistered),
    };
    let slot = font
        .names
        .as_ref()
        .ok_or(Error::Unregistered)?
        .hashed_slot(key)?;

    // Everything fallible is fetched before the first mutation, so a failed
    // copy leaves no trace.
    let data = source.glyph_data(glyph)?;
    let name = source.glyph_name(glyph)?.into_owned();
    let info = source.glyph_info(glyph)?;
    let pieces = source.glyph_pieces(glyph)?;

    let status = font.store_glyph(slot, b"", &data.bytes, options)?;
    if status == CopyStatus::Added {
        let stored = font.glyphs.slot_mut(slot);
        stored.info = info;
        stored.pieces = pieces;
        if let Some(names) = font.names.as_mut() {
            names.record(slot, glyph, name);
        }
    }
    Ok(GlyphCopy { status, slot, new_cid: None })
}

pub(crate) fn add_encoding(
    font: &mut CopiedFont,
    code: u32,
    glyph: GlyphId,
) -> Result<()> {
    if !matches!(glyph, GlyphId::Name(_)) {
        return Err(Error::Unregistered);
    }
    font.encoding.as_mut().ok_or(Error::Unregistered)?.set(code, glyph)
}
