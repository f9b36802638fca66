//! CID-keyed composite fonts resolved through a CID-to-glyph-index map.
//!
//! Glyph storage works exactly like the plain TrueType-style variant; on
//! top of it sits a map assigning each copied CID its glyph index. A CID
//! seen for the first time resolves through the source's own CID
//! translation, falling back to the CID itself when the source offers
//! none, so two CIDs sharing one source glyph share one slot here too.

use crate::cidmap::CidMap;
use crate::copied::{CopiedFont, CopyStatus};
use crate::source::FontSource;
use crate::strategy::{truetype, GlyphCopy};
use crate::{CopyOptions, Error, GlyphId, Result};

pub(crate) fn finish_copy(
    font: &mut CopiedFont,
    source: &dyn FontSource,
) -> Result<()> {
    truetype::init_tables(font, source)?;
    // Sized to the source's CID count up front, all entries unmapped. It
    // still grows if a copy addresses a CID beyond that count.
    font.cid_map = Some(CidMap::new(source.cid_count() as usize)?);
    font.cid_system_info = source.cid_system_info().cloned();
    Ok(())
}

pub(crate) fn copy_glyph(
    font: &mut CopiedFont,
    source: &dyn FontSource,
    glyph: GlyphId,
    options: CopyOptions,
) -> Result<GlyphCopy> {
    let map = font.cid_map.as_ref().ok_or(Error::Unregistered)?;
    let (gid, pending_cid) = match glyph {
        GlyphId::Index(gid) => (gid, None),
        GlyphId::Cid(cid) => match map.get(cid) {
            Some(gid) => (gid, None),
            None => {
                // An unseen CID resolves through the source's own
                // translation; identity only when it offers none.
                let gid = source
                    .glyph_index(GlyphId::Cid(cid))
                    .unwrap_or(cid);
                (gid, Some(cid))
            }
        },
        GlyphId::Name(_) => return Err(Error::Unregistered),
    };
    let slot = font.glyphs.direct(gid)?.index;

    let data = source.glyph_data(glyph)?;
    let info = source.glyph_info(glyph)?;
    let pieces = source.glyph_pieces(glyph)?;

    let status = font.store_glyph(slot, b"", &data.bytes, options)?;
    let mut new_cid = None;
    if let Some(cid) = pending_cid {
        let map = font.cid_map.as_mut().ok_or(Error::Unregistered)?;
        if cid as usize >= map.count() {
            map.expand(cid as usize + 1)?;
        }
        map.set(cid, gid);
        new_cid = Some(cid);
    }
    if status == CopyStatus::Added {
        let stored = font.glyphs.slot_mut(slot);
        stored.info = info;
        stored.pieces = pieces;
        truetype::copy_metrics(font, source, glyph, gid)?;
    }
    Ok(GlyphCopy { status, slot, new_cid })
}
