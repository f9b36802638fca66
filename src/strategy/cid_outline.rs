//! CID-keyed composite fonts resolved through embedded outline sub-fonts.
//!
//! Glyphs are addressed directly by CID. Each stored outline is prefixed
//! with a fixed-width big-endian tag naming the sub-font whose hinting and
//! local subroutines interpret it; the tag width is chosen once from the
//! sub-font count and is zero when there is only one sub-font.

use crate::copied::{CopiedFont, CopiedSubfont, CopyStatus};
use crate::source::FontSource;
use crate::strategy::GlyphCopy;
use crate::subrs::SubrStore;
use crate::{CopyOptions, Error, GlyphId, Result};

/// The number of prefix bytes needed to tag `count` sub-fonts.
fn fd_bytes_for(count: usize) -> usize {
    if count <= 1 {
        return 0;
    }
    let bits = usize::BITS - (count - 1).leading_zeros();
    ((bits + 7) / 8) as usize
}

pub(crate) fn finish_copy(
    font: &mut CopiedFont,
    source: &dyn FontSource,
) -> Result<()> {
    let count = source.subfont_count();
    if count == 0 {
        return Err(Error::Unregistered);
    }
    let mut subfonts = Vec::new();
    subfonts.try_reserve_exact(count)?;
    for index in 0..count {
        subfonts.push(CopiedSubfont {
            font_name: source
                .subfont_name(index)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
            hinting: source
                .subfont_hinting(index)
                .cloned()
                .unwrap_or_default(),
            local_subrs: SubrStore::copy_from(|i| {
                source.subfont_subr_data(index, i, false)
            })?,
        });
    }
    // Global subroutines are shared; any sub-font index reaches them.
    font.global_subrs =
        SubrStore::copy_from(|i| source.subfont_subr_data(0, i, true))?;
    font.fd_bytes = fd_bytes_for(count);
    font.subfonts = subfonts;
    font.cid_system_info = source.cid_system_info().cloned();
    Ok(())
}

pub(crate) fn copy_glyph(
    font: &mut CopiedFont,
    source: &dyn FontSource,
    glyph: GlyphId,
    options: CopyOptions,
) -> Result<GlyphCopy> {
    let cid = match glyph {
        GlyphId::Cid(cid) => cid,
        _ => return Err(Error::Unregistered),
    };
    let slot = font.glyphs.direct(cid)?.index;

    let data = source.glyph_data(glyph)?;
    if data.subfont >= font.subfonts.len() {
        return Err(Error::Range);
    }
    let info = source.glyph_info(glyph)?;
    let pieces = source.glyph_pieces(glyph)?;

    let tag = (data.subfont as u64).to_be_bytes();
    let prefix = &tag[tag.len() - font.fd_bytes..];
    let status = font.store_glyph(slot, prefix, &data.bytes, options)?;
    if status == CopyStatus::Added {
        let stored = font.glyphs.slot_mut(slot);
        stored.info = info;
        stored.pieces = pieces;
    }
    Ok(GlyphCopy { status, slot, new_cid: None })
}
