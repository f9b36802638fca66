//! The 256-slot character encoding of name-keyed fonts.

use crate::{Error, GlyphId, Result};

/// A code-to-glyph table with one slot per character code.
///
/// A code, once mapped, may only be remapped to the same glyph; remapping to
/// a different glyph is a conflict.
#[derive(Debug)]
pub(crate) struct Encoding {
    slots: Box<[Option<GlyphId>; 256]>,
}

impl Encoding {
    pub fn new() -> Self {
        Encoding { slots: Box::new([None; 256]) }
    }

    /// The glyph mapped to `code`, if any.
    pub fn get(&self, code: u32) -> Option<GlyphId> {
        self.slots.get(code as usize).copied().flatten()
    }

    /// Map `code` to `glyph`. Re-mapping to the same glyph is idempotent;
    /// re-mapping to a different one fails.
    pub fn set(&mut self, code: u32, glyph: GlyphId) -> Result<()> {
        let slot =
            self.slots.get_mut(code as usize).ok_or(Error::Range)?;
        match *slot {
            Some(existing) if existing != glyph => Err(Error::InvalidAccess),
            _ => {
                *slot = Some(glyph);
                Ok(())
            }
        }
    }

    /// Iterate over the mapped codes.
    pub fn iter(&self) -> impl Iterator<Item = (u32, GlyphId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(code, slot)| slot.map(|g| (code as u32, g)))
    }
}
