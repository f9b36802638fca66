//! The fixed-capacity glyph slot table.
//!
//! Capacity is chosen once at construction. Simple outline fonts inflate it
//! to a prime so that double-hash reprobing in the parallel name table is
//! guaranteed to terminate; composite fonts size it to max-CID + 1; TrueType
//! style fonts to the true glyph count. An out-of-range glyph id is an
//! error, never silent growth.

use crate::{Error, GlyphId, GlyphInfo, Result};

/// Slot flag: the slot holds outline data.
pub(crate) const HAS_DATA: u8 = 1;
/// Slot flag: horizontal metrics were recorded for this glyph.
pub(crate) const HAS_METRICS_H: u8 = 2;
/// Slot flag: vertical metrics were recorded for this glyph.
pub(crate) const HAS_METRICS_V: u8 = 4;

/// Prime capacities for hashed name addressing. We start with 257 to fit
/// 256 encoded glyphs plus .notdef; smaller sizes are not useful because a
/// font may add more glyphs incrementally after its stable copy exists.
const SOME_PRIMES: &[usize] = &[
    257, 359, 521, 769, 1031, 2053, 3079, 4099, 5101, 6101, 7109, 8209,
    10007, 12007, 14009, 16411, 20107, 26501, 32771, 48857, 65537, 85229,
    127837,
];

/// Inflate a counted glyph total to a prime table capacity, reserving slack
/// for font merging and incremental additions.
pub(crate) fn prime_capacity(counted: usize) -> Result<usize> {
    let wanted = counted.max(257) * 3 / 2;
    SOME_PRIMES.iter().copied().find(|&p| wanted <= p).ok_or(Error::Range)
}

/// One glyph storage position.
#[derive(Debug, Default)]
pub(crate) struct GlyphSlot {
    /// The copied outline bytes, possibly prefixed with a sub-font tag.
    /// Meaningful only while `flags` has `HAS_DATA` set.
    pub data: Vec<u8>,
    pub flags: u8,
    /// Rank in the deterministic ordering; -1 while unassigned.
    pub order_index: i32,
    /// Shape summary recorded at copy time, for comparison and re-export.
    pub info: GlyphInfo,
    /// Component pieces recorded at copy time.
    pub pieces: Vec<GlyphId>,
}

impl GlyphSlot {
    pub fn used(&self) -> bool {
        self.flags & HAS_DATA != 0
    }
}

/// A reference to a resolved slot: its position and whether it is in use.
#[derive(Debug, Copy, Clone)]
pub(crate) struct SlotRef {
    pub index: usize,
    pub used: bool,
}

/// The fixed-size array of glyph slots.
#[derive(Debug)]
pub(crate) struct GlyphTable {
    slots: Vec<GlyphSlot>,
    used: usize,
}

impl GlyphTable {
    pub fn new(capacity: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, GlyphSlot::default);
        Ok(GlyphTable { slots, used: 0 })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of live glyphs.
    pub fn used_count(&self) -> usize {
        self.used
    }

    pub fn slot(&self, index: usize) -> &GlyphSlot {
        &self.slots[index]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut GlyphSlot {
        &mut self.slots[index]
    }

    /// Resolve a directly addressed glyph number to its slot position.
    pub fn direct(&self, number: u32) -> Result<SlotRef> {
        let index = number as usize;
        if index >= self.slots.len() {
            return Err(Error::Range);
        }
        Ok(SlotRef { index, used: self.slots[index].used() })
    }

    /// Store `prefix + bytes` into an unused slot.
    pub fn fill(
        &mut self,
        index: usize,
        prefix: &[u8],
        bytes: &[u8],
    ) -> Result<()> {
        let mut data = Vec::new();
        data.try_reserve_exact(prefix.len() + bytes.len())?;
        data.extend_from_slice(prefix);
        data.extend_from_slice(bytes);
        let slot = &mut self.slots[index];
        slot.data = data;
        slot.flags = HAS_DATA;
        slot.order_index = -1;
        self.used += 1;
        Ok(())
    }

    /// The exact rollback of [`GlyphTable::fill`].
    pub fn clear(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if slot.used() {
            self.used -= 1;
        }
        *slot = GlyphSlot::default();
    }

    /// Iterate over the positions of all used slots.
    pub fn used_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.used())
            .map(|(i, _)| i)
    }
}
