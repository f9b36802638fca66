//! The glyph name table, index-aligned with the glyph table.
//!
//! Simple outline fonts place a name at the slot its key hashes to, so the
//! name table drives slot assignment. TrueType-style fonts index by glyph
//! index and look names up linearly; the rare glyph carrying more than one
//! name spills into the extra-name overflow list.

use crate::{Error, GlyphId, Result};

/// One glyph name: its key and its canonical byte string.
#[derive(Debug, Default, Clone)]
pub(crate) struct NameEntry {
    /// The key this name was recorded under.
    pub glyph: Option<GlyphId>,
    pub name: Vec<u8>,
}

impl NameEntry {
    pub fn occupied(&self) -> bool {
        self.glyph.is_some()
    }
}

/// An overflow record for a glyph with more than one name.
#[derive(Debug)]
pub(crate) struct ExtraName {
    pub entry: NameEntry,
    /// Position of the glyph in the glyph table.
    pub slot: usize,
}

#[derive(Debug)]
pub(crate) struct NameTable {
    entries: Vec<NameEntry>,
    extra: Vec<ExtraName>,
}

impl NameTable {
    pub fn new(capacity: usize) -> Result<Self> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(capacity)?;
        entries.resize_with(capacity, NameEntry::default);
        Ok(NameTable { entries, extra: Vec::new() })
    }

    pub fn entry(&self, index: usize) -> &NameEntry {
        &self.entries[index]
    }

    pub fn entry_mut(&mut self, index: usize) -> &mut NameEntry {
        &mut self.entries[index]
    }

    /// Resolve a name key to a slot by double hashing.
    ///
    /// With the prime table size `n`, the reprobe step covers every slot, so
    /// the probe loop is bounded: the guard admits `n + 1` probe attempts
    /// (it is decremented after each non-matching probe), after which the
    /// key is reported undefined rather than looping. An unoccupied slot is
    /// returned as the key's insertion point.
    pub fn hashed_slot(&self, key: u32) -> Result<usize> {
        let n = self.entries.len() as u32;
        let mut hash = key % n;
        let step = (key / n * 2 + 1) % n;
        let mut tries = n;
        loop {
            let entry = &self.entries[hash as usize];
            if !entry.occupied() || entry.glyph == Some(GlyphId::Name(key)) {
                return Ok(hash as usize);
            }
            hash = (hash + step) % n;
            if tries == 0 {
                return Err(Error::Undefined);
            }
            tries -= 1;
        }
    }

    /// Resolve a name key to a slot by scanning the table, then the
    /// extra-name overflow list.
    pub fn linear_slot(&self, key: GlyphId) -> Result<usize> {
        if let Some(index) =
            self.entries.iter().position(|e| e.glyph == Some(key))
        {
            return Ok(index);
        }
        self.extra
            .iter()
            .find(|e| e.entry.glyph == Some(key))
            .map(|e| e.slot)
            .ok_or(Error::Range)
    }

    /// The canonical name recorded under `key`, wherever it lives.
    pub fn name_of(&self, key: GlyphId) -> Result<&[u8]> {
        if let Some(entry) =
            self.entries.iter().find(|e| e.glyph == Some(key))
        {
            return Ok(&entry.name);
        }
        self.extra
            .iter()
            .find(|e| e.entry.glyph == Some(key))
            .map(|e| e.entry.name.as_slice())
            .ok_or(Error::Undefined)
    }

    /// Record `name` for the glyph at `slot` under `key`.
    ///
    /// The first name takes the slot's primary entry; a different name for
    /// the same slot is appended to the overflow list. Re-recording the
    /// primary name just refreshes its key.
    pub fn record(&mut self, slot: usize, key: GlyphId, name: Vec<u8>) {
        let primary = &mut self.entries[slot];
        if primary.occupied() && primary.name != name {
            self.extra.push(ExtraName {
                entry: NameEntry { glyph: Some(key), name },
                slot,
            });
            return;
        }
        primary.glyph = Some(key);
        primary.name = name;
    }

    /// Drop the overflow names attached to `slot`.
    pub fn clear_extra(&mut self, slot: usize) {
        self.extra.retain(|e| e.slot != slot);
    }
}
