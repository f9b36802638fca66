//! The CID-to-glyph-index map of map-keyed composite fonts.

use crate::Result;

/// The sentinel marking a CID with no glyph index assigned yet.
const UNMAPPED: u32 = u32::MAX;

/// A growable map from CIDs to glyph indices.
///
/// Growth is by exact reallocation: old entries are preserved, new ones are
/// filled with the unmapped sentinel. The map never shrinks.
#[derive(Debug)]
pub(crate) struct CidMap {
    entries: Vec<u32>,
}

impl CidMap {
    /// Create a map for `count` CIDs, all unmapped.
    pub fn new(count: usize) -> Result<Self> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(count)?;
        entries.resize(count, UNMAPPED);
        Ok(CidMap { entries })
    }

    /// The number of addressable CIDs.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// The glyph index assigned to `cid`, if any.
    pub fn get(&self, cid: u32) -> Option<u32> {
        match self.entries.get(cid as usize) {
            Some(&UNMAPPED) | None => None,
            Some(&gid) => Some(gid),
        }
    }

    /// Assign `gid` to `cid`. The caller has already checked bounds and
    /// conflicts.
    pub fn set(&mut self, cid: u32, gid: u32) {
        self.entries[cid as usize] = gid;
    }

    /// Return `cid` to the unmapped state.
    pub fn clear(&mut self, cid: u32) {
        if let Some(entry) = self.entries.get_mut(cid as usize) {
            *entry = UNMAPPED;
        }
    }

    /// Iterate over all mapped CIDs and their glyph indices.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, &gid)| gid != UNMAPPED)
            .map(|(cid, &gid)| (cid as u32, gid))
    }

    /// Grow the map to `new_count` CIDs. A no-op if it is already as large.
    pub fn expand(&mut self, new_count: usize) -> Result<()> {
        if new_count <= self.entries.len() {
            return Ok(());
        }
        let mut entries = Vec::new();
        entries.try_reserve_exact(new_count)?;
        entries.extend_from_slice(&self.entries);
        entries.resize(new_count, UNMAPPED);
        self.entries = entries;
        Ok(())
    }
}
