//! Storage for copied charstring subroutines.
//!
//! All subroutines of one set live in a single byte arena with an offset
//! table on the side: subroutine `i` occupies `data[starts[i]..starts[i + 1]]`.
//! The store is built once per font copy and immutable afterwards.

use std::borrow::Cow;

use crate::{Error, Result, SubrDigest};

/// A flat arena of copied subroutines with an offset table.
#[derive(Debug, Default)]
pub struct SubrStore {
    data: Vec<u8>,
    /// `count + 1` running offsets into `data`; empty when there are no
    /// subroutines at all.
    starts: Vec<usize>,
}

impl SubrStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored subroutines.
    pub fn count(&self) -> usize {
        self.starts.len().saturating_sub(1)
    }

    /// The bytes of subroutine `index`.
    pub fn get(&self, index: usize) -> Result<&[u8]> {
        if index >= self.count() {
            return Err(Error::Range);
        }
        Ok(&self.data[self.starts[index]..self.starts[index + 1]])
    }

    /// Build a store by walking a subroutine enumeration twice.
    ///
    /// The first pass only sums sizes; the second allocates one arena of the
    /// summed size and copies the bytes. The enumeration ends when `fetch`
    /// reports [`Error::Range`]; any other error marks that index as an
    /// empty subroutine, preserving the numbering.
    pub fn copy_from<'a, F>(mut fetch: F) -> Result<SubrStore>
    where
        F: FnMut(usize) -> Result<Cow<'a, [u8]>>,
    {
        // Sizing pass.
        let mut count = 0;
        let mut size = 0;
        loop {
            match fetch(count) {
                Ok(bytes) => size += bytes.len(),
                Err(Error::Range) => break,
                Err(_) => {}
            }
            count += 1;
        }

        if size == 0 && count == 0 {
            return Ok(SubrStore::new());
        }

        let mut data = Vec::new();
        data.try_reserve_exact(size)?;
        let mut starts = Vec::new();
        starts.try_reserve_exact(count + 1)?;

        // Copying pass.
        for i in 0..count {
            starts.push(data.len());
            if let Ok(bytes) = fetch(i) {
                data.extend_from_slice(&bytes);
            }
        }
        starts.push(data.len());

        Ok(SubrStore { data, starts })
    }
}

/// Digest a subroutine enumeration: globals first, then locals, with the two
/// counts kept separately.
pub(crate) fn digest<'a, F>(mut fetch: F) -> Result<SubrDigest>
where
    F: FnMut(usize, bool) -> Result<Cow<'a, [u8]>>,
{
    let mut context = md5::Context::new();
    let mut counts = [0usize; 2];
    for (which, global) in [true, false].into_iter().enumerate() {
        let mut i = 0;
        loop {
            match fetch(i, global) {
                Ok(bytes) => context.consume(&bytes),
                Err(Error::Range) => break,
                Err(e) => return Err(e),
            }
            i += 1;
        }
        counts[which] = i;
    }
    Ok(SubrDigest { hash: context.compute().0, globals: counts[0], locals: counts[1] })
}
