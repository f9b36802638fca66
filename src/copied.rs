//! The copied font aggregate: owns all containers, orchestrates copy,
//! comparison, ordering and enumeration, and is itself a [`FontSource`].

use std::borrow::Cow;

use crate::cidmap::CidMap;
use crate::encoding::Encoding;
use crate::glyphs::{
    prime_capacity, GlyphTable, SlotRef, HAS_METRICS_H, HAS_METRICS_V,
};
use crate::names::NameTable;
use crate::source::{
    CidSystemInfo, FontSource, GlyphData, GlyphInfo, GlyphSpace, Metrics,
    OutlineHinting, TrueTypeHinting, WritingMode,
};
use crate::strategy::{self, GlyphCopy};
use crate::subrs::SubrStore;
use crate::{
    compare, CopyOptions, Error, FontType, GlyphId, Matrix, Result,
    EXTENSION_NAME_SEPARATOR, MAX_GLYPH_PIECES, MAX_PIECE_DEPTH,
};

/// Whether a glyph copy added new data or found it already present.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CopyStatus {
    /// The glyph was not present and has been stored.
    Added,
    /// The glyph was already present with identical bytes; nothing changed.
    AlreadyPresent,
}

/// One owned outline sub-font of a composite copy.
///
/// Sub-fonts hold only what they do not share with the parent: their name,
/// hinting parameters and local subroutines. Glyphs, names and global
/// subroutines live in the parent's tables.
#[derive(Debug)]
pub(crate) struct CopiedSubfont {
    pub font_name: Vec<u8>,
    pub hinting: OutlineHinting,
    pub local_subrs: SubrStore,
}

/// A standalone copy of a font, holding only what was copied into it.
///
/// Created by [`copy_font`](crate::copy_font), populated one glyph at a
/// time with [`CopiedFont::copy_glyph`] and handed to a serializer once
/// [`CopiedFont::order_font`] has fixed the enumeration order. Dropping the
/// copy releases everything, including owned sub-fonts.
pub struct CopiedFont {
    pub(crate) font_type: FontType,
    pub(crate) font_name: Vec<u8>,
    pub(crate) matrix: Matrix,
    pub(crate) wmode: WritingMode,
    pub(crate) glyphs: GlyphTable,
    pub(crate) names: Option<NameTable>,
    pub(crate) encoding: Option<Encoding>,
    pub(crate) cid_map: Option<CidMap>,
    pub(crate) local_subrs: SubrStore,
    pub(crate) global_subrs: SubrStore,
    /// Copied binary tables plus the synthesized metrics areas.
    pub(crate) data: Vec<u8>,
    /// Length of the table blob prefix of `data`.
    pub(crate) table_len: usize,
    /// Start of the per-wmode metrics areas within `data`.
    pub(crate) metrics_offset: [usize; 2],
    pub(crate) units_per_em: u16,
    pub(crate) subfonts: Vec<CopiedSubfont>,
    /// Width of the sub-font tag prefixed to each stored outline.
    pub(crate) fd_bytes: usize,
    pub(crate) outline_hinting: Option<OutlineHinting>,
    pub(crate) truetype_hinting: Option<TrueTypeHinting>,
    pub(crate) cid_system_info: Option<CidSystemInfo>,
    pub(crate) notdef: Option<GlyphId>,
    pub(crate) ordered: bool,
    /// Slot indices in enumeration order, filled by `order_font`.
    pub(crate) order: Vec<usize>,
}

impl CopiedFont {
    pub(crate) fn copy(
        source: &dyn FontSource,
        matrix: Matrix,
        max_reserved_glyphs: Option<usize>,
    ) -> Result<CopiedFont> {
        let font_type = source.font_type();
        let capacity = match font_type {
            FontType::Outline => {
                let counted =
                    source.enumerate_glyphs(GlyphSpace::Name).count();
                let clamped = match max_reserved_glyphs {
                    Some(max) => counted.min(max),
                    None => counted,
                };
                prime_capacity(clamped)?
            }
            FontType::TrueType => source.glyph_count(),
            FontType::CidOutline => source.max_cid() as usize + 1,
            FontType::CidTrueType => source.cid_count() as usize,
        };
        let names = match font_type {
            FontType::Outline | FontType::TrueType => {
                Some(NameTable::new(capacity)?)
            }
            _ => None,
        };

        let mut font = CopiedFont {
            font_type,
            font_name: source.font_name().to_vec(),
            matrix,
            wmode: source.writing_mode(),
            glyphs: GlyphTable::new(capacity)?,
            names,
            encoding: None,
            cid_map: None,
            local_subrs: SubrStore::new(),
            global_subrs: SubrStore::new(),
            data: Vec::new(),
            table_len: 0,
            metrics_offset: [0; 2],
            units_per_em: 0,
            subfonts: Vec::new(),
            fd_bytes: 0,
            outline_hinting: None,
            truetype_hinting: None,
            cid_system_info: None,
            notdef: None,
            ordered: false,
            order: Vec::new(),
        };
        strategy::finish_copy(&mut font, source)?;
        font.copy_notdef(source)?;
        Ok(font)
    }

    /// Copy the fallback glyph eagerly, so the copy can always substitute
    /// it. Tolerates sources that genuinely lack one.
    fn copy_notdef(&mut self, source: &dyn FontSource) -> Result<()> {
        let notdef = match self.font_type {
            FontType::Outline => {
                source.enumerate_glyphs(GlyphSpace::Name).find(|&g| {
                    source
                        .glyph_name(g)
                        .map_or(false, |n| n.as_ref() == b".notdef")
                })
            }
            FontType::TrueType => {
                (self.glyphs.capacity() > 0).then_some(GlyphId::Index(0))
            }
            FontType::CidOutline | FontType::CidTrueType => {
                Some(GlyphId::Cid(0))
            }
        };
        let Some(glyph) = notdef else { return Ok(()) };
        self.notdef = Some(glyph);
        let options = CopyOptions {
            by_index: matches!(glyph, GlyphId::Index(_)),
            ..Default::default()
        };
        match self.copy_glyph(source, glyph, options) {
            Ok(_) => Ok(()),
            Err(Error::Undefined) | Err(Error::Range) => {
                log::debug!("source font has no usable .notdef glyph");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Copy one glyph from `source` into this font.
    ///
    /// Composite glyphs are expanded through the source's piece enumeration
    /// and every piece is copied too, within fixed piece-count and depth
    /// limits. If any piece fails, everything this call added is removed
    /// again before the error is returned.
    pub fn copy_glyph(
        &mut self,
        source: &dyn FontSource,
        glyph: GlyphId,
        options: CopyOptions,
    ) -> Result<CopyStatus> {
        if self.ordered {
            return Err(Error::InvalidAccess);
        }
        let mut added = Vec::new();
        let mut budget = MAX_GLYPH_PIECES;
        let result = self
            .copy_glyph_inner(source, glyph, options, 0, &mut budget, &mut added);
        if result.is_err() {
            for copy in added.iter().rev() {
                strategy::uncopy(self, copy);
            }
        }
        result
    }

    fn copy_glyph_inner(
        &mut self,
        source: &dyn FontSource,
        glyph: GlyphId,
        options: CopyOptions,
        depth: usize,
        budget: &mut usize,
        added: &mut Vec<GlyphCopy>,
    ) -> Result<CopyStatus> {
        if depth > MAX_PIECE_DEPTH {
            return Err(Error::LimitExceeded);
        }
        if *budget == 0 {
            return Err(Error::LimitExceeded);
        }
        *budget -= 1;

        let copy = strategy::copy_glyph(self, source, glyph, options)?;
        let status = copy.status;
        let slot = copy.slot;
        if status == CopyStatus::AlreadyPresent {
            return Ok(status);
        }
        added.push(copy);

        let pieces = self.glyphs.slot(slot).pieces.clone();
        if !pieces.is_empty() {
            let mut piece_options = options;
            // A piece shared between composites may already be present.
            piece_options.must_be_new = false;
            if matches!(
                self.font_type,
                FontType::TrueType | FontType::CidTrueType
            ) {
                piece_options.by_index = true;
            }
            for piece in pieces {
                self.copy_glyph_inner(
                    source,
                    piece,
                    piece_options,
                    depth + 1,
                    budget,
                    added,
                )?;
                if self.font_type == FontType::TrueType
                    && matches!(glyph, GlyphId::Name(_))
                {
                    self.record_piece_name(source, piece);
                }
            }
        }
        Ok(status)
    }

    /// Give a by-index-copied piece of a name-keyed composite a name entry
    /// keyed by its glyph index, so name-space lookups and enumeration
    /// reach it. The source's name is preferred; a nameless piece gets a
    /// minted one.
    fn record_piece_name(&mut self, source: &dyn FontSource, piece: GlyphId) {
        let GlyphId::Index(gid) = piece else { return };
        let name = match source.glyph_name(piece) {
            Ok(name) => name.into_owned(),
            Err(_) => {
                let mut name = b"gid".to_vec();
                name.extend_from_slice(gid.to_string().as_bytes());
                name
            }
        };
        if let Some(names) = self.names.as_mut() {
            names.record(gid as usize, piece, name);
        }
    }

    /// Copy every reachable glyph and, for name-keyed fonts, the full
    /// character encoding. Glyphs the source enumerates but cannot deliver
    /// are skipped.
    pub fn copy_font_complete(
        &mut self,
        source: &dyn FontSource,
    ) -> Result<()> {
        for glyph in source.enumerate_glyphs(GlyphSpace::Name) {
            match self.copy_glyph(source, glyph, CopyOptions::default()) {
                Ok(_) => {}
                Err(Error::Undefined) => {
                    log::debug!("skipping undeliverable glyph {glyph:?}");
                }
                Err(err) => return Err(err),
            }
        }
        if self.font_type == FontType::TrueType {
            // Nameless glyphs are only reachable by index.
            let by_index =
                CopyOptions { by_index: true, ..Default::default() };
            for glyph in source.enumerate_glyphs(GlyphSpace::Index) {
                match self.copy_glyph(source, glyph, by_index) {
                    Ok(_) => {}
                    Err(Error::Undefined) => {
                        log::debug!("skipping undeliverable glyph {glyph:?}");
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        if matches!(self.font_type, FontType::Outline | FontType::TrueType) {
            for code in 0..256 {
                let Some(glyph) = source.encode_char(code, GlyphSpace::Name)
                else {
                    continue;
                };
                match self.add_encoding(code, glyph) {
                    Ok(()) => {}
                    Err(Error::Undefined) | Err(Error::Range) => {
                        log::debug!(
                            "code {code} maps to an uncopied glyph, skipping"
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(())
    }

    /// Map character `code` to `glyph` in the copy's encoding. Remapping a
    /// code to a different glyph is a conflict.
    pub fn add_encoding(&mut self, code: u32, glyph: GlyphId) -> Result<()> {
        if self.ordered {
            return Err(Error::InvalidAccess);
        }
        strategy::add_encoding(self, code, glyph)
    }

    /// Whether glyphs from `source` could be merged into this copy; see the
    /// gate sequence in the crate documentation. With `check_hinting`, the
    /// fonts' hinting state must match as well.
    pub fn can_copy_glyphs(
        &self,
        source: &dyn FontSource,
        glyphs: &[GlyphId],
        check_hinting: bool,
    ) -> Result<bool> {
        compare::can_copy_glyphs(self, source, glyphs, check_hinting)
    }

    /// Fix the enumeration order of a name-keyed font to the byte-wise
    /// lexicographic order of the glyph names. A successful no-op for the
    /// other types, which are already canonically ordered by CID or index.
    ///
    /// Ordering finalizes the copy; any later glyph or encoding mutation
    /// fails with [`Error::InvalidAccess`].
    pub fn order_font(&mut self) -> Result<()> {
        if self.font_type == FontType::Outline {
            let names = self.names.as_ref().ok_or(Error::Unregistered)?;
            let mut slots: Vec<usize> = self.glyphs.used_slots().collect();
            slots.sort_by(|&a, &b| {
                names.entry(a).name.cmp(&names.entry(b).name)
            });
            for (rank, &slot) in slots.iter().enumerate() {
                self.glyphs.slot_mut(slot).order_index = rank as i32;
            }
            self.order = slots;
        }
        self.ordered = true;
        Ok(())
    }

    /// The designated fallback glyph of this copy, if it has one.
    pub fn get_notdef(&self) -> Option<GlyphId> {
        self.notdef
    }

    /// Drop glyphs that were copied a second time under a synthetic
    /// extension name (marked with [`EXTENSION_NAME_SEPARATOR`]) when the
    /// glyph carrying the base name holds an identical outline. Extension
    /// glyphs that survive keep their slot but have the name truncated back
    /// to the base.
    pub fn drop_extension_glyphs(&mut self) -> Result<()> {
        if self.ordered {
            return Err(Error::InvalidAccess);
        }
        let Some(names) = self.names.as_mut() else { return Ok(()) };
        let glyphs = &mut self.glyphs;

        let mut doomed = Vec::new();
        let mut truncate = Vec::new();
        for slot in glyphs.used_slots() {
            let name = &names.entry(slot).name;
            let Some(base_len) = name
                .windows(EXTENSION_NAME_SEPARATOR.len())
                .position(|w| w == EXTENSION_NAME_SEPARATOR)
            else {
                continue;
            };
            let base = &name[..base_len];
            let data = &glyphs.slot(slot).data;
            let duplicated = glyphs.used_slots().any(|other| {
                other != slot
                    && names.entry(other).name.as_slice() == base
                    && &glyphs.slot(other).data == data
            });
            if duplicated {
                doomed.push(slot);
            } else {
                truncate.push((slot, base_len));
            }
        }
        for slot in doomed {
            glyphs.clear(slot);
            *names.entry_mut(slot) = Default::default();
            names.clear_extra(slot);
        }
        for (slot, len) in truncate {
            names.entry_mut(slot).name.truncate(len);
        }
        Ok(())
    }

    /// A byte-exact window into the copied binary tables, for serializers
    /// that consume them piecewise.
    pub fn table_data(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = offset.checked_add(len).ok_or(Error::Range)?;
        self.data.get(offset..end).ok_or(Error::Range)
    }

    /// Iterate over the copy's character encoding entries.
    pub fn encoded_chars(&self) -> impl Iterator<Item = (u32, GlyphId)> + '_ {
        self.encoding.iter().flat_map(|encoding| encoding.iter())
    }

    /// The number of glyphs currently copied.
    pub fn copied_glyph_count(&self) -> usize {
        self.glyphs.used_count()
    }

    /// The transformation matrix recorded at copy time.
    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    /// Store `prefix + bytes` into `slot`, enforcing the redefinition
    /// rules: an occupied slot only accepts a byte-identical redefinition,
    /// and then changes nothing.
    pub(crate) fn store_glyph(
        &mut self,
        slot: usize,
        prefix: &[u8],
        bytes: &[u8],
        options: CopyOptions,
    ) -> Result<CopyStatus> {
        let stored = self.glyphs.slot(slot);
        if stored.used() {
            if options.must_be_new {
                return Err(Error::InvalidAccess);
            }
            let same = stored.data.len() == prefix.len() + bytes.len()
                && stored.data[..prefix.len()] == *prefix
                && stored.data[prefix.len()..] == *bytes;
            if !same {
                return Err(Error::InvalidAccess);
            }
            return Ok(CopyStatus::AlreadyPresent);
        }
        if options.no_new {
            return Err(Error::Undefined);
        }
        self.glyphs.fill(slot, prefix, bytes)?;
        Ok(CopyStatus::Added)
    }

    /// Resolve a glyph reference to its slot, per this font's addressing.
    pub(crate) fn resolve_slot(&self, glyph: GlyphId) -> Result<SlotRef> {
        match self.font_type {
            FontType::Outline => match glyph {
                GlyphId::Name(key) => {
                    let names =
                        self.names.as_ref().ok_or(Error::Unregistered)?;
                    let index = names.hashed_slot(key)?;
                    Ok(SlotRef { index, used: self.glyphs.slot(index).used() })
                }
                GlyphId::Index(number) => self.glyphs.direct(number),
                GlyphId::Cid(_) => Err(Error::Unregistered),
            },
            FontType::TrueType => match glyph {
                GlyphId::Index(number) => self.glyphs.direct(number),
                GlyphId::Name(_) => {
                    let names =
                        self.names.as_ref().ok_or(Error::Unregistered)?;
                    let index = names.linear_slot(glyph)?;
                    Ok(SlotRef { index, used: self.glyphs.slot(index).used() })
                }
                GlyphId::Cid(_) => Err(Error::Unregistered),
            },
            FontType::CidOutline => match glyph {
                GlyphId::Cid(cid) => self.glyphs.direct(cid),
                _ => Err(Error::Unregistered),
            },
            FontType::CidTrueType => match glyph {
                GlyphId::Cid(cid) => {
                    let map =
                        self.cid_map.as_ref().ok_or(Error::Unregistered)?;
                    let gid = map.get(cid).ok_or(Error::Undefined)?;
                    self.glyphs.direct(gid)
                }
                GlyphId::Index(number) => self.glyphs.direct(number),
                GlyphId::Name(_) => Err(Error::Unregistered),
            },
        }
    }

    /// Write one glyph's metrics into the synthesized metrics area.
    pub(crate) fn record_metrics(
        &mut self,
        gid: u32,
        mode: WritingMode,
        metrics: Metrics,
    ) -> Result<()> {
        let scale = self.units_per_em as f32;
        let mut advance = metrics.advance * scale;
        if mode == WritingMode::Vertical {
            // Vertical advances point down; stored heights are positive.
            advance = -advance;
        }
        let w = advance.round().clamp(0.0, u16::MAX as f32) as u16;
        let sb = (metrics.side_bearing * scale)
            .round()
            .clamp(i16::MIN as f32, i16::MAX as f32) as i16;

        let offset = self.metrics_offset[mode.index()] + gid as usize * 4;
        let area =
            self.data.get_mut(offset..offset + 4).ok_or(Error::Range)?;
        area[..2].copy_from_slice(&w.to_be_bytes());
        area[2..].copy_from_slice(&sb.to_be_bytes());

        let flag = match mode {
            WritingMode::Horizontal => HAS_METRICS_H,
            WritingMode::Vertical => HAS_METRICS_V,
        };
        self.glyphs.slot_mut(gid as usize).flags |= flag;
        Ok(())
    }

    /// Read one glyph's metrics back from the metrics area.
    fn stored_metrics(&self, gid: u32, mode: WritingMode) -> Option<Metrics> {
        let slot = self.glyphs.slot(gid as usize);
        let flag = match mode {
            WritingMode::Horizontal => HAS_METRICS_H,
            WritingMode::Vertical => HAS_METRICS_V,
        };
        if slot.flags & flag == 0 {
            return None;
        }
        let offset = self.metrics_offset[mode.index()] + gid as usize * 4;
        let area = self.data.get(offset..offset + 4)?;
        let scale = self.units_per_em as f32;
        let mut advance = u16::from_be_bytes([area[0], area[1]]) as f32;
        if mode == WritingMode::Vertical {
            advance = -advance;
        }
        let side_bearing =
            i16::from_be_bytes([area[2], area[3]]) as f32 / scale;
        Some(Metrics { advance: advance / scale, side_bearing })
    }

    /// Glyph ids of all used slots, keyed the way this font type addresses
    /// its glyphs.
    fn named_slots(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.glyphs.used_slots().filter_map(move |slot| {
            self.names.as_ref().and_then(|n| n.entry(slot).glyph)
        })
    }
}

impl FontSource for CopiedFont {
    fn font_type(&self) -> FontType {
        self.font_type
    }

    fn font_name(&self) -> &[u8] {
        &self.font_name
    }

    fn writing_mode(&self) -> WritingMode {
        self.wmode
    }

    fn glyph_count(&self) -> usize {
        self.glyphs.capacity()
    }

    fn max_cid(&self) -> u32 {
        match self.font_type {
            FontType::CidOutline => {
                self.glyphs.capacity().saturating_sub(1) as u32
            }
            _ => 0,
        }
    }

    fn cid_count(&self) -> u32 {
        match self.font_type {
            FontType::CidTrueType => self.glyphs.capacity() as u32,
            _ => 0,
        }
    }

    fn cid_system_info(&self) -> Option<&CidSystemInfo> {
        self.cid_system_info.as_ref()
    }

    fn enumerate_glyphs(
        &self,
        space: GlyphSpace,
    ) -> Box<dyn Iterator<Item = GlyphId> + '_> {
        match (self.font_type, space) {
            (FontType::Outline, GlyphSpace::Name) if self.ordered => {
                Box::new(self.order.iter().filter_map(move |&slot| {
                    self.names.as_ref().and_then(|n| n.entry(slot).glyph)
                }))
            }
            (FontType::Outline, GlyphSpace::Name)
            | (FontType::TrueType, GlyphSpace::Name) => {
                Box::new(self.named_slots())
            }
            (FontType::Outline, GlyphSpace::Index)
            | (FontType::TrueType, GlyphSpace::Index)
            | (FontType::CidTrueType, GlyphSpace::Index) => Box::new(
                self.glyphs
                    .used_slots()
                    .map(|slot| GlyphId::Index(slot as u32)),
            ),
            (FontType::CidOutline, _) => Box::new(
                self.glyphs.used_slots().map(|slot| GlyphId::Cid(slot as u32)),
            ),
            (FontType::CidTrueType, GlyphSpace::Name) => {
                match self.cid_map.as_ref() {
                    Some(map) => Box::new(
                        map.iter().map(|(cid, _)| GlyphId::Cid(cid)),
                    ),
                    None => Box::new(std::iter::empty()),
                }
            }
        }
    }

    fn glyph_name(&self, glyph: GlyphId) -> Result<Cow<'_, [u8]>> {
        let names = self.names.as_ref().ok_or(Error::Unregistered)?;
        names.name_of(glyph).map(Cow::Borrowed)
    }

    fn glyph_data(&self, glyph: GlyphId) -> Result<GlyphData<'_>> {
        let slot = self.resolve_slot(glyph)?;
        if !slot.used {
            return Err(Error::Undefined);
        }
        let data = &self.glyphs.slot(slot.index).data;
        if self.font_type == FontType::CidOutline {
            if data.len() < self.fd_bytes {
                return Err(Error::Unregistered);
            }
            let (tag, bytes) = data.split_at(self.fd_bytes);
            let subfont =
                tag.iter().fold(0usize, |acc, &b| acc << 8 | b as usize);
            return Ok(GlyphData { bytes: Cow::Borrowed(bytes), subfont });
        }
        Ok(GlyphData { bytes: Cow::Borrowed(data), subfont: 0 })
    }

    fn glyph_info(&self, glyph: GlyphId) -> Result<GlyphInfo> {
        let slot = self.resolve_slot(glyph)?;
        if !slot.used {
            return Err(Error::Undefined);
        }
        Ok(self.glyphs.slot(slot.index).info)
    }

    fn glyph_pieces(&self, glyph: GlyphId) -> Result<Vec<GlyphId>> {
        let slot = self.resolve_slot(glyph)?;
        if !slot.used {
            return Err(Error::Undefined);
        }
        Ok(self.glyphs.slot(slot.index).pieces.clone())
    }

    fn glyph_metrics(
        &self,
        glyph: GlyphId,
        mode: WritingMode,
    ) -> Option<Metrics> {
        if !matches!(
            self.font_type,
            FontType::TrueType | FontType::CidTrueType
        ) {
            return None;
        }
        let slot = self.resolve_slot(glyph).ok()?;
        self.stored_metrics(slot.index as u32, mode)
    }

    fn glyph_index(&self, glyph: GlyphId) -> Option<u32> {
        match self.font_type {
            FontType::TrueType => match glyph {
                GlyphId::Index(gid) => Some(gid),
                GlyphId::Name(_) => self
                    .names
                    .as_ref()?
                    .linear_slot(glyph)
                    .ok()
                    .map(|slot| slot as u32),
                GlyphId::Cid(_) => None,
            },
            FontType::CidTrueType => match glyph {
                GlyphId::Cid(cid) => self.cid_map.as_ref()?.get(cid),
                GlyphId::Index(gid) => Some(gid),
                GlyphId::Name(_) => None,
            },
            _ => None,
        }
    }

    fn encode_char(&self, code: u32, space: GlyphSpace) -> Option<GlyphId> {
        let glyph = self.encoding.as_ref()?.get(code)?;
        match (glyph, space) {
            (GlyphId::Name(_), GlyphSpace::Name)
            | (GlyphId::Index(_), GlyphSpace::Index) => Some(glyph),
            (GlyphId::Name(_), GlyphSpace::Index) => {
                self.glyph_index(glyph).map(GlyphId::Index)
            }
            (GlyphId::Index(gid), GlyphSpace::Name) => {
                self.names.as_ref()?.entry(gid as usize).glyph
            }
            (GlyphId::Cid(_), _) => None,
        }
    }

    fn subr_data(&self, index: usize, global: bool) -> Result<Cow<'_, [u8]>> {
        let store =
            if global { &self.global_subrs } else { &self.local_subrs };
        store.get(index).map(Cow::Borrowed)
    }

    fn stripped_tables(&self) -> Result<Vec<u8>> {
        match self.font_type {
            FontType::TrueType | FontType::CidTrueType => {
                Ok(self.data[..self.table_len].to_vec())
            }
            _ => Err(Error::Unregistered),
        }
    }

    fn outline_hinting(&self) -> Option<&OutlineHinting> {
        self.outline_hinting.as_ref()
    }

    fn truetype_hinting(&self) -> Option<&TrueTypeHinting> {
        self.truetype_hinting.as_ref()
    }

    fn subfont_count(&self) -> usize {
        self.subfonts.len()
    }

    fn subfont_name(&self, index: usize) -> Option<&[u8]> {
        self.subfonts.get(index).map(|sub| sub.font_name.as_slice())
    }

    fn subfont_hinting(&self, index: usize) -> Option<&OutlineHinting> {
        self.subfonts.get(index).map(|sub| &sub.hinting)
    }

    fn subfont_subr_data(
        &self,
        subfont: usize,
        index: usize,
        global: bool,
    ) -> Result<Cow<'_, [u8]>> {
        if global {
            return self.global_subrs.get(index).map(Cow::Borrowed);
        }
        let sub = self.subfonts.get(subfont).ok_or(Error::Range)?;
        sub.local_subrs.get(index).map(Cow::Borrowed)
    }
}
