//! The Wersi DMS instrument store
//!
//! An instrument store aggregates every component found in one raw instrument image:
//! instrument control blocks, VCFs, amplitude and frequency envelopes and waves, each
//! keyed by its hardware block number. Where each block lives inside the image differs
//! per hardware model (cartridge, device RAM dump, ...), so a store is built from a
//! [`Layout`] describing those byte ranges.
//!
//! Construction carves the image into the described regions exactly once, using
//! [`split_at_mut`](slice::split_at_mut), after checking that the regions are pairwise
//! disjoint. Overlapping component views are therefore unrepresentable; one component's
//! [`update`](Codec::update) can never clobber another's region.

use crate::{
    buffer::CapacityError,
    codec::Codec,
    envelope::Envelope,
    icb::Icb,
    vcf::Vcf,
    wave::Wave,
};
use std::{collections::BTreeMap, fmt, mem, ops::Range};
use thiserror::Error;

/// The five component collections an instrument store aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Instrument control blocks
    Icb,

    /// VCF (filter) records
    Vcf,

    /// Amplitude envelope records
    AmplEnvelope,

    /// Frequency envelope records
    FreqEnvelope,

    /// Wave blocks
    Wave,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Icb => "ICB",
            Kind::Vcf => "VCF",
            Kind::AmplEnvelope => "amplitude envelope",
            Kind::FreqEnvelope => "frequency envelope",
            Kind::Wave => "wave",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug, Clone)]
struct Entry {
    kind: Kind,
    block: u8,
    range: Range<usize>,
}

/// A description of where each component block lives inside an instrument image
///
/// Concrete hardware models define their own block maps; a layout captures one such map
/// as a set of `(collection, block number, byte range)` entries:
///
/// ```
/// use wersi::store::Layout;
///
/// let layout = Layout::new()
///     .icb(1, 0x00..0x10)
///     .wave(1, 0x10..0xC2);
/// ```
///
/// Validation happens when the layout is applied to an image in
/// [`InstrumentStore::new`], not while building it up.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    entries: Vec<Entry>,
}

impl Layout {
    /// Create an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instrument control block region
    pub fn icb(self, block: u8, range: Range<usize>) -> Self {
        self.entry(Kind::Icb, block, range)
    }

    /// Add a VCF region
    pub fn vcf(self, block: u8, range: Range<usize>) -> Self {
        self.entry(Kind::Vcf, block, range)
    }

    /// Add an amplitude envelope region
    pub fn ampl_envelope(self, block: u8, range: Range<usize>) -> Self {
        self.entry(Kind::AmplEnvelope, block, range)
    }

    /// Add a frequency envelope region
    pub fn freq_envelope(self, block: u8, range: Range<usize>) -> Self {
        self.entry(Kind::FreqEnvelope, block, range)
    }

    /// Add a wave region
    pub fn wave(self, block: u8, range: Range<usize>) -> Self {
        self.entry(Kind::Wave, block, range)
    }

    fn entry(mut self, kind: Kind, block: u8, range: Range<usize>) -> Self {
        self.entries.push(Entry { kind, block, range });
        self
    }
}

/// All components stored in one raw instrument image
///
/// The store borrows the image for its entire lifetime; nothing else can touch the bytes
/// while it exists. Decoding and encoding are both explicit: [`dissect`](InstrumentStore::dissect)
/// reads every component's region into structured state, and edits made through the
/// component accessors only reach the image on [`update`](InstrumentStore::update).
pub struct InstrumentStore<'a> {
    icb: BTreeMap<u8, Icb<'a>>,
    vcf: BTreeMap<u8, Vcf<'a>>,
    ampl: BTreeMap<u8, Envelope<'a>>,
    freq: BTreeMap<u8, Envelope<'a>>,
    wave: BTreeMap<u8, Wave<'a>>,
}

impl<'a> InstrumentStore<'a> {
    /// Carve `bytes` into the regions `layout` describes and build all component codecs
    ///
    /// Every region must lie inside the image, regions must be pairwise disjoint, block
    /// numbers must be unique per collection, and each region must be large enough for
    /// its component type. No decoding happens yet; call
    /// [`dissect`](InstrumentStore::dissect) next.
    pub fn new(bytes: &'a mut [u8], layout: &Layout) -> Result<Self, LayoutError> {
        let mut entries: Vec<&Entry> = layout.entries.iter().collect();
        entries.sort_by_key(|entry| entry.range.start);

        let mut store = Self {
            icb: BTreeMap::new(),
            vcf: BTreeMap::new(),
            ampl: BTreeMap::new(),
            freq: BTreeMap::new(),
            wave: BTreeMap::new(),
        };

        let image_len = bytes.len();
        let mut rest = bytes;
        let mut pos = 0;

        for entry in entries {
            if entry.range.start > entry.range.end || entry.range.end > image_len {
                return Err(LayoutError::OutOfBounds {
                    kind: entry.kind,
                    block: entry.block,
                    image_len,
                });
            }

            if entry.range.start < pos {
                return Err(LayoutError::Overlap {
                    kind: entry.kind,
                    block: entry.block,
                });
            }

            // Split off everything up to the region's end, then the region itself; the
            // remainder is what later (higher) regions are carved from.
            let (head, tail) = mem::take(&mut rest).split_at_mut(entry.range.end - pos);
            let (_, region) = head.split_at_mut(entry.range.start - pos);
            rest = tail;
            pos = entry.range.end;

            store.insert(entry.kind, entry.block, region)?;
        }

        Ok(store)
    }

    fn insert(
        &mut self,
        kind: Kind,
        block: u8,
        region: &'a mut [u8],
    ) -> Result<(), LayoutError> {
        let capacity = |source| LayoutError::Capacity {
            kind,
            block,
            source,
        };

        let duplicate = match kind {
            Kind::Icb => self
                .icb
                .insert(block, Icb::new(block, region).map_err(capacity)?)
                .is_some(),
            Kind::Vcf => self
                .vcf
                .insert(block, Vcf::new(block, region).map_err(capacity)?)
                .is_some(),
            Kind::AmplEnvelope => self
                .ampl
                .insert(block, Envelope::new(block, region).map_err(capacity)?)
                .is_some(),
            Kind::FreqEnvelope => self
                .freq
                .insert(block, Envelope::new(block, region).map_err(capacity)?)
                .is_some(),
            Kind::Wave => self
                .wave
                .insert(block, Wave::new(block, region).map_err(capacity)?)
                .is_some(),
        };

        if duplicate {
            return Err(LayoutError::DuplicateBlock { kind, block });
        }

        Ok(())
    }

    /// Decode every component's region into structured state
    ///
    /// Fails fast: the first component that cannot be decoded aborts the call and its
    /// error is reported with the component's kind and block number. A half-decoded
    /// instrument is not a usable result, so no partial recovery is attempted.
    /// Idempotent on an unmodified image.
    pub fn dissect(&mut self) -> Result<(), DissectError> {
        dissect_all(Kind::Icb, &mut self.icb)?;
        dissect_all(Kind::Vcf, &mut self.vcf)?;
        dissect_all(Kind::AmplEnvelope, &mut self.ampl)?;
        dissect_all(Kind::FreqEnvelope, &mut self.freq)?;
        dissect_all(Kind::Wave, &mut self.wave)?;

        Ok(())
    }

    /// Write every component's structured state back into the image
    ///
    /// This is the only point at which in-memory edits reach the image.
    pub fn update(&mut self) {
        update_all(&mut self.icb);
        update_all(&mut self.vcf);
        update_all(&mut self.ampl);
        update_all(&mut self.freq);
        update_all(&mut self.wave);
    }

    /// Iterate over the instrument control blocks, ascending by block number
    pub fn icbs(&self) -> impl Iterator<Item = (u8, &Icb<'a>)> {
        self.icb.iter().map(|(block, icb)| (*block, icb))
    }

    /// Look up an instrument control block
    pub fn icb(&self, block: u8) -> Option<&Icb<'a>> {
        self.icb.get(&block)
    }

    /// Look up an instrument control block for editing
    pub fn icb_mut(&mut self, block: u8) -> Option<&mut Icb<'a>> {
        self.icb.get_mut(&block)
    }

    /// Look up a VCF record
    pub fn vcf(&self, block: u8) -> Option<&Vcf<'a>> {
        self.vcf.get(&block)
    }

    /// Look up a VCF record for editing
    pub fn vcf_mut(&mut self, block: u8) -> Option<&mut Vcf<'a>> {
        self.vcf.get_mut(&block)
    }

    /// Look up an amplitude envelope
    pub fn ampl_envelope(&self, block: u8) -> Option<&Envelope<'a>> {
        self.ampl.get(&block)
    }

    /// Look up an amplitude envelope for editing
    pub fn ampl_envelope_mut(&mut self, block: u8) -> Option<&mut Envelope<'a>> {
        self.ampl.get_mut(&block)
    }

    /// Look up a frequency envelope
    pub fn freq_envelope(&self, block: u8) -> Option<&Envelope<'a>> {
        self.freq.get(&block)
    }

    /// Look up a frequency envelope for editing
    pub fn freq_envelope_mut(&mut self, block: u8) -> Option<&mut Envelope<'a>> {
        self.freq.get_mut(&block)
    }

    /// Look up a wave
    pub fn wave(&self, block: u8) -> Option<&Wave<'a>> {
        self.wave.get(&block)
    }

    /// Look up a wave for editing
    pub fn wave_mut(&mut self, block: u8) -> Option<&mut Wave<'a>> {
        self.wave.get_mut(&block)
    }
}

fn dissect_all<C: Codec>(kind: Kind, map: &mut BTreeMap<u8, C>) -> Result<(), DissectError> {
    for (block, codec) in map.iter_mut() {
        codec.dissect().map_err(|source| DissectError {
            kind,
            block: *block,
            source,
        })?;
    }

    Ok(())
}

fn update_all<C: Codec>(map: &mut BTreeMap<u8, C>) {
    for codec in map.values_mut() {
        codec.update();
    }
}

/// Errors that might occur applying a [`Layout`] to an instrument image
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A region reaches past the end of the image (or is inverted)
    #[error("The {kind} block {block} region does not fit the {image_len}-byte image")]
    OutOfBounds {
        /// The collection the offending region belongs to
        kind: Kind,

        /// The offending region's block number
        block: u8,

        /// The length of the image the layout was applied to
        image_len: usize,
    },

    /// Two regions overlap; component views must be pairwise disjoint
    #[error("The {kind} block {block} region overlaps another region")]
    Overlap {
        /// The collection the offending region belongs to
        kind: Kind,

        /// The offending region's block number
        block: u8,
    },

    /// The same block number was assigned twice within one collection
    #[error("The {kind} collection already contains block {block}")]
    DuplicateBlock {
        /// The collection the block was assigned to twice
        kind: Kind,

        /// The duplicated block number
        block: u8,
    },

    /// A region is too small for its component type
    #[error("The {kind} block {block} region cannot hold its component")]
    Capacity {
        /// The collection the offending region belongs to
        kind: Kind,

        /// The offending region's block number
        block: u8,

        /// The underlying capacity error
        source: CapacityError,
    },
}

/// Error for when decoding one of the components of an [`InstrumentStore`] failed
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Dissecting the {kind} block {block} failed")]
pub struct DissectError {
    /// The collection the failing component belongs to
    pub kind: Kind,

    /// The failing component's block number
    pub block: u8,

    /// The underlying capacity error
    #[source]
    pub source: CapacityError,
}
