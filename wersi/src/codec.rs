//! The decode/encode contract shared by every DMS component

use crate::buffer::CapacityError;

/// The round-trip codec capability every component implements
///
/// Each component in a DMS instrument image — instrument control block, VCF, the two
/// envelopes and the wave — owns one region of the image and converts between that region
/// and its structured fields. [`dissect`](Codec::dissect) decodes the region,
/// [`update`](Codec::update) encodes it back byte-exact.
///
/// Field edits made through accessors stay in memory until `update` is called; there is
/// no implicit write-through. Conversely, re-running `dissect` reloads from the buffer
/// and discards any unsynced edits.
pub trait Codec {
    /// The block number identifying this component's hardware storage slot
    fn block(&self) -> u8;

    /// Decode the associated buffer region into the structured fields
    ///
    /// Fails when decoded data raises the capacity requirement above what construction
    /// validated (the fixed-formant wave variant). Idempotent on an unmodified buffer.
    fn dissect(&mut self) -> Result<(), CapacityError>;

    /// Write the structured fields back into the associated buffer region
    ///
    /// Infallible: every capacity requirement is validated at construction, during
    /// `dissect` or at copy time, so write-back stays inside the validated region.
    fn update(&mut self);
}
