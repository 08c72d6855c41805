//! The instrument control block (ICB)
//!
//! The ICB is the top-level per-instrument configuration record in a DMS instrument
//! image. Its individual fields have not been mapped out yet, so for now the record is
//! kept as raw bytes; that still round-trips every real image byte-exact, and the block
//! can grow real field accessors later without changing the [`Codec`] surface.

use crate::{
    buffer::{BufferView, CapacityError},
    codec::Codec,
};

/// One instrument control block, kept as an undecoded record
pub struct Icb<'a> {
    block: u8,
    view: BufferView<'a>,
    data: Vec<u8>,
}

impl<'a> Icb<'a> {
    /// Create an ICB codec over its region of the instrument image
    ///
    /// The region may not be empty; its exact length comes from the hardware model's
    /// [`Layout`](crate::store::Layout).
    pub fn new(block: u8, bytes: &'a mut [u8]) -> Result<Self, CapacityError> {
        let view = BufferView::new(bytes, 1)?;
        let data = view.bytes().to_vec();

        Ok(Self { block, view, data })
    }

    /// Access the raw record bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Access the raw record bytes for in-place editing
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Codec for Icb<'_> {
    fn block(&self) -> u8 {
        self.block
    }

    fn dissect(&mut self) -> Result<(), CapacityError> {
        self.view.copy_to(0, &mut self.data);
        Ok(())
    }

    fn update(&mut self) {
        self.view.copy_from(0, &self.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut bytes = [0x11, 0x22, 0x33, 0x44];
        let mut icb = Icb::new(5, bytes.as_mut_slice()).expect("construction failed");

        icb.dissect().expect("dissect failed");
        assert_eq!(icb.block(), 5);
        assert_eq!(icb.data(), &[0x11, 0x22, 0x33, 0x44]);

        icb.data_mut()[1] = 0xFF;
        icb.update();

        assert_eq!(bytes, [0x11, 0xFF, 0x33, 0x44]);
    }

    #[test]
    fn empty_region_is_rejected() {
        let mut bytes = [];
        assert!(Icb::new(0, bytes.as_mut_slice()).is_err());
    }
}
