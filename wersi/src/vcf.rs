//! The VCF (filter) configuration record
//!
//! Like the [ICB](crate::icb), the filter record's field layout is not decoded yet and
//! the block is carried as raw bytes.

use crate::{
    buffer::{BufferView, CapacityError},
    codec::Codec,
};

/// One VCF record, kept as an undecoded record
pub struct Vcf<'a> {
    block: u8,
    view: BufferView<'a>,
    data: Vec<u8>,
}

impl<'a> Vcf<'a> {
    /// Create a VCF codec over its (non-empty) region of the instrument image
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

impl Codec for Vcf<'_> {
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
