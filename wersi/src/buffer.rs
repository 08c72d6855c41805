//! Bounded views into raw instrument memory
//!
//! Every component codec in this crate reads and writes a fixed region inside a larger
//! instrument image. [`BufferView`] is that region plus a validated length: it is handed
//! out once when the image is carved up (see [`InstrumentStore`](crate::store::InstrumentStore))
//! and all fixed-offset access goes through it, so no codec can ever address bytes that
//! belong to a sibling.

use thiserror::Error;

/// A non-owning, mutable view over a fixed-size byte region
///
/// Construction validates the region against a required minimum length, and
/// [`require`](BufferView::require) re-validates larger requirements discovered later
/// (the fixed-formant wave variant needs more room than its construction-time minimum).
/// The view never resizes and never reads or writes outside the region it was built over.
#[derive(Debug)]
pub struct BufferView<'a> {
    bytes: &'a mut [u8],
}

impl<'a> BufferView<'a> {
    /// Create a view over `bytes`, requiring at least `required` bytes
    pub fn new(bytes: &'a mut [u8], required: usize) -> Result<Self, CapacityError> {
        if bytes.len() < required {
            return Err(CapacityError {
                required,
                available: bytes.len(),
            });
        }

        Ok(Self { bytes })
    }

    /// The number of bytes in the view
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Is the view empty?
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check whether the view holds at least `required` bytes
    ///
    /// Capacity requirements that depend on decoded data (rather than on the component
    /// type alone) are checked through this before any access past the construction-time
    /// minimum.
    pub fn require(&self, required: usize) -> Result<(), CapacityError> {
        if self.bytes.len() < required {
            return Err(CapacityError {
                required,
                available: self.bytes.len(),
            });
        }

        Ok(())
    }

    /// Read the byte at `offset`
    pub fn byte(&self, offset: usize) -> u8 {
        self.bytes[offset]
    }

    /// Write the byte at `offset`
    pub fn set_byte(&mut self, offset: usize, value: u8) {
        self.bytes[offset] = value;
    }

    /// Copy `dest.len()` bytes starting at `offset` out of the view
    pub fn copy_to(&self, offset: usize, dest: &mut [u8]) {
        dest.copy_from_slice(&self.bytes[offset..offset + dest.len()]);
    }

    /// Copy `source` into the view, starting at `offset`
    pub fn copy_from(&mut self, offset: usize, source: &[u8]) {
        self.bytes[offset..offset + source.len()].copy_from_slice(source);
    }

    /// Access the viewed bytes
    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }
}

/// Error for when a byte region is smaller than an operation needs it to be
///
/// This is returned from every capacity check in the crate: component construction,
/// the fixed-formant re-validation during [`dissect`](crate::codec::Codec::dissect)
/// and the content-copy precondition in [`Wave::copy_from`](crate::wave::Wave::copy_from).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("The buffer holds {available} bytes, but at least {required} are required")]
pub struct CapacityError {
    /// The minimal number of bytes the operation needed
    pub required: usize,

    /// The number of bytes actually available
    pub available: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undersized_region_is_rejected() {
        let mut bytes = [0; 4];
        assert_eq!(
            BufferView::new(bytes.as_mut_slice(), 8).unwrap_err(),
            CapacityError {
                required: 8,
                available: 4
            }
        );
    }

    #[test]
    fn require_checks_beyond_the_construction_minimum() {
        let mut bytes = [0; 8];
        let view = BufferView::new(bytes.as_mut_slice(), 4).expect("view rejected");

        assert_eq!(view.len(), 8);
        assert_eq!(view.require(8), Ok(()));
        assert_eq!(
            view.require(9),
            Err(CapacityError {
                required: 9,
                available: 8
            })
        );
    }

    #[test]
    fn read_write_primitives() {
        let mut bytes = [0; 8];
        let mut view = BufferView::new(bytes.as_mut_slice(), 8).expect("view rejected");

        view.set_byte(0, 0xAA);
        view.copy_from(4, &[1, 2, 3, 4]);

        assert_eq!(view.byte(0), 0xAA);

        let mut window = [0; 4];
        view.copy_to(4, &mut window);
        assert_eq!(window, [1, 2, 3, 4]);

        assert_eq!(view.bytes(), &[0xAA, 0, 0, 0, 1, 2, 3, 4]);
    }
}
