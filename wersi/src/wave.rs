//! Wersi DMS wave data
//!
//! A wave block stores the raw PCM material an instrument plays, split over four note
//! ranges. Two incompatible hardware variants exist: *relative formant* waves consist of
//! just the four PCM tables, while *fixed formant* waves append a formant synthesis
//! configuration block after the tables. Only relative formant waves are completely
//! understood; the fixed formant configuration is carried verbatim so that it survives a
//! round trip.
//!
//! The on-wire layout (byte-exact hardware contract):
//!
//! ```text
//! [format:1][level:1][bass:64][tenor:64][alto:32][soprano:16]{+[formant:35]}
//! ```

use crate::{
    buffer::{BufferView, CapacityError},
    codec::Codec,
};
use std::ops::Range;

const FORMAT_OFFSET: usize = 0x00;
const LEVEL_OFFSET: usize = 0x01;
const BASS_RANGE: Range<usize> = 0x02..0x42;
const TENOR_RANGE: Range<usize> = 0x42..0x82;
const ALTO_RANGE: Range<usize> = 0x82..0xA2;
const SOPRANO_RANGE: Range<usize> = 0xA2..0xB2;
const FORMANT_RANGE: Range<usize> = 0xB2..0xD5;

/// The structured contents of a wave block
///
/// This is a plain value type: cloning it duplicates all wave material, and
/// [`Wave::copy_from`] moves it between wave slots. The format discriminator is kept as
/// the raw byte the hardware wrote (any nonzero value marks fixed formants), so encoding
/// reproduces the original image even for discriminator values this crate does not
/// interpret further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveData {
    format: u8,
    level: u8,
    bass: [u8; 64],
    tenor: [u8; 64],
    alto: [u8; 32],
    soprano: [u8; 16],
    formant: [u8; 35],
}

impl WaveData {
    /// Is this a fixed formants wave?
    pub fn fixed_formants(&self) -> bool {
        self.format != 0
    }

    /// The wave level
    pub fn level(&self) -> u8 {
        self.level
    }

    /// The 64-byte bass wave
    pub fn bass(&self) -> &[u8; 64] {
        &self.bass
    }

    /// The 64-byte bass wave, for in-place editing
    pub fn bass_mut(&mut self) -> &mut [u8; 64] {
        &mut self.bass
    }

    /// The 64-byte tenor wave
    pub fn tenor(&self) -> &[u8; 64] {
        &self.tenor
    }

    /// The 64-byte tenor wave, for in-place editing
    pub fn tenor_mut(&mut self) -> &mut [u8; 64] {
        &mut self.tenor
    }

    /// The 32-byte alto wave
    pub fn alto(&self) -> &[u8; 32] {
        &self.alto
    }

    /// The 32-byte alto wave, for in-place editing
    pub fn alto_mut(&mut self) -> &mut [u8; 32] {
        &mut self.alto
    }

    /// The 16-byte soprano wave
    pub fn soprano(&self) -> &[u8; 16] {
        &self.soprano
    }

    /// The 16-byte soprano wave, for in-place editing
    pub fn soprano_mut(&mut self) -> &mut [u8; 16] {
        &mut self.soprano
    }

    /// The 35-byte fixed formant configuration block
    ///
    /// Only meaningful when [`fixed_formants`](WaveData::fixed_formants) is set; for
    /// relative formant waves the block stays zeroed and is never encoded.
    pub fn formant(&self) -> &[u8; 35] {
        &self.formant
    }

    /// The number of buffer bytes this wave's variant occupies when encoded
    pub fn encoded_len(&self) -> usize {
        if self.fixed_formants() {
            Wave::FIXED_FORMANT_LEN
        } else {
            Wave::RELATIVE_FORMANT_LEN
        }
    }
}

impl Default for WaveData {
    fn default() -> Self {
        Self {
            format: 0,
            level: 0,
            bass: [0; 64],
            tenor: [0; 64],
            alto: [0; 32],
            soprano: [0; 16],
            formant: [0; 35],
        }
    }
}

/// The codec for one wave slot in an instrument image
///
/// A [`Wave`] ties a block number and a [`BufferView`] over the slot's region to the
/// [`WaveData`] decoded from it. Construction only validates that the region can hold
/// the smaller (relative formant) variant; decoding happens on an explicit
/// [`dissect`](Codec::dissect) call, which re-validates capacity if the discriminator
/// turns out to mark fixed formants.
pub struct Wave<'a> {
    block: u8,
    view: BufferView<'a>,
    data: WaveData,
}

impl<'a> Wave<'a> {
    /// The encoded length of a relative formant wave
    pub const RELATIVE_FORMANT_LEN: usize = SOPRANO_RANGE.end;

    /// The encoded length of a fixed formant wave
    pub const FIXED_FORMANT_LEN: usize = FORMANT_RANGE.end;

    /// Create a wave codec over its region of the instrument image
    ///
    /// The region must hold at least [`RELATIVE_FORMANT_LEN`](Wave::RELATIVE_FORMANT_LEN)
    /// bytes. The fields are left zeroed; call [`dissect`](Codec::dissect) to decode the
    /// buffer contents.
    pub fn new(block: u8, bytes: &'a mut [u8]) -> Result<Self, CapacityError> {
        let view = BufferView::new(bytes, Self::RELATIVE_FORMANT_LEN)?;

        Ok(Self {
            block,
            view,
            data: WaveData::default(),
        })
    }

    /// The size of the underlying buffer region
    pub fn buffer_len(&self) -> usize {
        self.view.len()
    }

    /// Access the structured wave contents
    pub fn data(&self) -> &WaveData {
        &self.data
    }

    /// Copy wave contents from `source` into this slot
    ///
    /// Everything except the block number and the buffer association is replaced; this
    /// duplicates one wave's material into another existing slot. If `source` is a fixed
    /// formants wave, this slot's buffer must have room for the formant configuration
    /// block as well; otherwise the copy fails with a capacity error and the slot is
    /// left untouched, fields and buffer both.
    pub fn copy_from(&mut self, source: &WaveData) -> Result<(), CapacityError> {
        self.view.require(source.encoded_len())?;
        self.data = source.clone();

        Ok(())
    }

    /// Is this a fixed formants wave?
    pub fn fixed_formants(&self) -> bool {
        self.data.fixed_formants()
    }

    /// The wave level
    pub fn level(&self) -> u8 {
        self.data.level()
    }

    /// The 64-byte bass wave, for in-place editing
    pub fn bass_mut(&mut self) -> &mut [u8; 64] {
        self.data.bass_mut()
    }

    /// The 64-byte tenor wave, for in-place editing
    pub fn tenor_mut(&mut self) -> &mut [u8; 64] {
        self.data.tenor_mut()
    }

    /// The 32-byte alto wave, for in-place editing
    pub fn alto_mut(&mut self) -> &mut [u8; 32] {
        self.data.alto_mut()
    }

    /// The 16-byte soprano wave, for in-place editing
    pub fn soprano_mut(&mut self) -> &mut [u8; 16] {
        self.data.soprano_mut()
    }
}

impl Codec for Wave<'_> {
    fn block(&self) -> u8 {
        self.block
    }

    fn dissect(&mut self) -> Result<(), CapacityError> {
        let format = self.view.byte(FORMAT_OFFSET);

        // Construction only validated the relative formant minimum; the larger fixed
        // formant requirement is only known once the discriminator has been read.
        if format != 0 {
            self.view.require(Self::FIXED_FORMANT_LEN)?;
        }

        self.data.format = format;
        self.data.level = self.view.byte(LEVEL_OFFSET);
        self.view.copy_to(BASS_RANGE.start, &mut self.data.bass);
        self.view.copy_to(TENOR_RANGE.start, &mut self.data.tenor);
        self.view.copy_to(ALTO_RANGE.start, &mut self.data.alto);
        self.view.copy_to(SOPRANO_RANGE.start, &mut self.data.soprano);

        if self.data.fixed_formants() {
            self.view.copy_to(FORMANT_RANGE.start, &mut self.data.formant);
        }

        Ok(())
    }

    fn update(&mut self) {
        self.view.set_byte(FORMAT_OFFSET, self.data.format);
        self.view.set_byte(LEVEL_OFFSET, self.data.level);
        self.view.copy_from(BASS_RANGE.start, &self.data.bass);
        self.view.copy_from(TENOR_RANGE.start, &self.data.tenor);
        self.view.copy_from(ALTO_RANGE.start, &self.data.alto);
        self.view.copy_from(SOPRANO_RANGE.start, &self.data.soprano);

        if self.data.fixed_formants() {
            self.view.copy_from(FORMANT_RANGE.start, &self.data.formant);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative_image() -> [u8; Wave::RELATIVE_FORMANT_LEN] {
        let mut bytes = [0; Wave::RELATIVE_FORMANT_LEN];
        bytes[FORMAT_OFFSET] = 0x00;
        bytes[LEVEL_OFFSET] = 0x40;
        bytes[BASS_RANGE].fill(0x01);
        bytes[TENOR_RANGE].fill(0x02);
        bytes[ALTO_RANGE].fill(0x03);
        bytes[SOPRANO_RANGE].fill(0x04);
        bytes
    }

    fn fixed_image() -> [u8; Wave::FIXED_FORMANT_LEN] {
        let mut bytes = [0; Wave::FIXED_FORMANT_LEN];
        bytes[FORMAT_OFFSET] = 0x01;
        bytes[LEVEL_OFFSET] = 0x7F;
        bytes[BASS_RANGE].fill(0x11);
        bytes[TENOR_RANGE].fill(0x12);
        bytes[ALTO_RANGE].fill(0x13);
        bytes[SOPRANO_RANGE].fill(0x14);
        bytes[FORMANT_RANGE].fill(0x55);
        bytes
    }

    #[test]
    fn dissect_relative_formant_wave() {
        let mut bytes = relative_image();
        let mut wave = Wave::new(1, bytes.as_mut_slice()).expect("construction failed");

        wave.dissect().expect("dissect failed");

        assert_eq!(wave.block(), 1);
        assert!(!wave.fixed_formants());
        assert_eq!(wave.level(), 0x40);
        assert_eq!(wave.data().bass(), &[0x01; 64]);
        assert_eq!(wave.data().tenor(), &[0x02; 64]);
        assert_eq!(wave.data().alto(), &[0x03; 32]);
        assert_eq!(wave.data().soprano(), &[0x04; 16]);
        assert_eq!(wave.buffer_len(), Wave::RELATIVE_FORMANT_LEN);
    }

    #[test]
    fn update_reproduces_the_image() {
        let mut bytes = relative_image();
        let mut wave = Wave::new(1, bytes.as_mut_slice()).expect("construction failed");

        wave.dissect().expect("dissect failed");
        wave.update();

        assert_eq!(bytes, relative_image());
    }

    #[test]
    fn round_trip_into_zeroed_buffer() {
        let mut bytes = relative_image();
        let mut wave = Wave::new(1, bytes.as_mut_slice()).expect("construction failed");
        wave.dissect().expect("dissect failed");
        let data = wave.data().clone();

        let mut dest_bytes = [0; Wave::RELATIVE_FORMANT_LEN];
        let mut dest = Wave::new(2, dest_bytes.as_mut_slice()).expect("construction failed");
        dest.copy_from(&data).expect("copy failed");
        dest.update();

        assert_eq!(dest_bytes, relative_image());
    }

    #[test]
    fn dissect_fixed_formant_wave() {
        let mut bytes = fixed_image();
        let mut wave = Wave::new(1, bytes.as_mut_slice()).expect("construction failed");

        wave.dissect().expect("dissect failed");

        assert!(wave.fixed_formants());
        assert_eq!(wave.level(), 0x7F);
        assert_eq!(wave.data().formant(), &[0x55; 35]);

        wave.update();
        assert_eq!(bytes, fixed_image());
    }

    #[test]
    fn dissect_is_idempotent() {
        let mut bytes = fixed_image();
        let mut wave = Wave::new(1, bytes.as_mut_slice()).expect("construction failed");

        wave.dissect().expect("dissect failed");
        let first = wave.data().clone();

        wave.dissect().expect("dissect failed");
        assert_eq!(wave.data(), &first);
    }

    #[test]
    fn undersized_buffer_is_rejected_at_construction() {
        let mut bytes = [0; Wave::RELATIVE_FORMANT_LEN - 1];
        assert_eq!(
            Wave::new(1, bytes.as_mut_slice()).err(),
            Some(CapacityError {
                required: Wave::RELATIVE_FORMANT_LEN,
                available: Wave::RELATIVE_FORMANT_LEN - 1
            })
        );
    }

    #[test]
    fn fixed_formant_wave_in_undersized_buffer_fails_dissect() {
        // Room for the PCM tables, but the discriminator asks for a formant block too
        let mut bytes = [0; Wave::RELATIVE_FORMANT_LEN];
        bytes[FORMAT_OFFSET] = 0x01;

        let mut wave = Wave::new(1, bytes.as_mut_slice()).expect("construction failed");
        assert_eq!(
            wave.dissect(),
            Err(CapacityError {
                required: Wave::FIXED_FORMANT_LEN,
                available: Wave::RELATIVE_FORMANT_LEN
            })
        );

        // The failed dissect must not have touched the fields
        assert_eq!(wave.data(), &WaveData::default());
    }

    #[test]
    fn copy_into_undersized_slot_fails_and_leaves_it_untouched() {
        let mut source_bytes = fixed_image();
        let mut source = Wave::new(1, source_bytes.as_mut_slice()).expect("construction failed");
        source.dissect().expect("dissect failed");
        let data = source.data().clone();

        let mut dest_bytes = relative_image();
        let mut dest = Wave::new(2, dest_bytes.as_mut_slice()).expect("construction failed");
        dest.dissect().expect("dissect failed");
        let before = dest.data().clone();

        assert_eq!(
            dest.copy_from(&data),
            Err(CapacityError {
                required: Wave::FIXED_FORMANT_LEN,
                available: Wave::RELATIVE_FORMANT_LEN
            })
        );

        assert_eq!(dest.data(), &before);
        assert_eq!(dest_bytes, relative_image());
    }

    #[test]
    fn copy_duplicates_a_fixed_formant_wave() {
        let mut source_bytes = fixed_image();
        let mut source = Wave::new(1, source_bytes.as_mut_slice()).expect("construction failed");
        source.dissect().expect("dissect failed");
        let data = source.data().clone();

        let mut dest_bytes = [0; Wave::FIXED_FORMANT_LEN];
        let mut dest = Wave::new(2, dest_bytes.as_mut_slice()).expect("construction failed");
        dest.copy_from(&data).expect("copy failed");

        // Identity stays with the destination; contents come from the source
        assert_eq!(dest.block(), 2);
        dest.update();

        assert_eq!(dest_bytes, fixed_image());
    }

    #[test]
    fn edits_only_reach_the_buffer_on_update() {
        let mut bytes = relative_image();
        let mut wave = Wave::new(1, bytes.as_mut_slice()).expect("construction failed");
        wave.dissect().expect("dissect failed");

        wave.bass_mut().fill(0xAA);
        wave.soprano_mut()[0] = 0xBB;

        let mut expected = relative_image();
        expected[BASS_RANGE].fill(0xAA);
        expected[SOPRANO_RANGE.start] = 0xBB;

        // Nothing written yet
        assert_ne!(bytes, expected);

        let mut wave = Wave::new(1, bytes.as_mut_slice()).expect("construction failed");
        wave.dissect().expect("dissect failed");
        wave.bass_mut().fill(0xAA);
        wave.soprano_mut()[0] = 0xBB;
        wave.update();

        assert_eq!(bytes, expected);
    }
}
