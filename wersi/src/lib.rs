//! Interfacing with Wersi DMS instrument data
//!
//! The Wersi DMS synthesizers store their instruments as raw byte images — on cartridge,
//! in device RAM, or in SysEx dumps. This crate converts between those images and
//! structured, editable state, byte-exact in both directions. It deliberately does no
//! I/O: a transport layer hands over the raw image, and takes it back once it has been
//! written to.
//!
//! Every component type ([`Icb`](icb::Icb), [`Vcf`](vcf::Vcf), [`Envelope`](envelope::Envelope),
//! [`Wave`](wave::Wave)) implements the same [`Codec`](codec::Codec) contract:
//! [`dissect`](codec::Codec::dissect) decodes a component's region of the image into
//! fields, [`update`](codec::Codec::update) encodes the fields back. The
//! [`InstrumentStore`](store::InstrumentStore) aggregates all components of one image,
//! carved into disjoint regions according to a hardware model's [`Layout`](store::Layout).
//!
//! ```
//! use wersi::{InstrumentStore, Layout, Wave};
//!
//! // A minimal image: one ICB and one (relative formant) wave
//! let layout = Layout::new()
//!     .icb(1, 0x00..0x10)
//!     .wave(1, 0x10..0x10 + Wave::RELATIVE_FORMANT_LEN);
//!
//! let mut image = [0; 0x10 + Wave::RELATIVE_FORMANT_LEN];
//! let mut store = InstrumentStore::new(&mut image, &layout)?;
//!
//! // Decode, edit in memory, write back explicitly
//! store.dissect()?;
//! store.wave_mut(1).unwrap().bass_mut().fill(0x7F);
//! store.update();
//!
//! assert_eq!(image[0x12..0x52], [0x7F; 64]);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod buffer;
pub mod codec;
pub mod envelope;
pub mod icb;
pub mod store;
pub mod vcf;
pub mod wave;

pub use buffer::{BufferView, CapacityError};
pub use codec::Codec;
pub use envelope::Envelope;
pub use icb::Icb;
pub use store::{InstrumentStore, Layout};
pub use vcf::Vcf;
pub use wave::{Wave, WaveData};
