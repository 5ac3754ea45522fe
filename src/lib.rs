//! # zengif
//!
//! Embedded-friendly streaming GIF87a/89a decoder.
//!
//! The caller supplies the whole file as a slice, a fixed-size scratch
//! aggregate, and an RGB888 canvas buffer; the decoder parses the
//! container, LZW-decodes each image, and composites indexed pixels into
//! the canvas honouring delays, transparency, restore-to-background
//! disposal, Netscape looping, and interlacing. **No heap allocation
//! anywhere** — every buffer is caller-owned and sized at compile time
//! from the [`limits`] constants.
//!
//! ## Dictionary modes
//!
//! Two interchangeable LZW string tables, selected by the scratch type:
//!
//! - [`SafeScratch`] — compact chain-of-suffixes table (~22 KiB of
//!   scratch), emission walks parent links.
//! - [`TurboScratch`] — string-table over a byte pool (~180 KiB),
//!   emission is a bulk copy.
//!
//! Both produce identical pixels.
//!
//! ## Canvas contract
//!
//! Frames composite *over* the buffer you pass in: transparent pixels
//! leave the previous contents visible (or restore the background colour
//! when the frame's disposal says so). Hand the same buffer back
//! unmodified between [`GifDecoder::next_frame`] calls.
//!
//! ## Usage
//!
//! ```no_run
//! use zengif::{GifDecoder, SafeScratch, Unstoppable};
//!
//! let data = std::fs::read("animation.gif")?;
//! let mut scratch = SafeScratch::new();
//! let mut decoder = GifDecoder::new(&data, &mut scratch)?;
//!
//! let info = decoder.info();
//! let mut canvas = vec![0u8; usize::from(info.width) * usize::from(info.height) * 3];
//! while let Some(frame) = decoder.next_frame(&mut canvas, Unstoppable)? {
//!     // present `canvas`, then wait frame.delay_ms
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

mod canvas;
mod cursor;
mod decoder;
mod error;
pub mod limits;
mod lzw;
mod scratch;

pub use decoder::{Frame, GifDecoder, GifInfo, GifVersion};
pub use error::GifError;
pub use lzw::dict::{Dictionary, SafeDict, TurboDict};
pub use scratch::{GifScratch, SafeScratch, TurboScratch};

pub use enough::{Stop, Unstoppable};

/// 8-bit RGB pixel, re-exported for the typed helpers.
#[cfg(feature = "rgb")]
pub use rgb::RGB8;

/// Check for the GIF magic bytes (`GIF87a` / `GIF89a`).
pub fn is_gif(data: &[u8]) -> bool {
    data.len() >= 6 && &data[0..3] == b"GIF" && (&data[3..6] == b"87a" || &data[3..6] == b"89a")
}

/// View an RGB888 frame buffer as typed pixels.
#[cfg(feature = "rgb")]
pub fn frame_pixels(frame_buffer: &[u8]) -> &[RGB8] {
    use rgb::AsPixels as _;
    frame_buffer.as_pixels()
}
