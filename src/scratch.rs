//! Caller-owned scratch storage.
//!
//! The decoder allocates nothing: all working memory lives in a
//! [`GifScratch`], sized at compile time from the [`limits`](crate::limits)
//! constants and handed in by the caller. Embedded callers typically place
//! it in a `static`; hosted callers can keep it on the stack or box it.

use crate::limits::{MAX_WIDTH, WINDOW_SIZE};
use crate::lzw::dict::{Dictionary, SafeDict, TurboDict};

/// Working memory for one decoder, parameterised by dictionary mode.
///
/// Constructing a `SafeScratch` or `TurboScratch` is what selects the LZW
/// representation; the decoder borrows it exclusively for its lifetime.
pub struct GifScratch<D> {
    pub(crate) window: [u8; WINDOW_SIZE],
    pub(crate) line: [u8; MAX_WIDTH],
    pub(crate) dict: D,
}

/// Scratch for the compact chain-of-suffixes dictionary (~22 KiB).
pub type SafeScratch = GifScratch<SafeDict>;

/// Scratch for the string-table dictionary (~180 KiB; trades memory for
/// bulk-copy emission).
pub type TurboScratch = GifScratch<TurboDict>;

impl SafeScratch {
    pub const fn new() -> Self {
        Self {
            window: [0; WINDOW_SIZE],
            line: [0; MAX_WIDTH],
            dict: SafeDict::new(),
        }
    }
}

impl TurboScratch {
    pub const fn new() -> Self {
        Self {
            window: [0; WINDOW_SIZE],
            line: [0; MAX_WIDTH],
            dict: TurboDict::new(),
        }
    }
}

impl Default for SafeScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for TurboScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dictionary> GifScratch<D> {
    /// Bytes of working memory this mode requires.
    pub const fn required_size() -> usize {
        core::mem::size_of::<Self>()
    }
}
