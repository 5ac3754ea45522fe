//! Compile-time decoder limits.
//!
//! These constants bound every buffer in the crate. The scratch requirement
//! of each dictionary mode is a pure function of them:
//! `core::mem::size_of::<SafeScratch>()` / `size_of::<TurboScratch>()`.

/// Widest supported canvas and frame, in pixels.
pub const MAX_WIDTH: usize = 480;

/// Tallest supported canvas and frame, in pixels.
pub const MAX_HEIGHT: usize = 320;

/// Most palette entries a colour table may carry. Power of two, at most 256.
pub const MAX_COLORS: usize = 256;

/// Widest LZW code, in bits.
pub const MAX_CODE_SIZE: u32 = 12;

/// Payload cap of one GIF sub-block.
pub const CHUNK_SIZE: usize = 255;

/// Entries in an LZW string table.
pub(crate) const TABLE_ENTRIES: usize = 1 << MAX_CODE_SIZE;

/// Sub-block reassembly window. Refills keep at least one whole sub-block
/// of headroom, so the window must exceed `CHUNK_SIZE` by a comfortable
/// margin.
pub(crate) const WINDOW_SIZE: usize = 6 * CHUNK_SIZE;

/// Turbo string pool: the root-byte region followed by room for one fully
/// decoded frame, which keeps every dictionary entry's backing string valid
/// for the whole frame.
pub(crate) const POOL_SIZE: usize = MAX_COLORS + MAX_WIDTH * MAX_HEIGHT;

// Turbo symbols store pool offsets in 23 bits.
const _: () = assert!(POOL_SIZE < (1 << 23));
const _: () = assert!(MAX_COLORS.is_power_of_two() && MAX_COLORS <= 256);
