//! LZW string-table representations.
//!
//! Two interchangeable dictionaries sit behind [`Dictionary`]: [`SafeDict`]
//! stores each code as a parent link plus one suffix byte and reconstructs
//! strings by walking the chain; [`TurboDict`] stores each code as an
//! offset and length into a byte pool of already-decoded output, so
//! emission is a bulk copy. Nothing of either representation escapes this
//! module: the decode driver sees only `reset`/`first_byte`/`emit`/`insert`.

use crate::canvas::LineSink;
use crate::error::GifError;
use crate::limits::{MAX_COLORS, POOL_SIZE, TABLE_ENTRIES};

/// Parent link of a root entry.
const LINK_END: u16 = 0xFFFF;

/// Low 23 bits of a turbo symbol are the pool offset.
const OFFSET_MASK: u32 = 0x7F_FFFF;
/// Set when the entry appends one suffix byte (bits 24..32) to the string
/// at its offset.
const SUFFIX_FLAG: u32 = 0x80_0000;

/// Working contract between the decode driver and a string table.
///
/// Not nameable outside the crate; it exists so [`Dictionary`] stays a
/// sealed marker while the driver stays generic.
pub trait DictOps {
    /// Rebuild the root entries. Called at frame start and on a clear code.
    fn reset(&mut self, roots: u16);

    /// First byte of the string for `code`. `code` must be live.
    fn first_byte(&self, code: u16) -> u8;

    /// Write the string for `code` into the sink. `code` must be live.
    fn emit(&mut self, code: u16, sink: &mut LineSink<'_>) -> Result<(), GifError>;

    /// Define `code` as the string of `parent` extended by `first`.
    fn insert(&mut self, code: u16, parent: u16, first: u8);
}

/// One of the two LZW string-table modes. Sealed: implemented exactly by
/// [`SafeDict`] and [`TurboDict`], chosen through the scratch type.
pub trait Dictionary: DictOps {}

impl Dictionary for SafeDict {}
impl Dictionary for TurboDict {}

// ── Safe mode ───────────────────────────────────────────────────────

/// Compact dictionary: per-code parent link and suffix byte.
///
/// Emission walks the parent chain, stacking suffix bytes right-to-left,
/// then hands the reversed run to the sink. Memory stays small (one `u16`
/// and three `u8` per entry) at the price of the walk.
pub struct SafeDict {
    parent: [u16; TABLE_ENTRIES],
    suffix: [u8; TABLE_ENTRIES],
    first: [u8; TABLE_ENTRIES],
    stack: [u8; TABLE_ENTRIES],
}

impl SafeDict {
    pub(crate) const fn new() -> Self {
        Self {
            parent: [LINK_END; TABLE_ENTRIES],
            suffix: [0; TABLE_ENTRIES],
            first: [0; TABLE_ENTRIES],
            stack: [0; TABLE_ENTRIES],
        }
    }
}

impl DictOps for SafeDict {
    fn reset(&mut self, roots: u16) {
        for i in 0..usize::from(roots) {
            self.parent[i] = LINK_END;
            self.suffix[i] = i as u8;
            self.first[i] = i as u8;
        }
        // Entries past the roots are unreachable until insert() rewrites
        // them: the driver never passes a code at or beyond nextcode.
    }

    fn first_byte(&self, code: u16) -> u8 {
        self.first[usize::from(code)]
    }

    fn emit(&mut self, code: u16, sink: &mut LineSink<'_>) -> Result<(), GifError> {
        let mut top = TABLE_ENTRIES;
        let mut c = code;
        loop {
            if top == 0 {
                return Err(GifError::Decode("dictionary chain exceeds table size"));
            }
            top -= 1;
            self.stack[top] = self.suffix[usize::from(c)];
            match self.parent[usize::from(c)] {
                LINK_END => break,
                p => c = p,
            }
        }
        sink.extend(&self.stack[top..])
    }

    fn insert(&mut self, code: u16, parent: u16, first: u8) {
        let i = usize::from(code);
        self.parent[i] = parent;
        self.suffix[i] = first;
        self.first[i] = self.first[usize::from(parent)];
    }
}

// ── Turbo mode ──────────────────────────────────────────────────────

/// String-table dictionary over a byte pool.
///
/// The pool opens with the fixed root-byte region and then accumulates the
/// frame's decoded indices; the write cursor never rewinds within a frame,
/// so every entry's offset stays backed for the frame's lifetime. A fresh
/// entry usually inherits its parent's offset plus an appended-suffix byte
/// packed into the symbol word; the first time such an entry is emitted,
/// its prefix and suffix land contiguously at the cursor and the entry
/// migrates there with the flag resolved.
pub struct TurboDict {
    symbols: [u32; TABLE_ENTRIES],
    lengths: [u16; TABLE_ENTRIES],
    pool: [u8; POOL_SIZE],
    cursor: usize,
}

impl TurboDict {
    pub(crate) const fn new() -> Self {
        Self {
            symbols: [0; TABLE_ENTRIES],
            lengths: [0; TABLE_ENTRIES],
            pool: [0; POOL_SIZE],
            cursor: MAX_COLORS,
        }
    }
}

impl DictOps for TurboDict {
    fn reset(&mut self, roots: u16) {
        for i in 0..usize::from(roots) {
            self.pool[i] = i as u8;
            self.symbols[i] = i as u32;
            self.lengths[i] = 1;
        }
        // Only roots survive a reset, so earlier pool bytes are dead and
        // the cursor may rewind to the end of the root region.
        self.cursor = MAX_COLORS;
    }

    fn first_byte(&self, code: u16) -> u8 {
        self.pool[(self.symbols[usize::from(code)] & OFFSET_MASK) as usize]
    }

    fn emit(&mut self, code: u16, sink: &mut LineSink<'_>) -> Result<(), GifError> {
        let i = usize::from(code);
        let sym = self.symbols[i];
        let mut len = usize::from(self.lengths[i]);
        let src = (sym & OFFSET_MASK) as usize;
        let dst = self.cursor;

        let appended = sym & SUFFIX_FLAG != 0;
        if dst + len + usize::from(appended) > POOL_SIZE {
            return Err(GifError::Decode("string pool exhausted"));
        }

        self.pool.copy_within(src..src + len, dst);
        if appended {
            self.pool[dst + len] = (sym >> 24) as u8;
            len += 1;
            self.symbols[i] = dst as u32;
            self.lengths[i] = len as u16;
        }
        self.cursor = dst + len;

        sink.extend(&self.pool[dst..dst + len])
    }

    fn insert(&mut self, code: u16, parent: u16, first: u8) {
        let i = usize::from(code);
        // The parent was emitted one iteration ago, which resolved any
        // appended suffix, so its symbol is a plain offset.
        self.symbols[i] = (self.symbols[usize::from(parent)] & OFFSET_MASK)
            | SUFFIX_FLAG
            | (u32::from(first) << 24);
        self.lengths[i] = self.lengths[usize::from(parent)];
    }
}
