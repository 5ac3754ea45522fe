//! LZW decode pipeline: sub-block reassembly, variable-width code reading,
//! and the per-frame decode driver.

pub mod dict;

use crate::canvas::LineSink;
use crate::cursor::Cursor;
use crate::error::GifError;
use crate::limits::{CHUNK_SIZE, MAX_CODE_SIZE, MAX_COLORS, TABLE_ENTRIES, WINDOW_SIZE};
use self::dict::DictOps;

/// Pulls variable-width codes from the sub-block chain.
///
/// The chain is reassembled into `window`; codes come out of a 32-bit
/// little-endian accumulator loaded from the current read offset. A refill
/// compacts the unread tail to the front and appends whole sub-blocks until
/// less than one sub-block of space remains or the zero-length terminator
/// latches `end_of_frame`.
struct CodeReader<'a, 'src> {
    window: &'a mut [u8; WINDOW_SIZE],
    cursor: &'a mut Cursor<'src>,
    read_off: usize,
    len: usize,
    end_of_frame: bool,
    acc: u32,
    bitnum: u32,
    codesize: u32,
    mask: u32,
}

impl<'a, 'src> CodeReader<'a, 'src> {
    fn new(
        window: &'a mut [u8; WINDOW_SIZE],
        cursor: &'a mut Cursor<'src>,
        codesize: u32,
    ) -> Result<Self, GifError> {
        let mut reader = Self {
            window,
            cursor,
            read_off: 0,
            len: 0,
            end_of_frame: false,
            acc: 0,
            bitnum: 0,
            codesize,
            mask: (1 << codesize) - 1,
        };
        reader.refill()?;
        reader.acc = reader.peek_u32(0);
        Ok(reader)
    }

    fn set_codesize(&mut self, codesize: u32) {
        self.codesize = codesize;
        self.mask = (1 << codesize) - 1;
    }

    /// Four window bytes at `off` as a little-endian word, zero-padded past
    /// the valid tail.
    fn peek_u32(&self, off: usize) -> u32 {
        let mut bytes = [0u8; 4];
        let avail = self.len.saturating_sub(off).min(4);
        bytes[..avail].copy_from_slice(&self.window[off..off + avail]);
        u32::from_le_bytes(bytes)
    }

    fn refill(&mut self) -> Result<(), GifError> {
        if self.end_of_frame || self.len - self.read_off >= CHUNK_SIZE {
            return Ok(());
        }
        self.window.copy_within(self.read_off..self.len, 0);
        self.len -= self.read_off;
        self.read_off = 0;

        while self.len + CHUNK_SIZE <= WINDOW_SIZE {
            let size = usize::from(self.cursor.read_u8()?);
            if size == 0 {
                self.end_of_frame = true;
                break;
            }
            self.cursor.read_exact(&mut self.window[self.len..self.len + size])?;
            self.len += size;
        }
        Ok(())
    }

    fn next_code(&mut self) -> Result<u16, GifError> {
        if self.bitnum + self.codesize > 32 {
            self.read_off += (self.bitnum >> 3) as usize;
            self.bitnum &= 7;
            self.refill()?;
            self.acc = self.peek_u32(self.read_off);
        }
        let avail = (self.len - self.read_off) as u32 * 8;
        if self.bitnum + self.codesize > avail {
            return Err(GifError::Decode("compressed stream truncated"));
        }
        let code = ((self.acc >> self.bitnum) & self.mask) as u16;
        self.bitnum += self.codesize;
        Ok(code)
    }
}

/// Decode one frame's compressed image data into the sink.
///
/// Runs until every scan-line of the frame has been composited, then skips
/// whatever remains of the sub-block chain. An end-of-information code
/// before that point, or a code the dictionary cannot know, fails the
/// frame.
pub fn decode_frame<D: DictOps>(
    cursor: &mut Cursor<'_>,
    window: &mut [u8; WINDOW_SIZE],
    dict: &mut D,
    sink: &mut LineSink<'_>,
    min_code_size: u8,
) -> Result<(), GifError> {
    if !(2..=8).contains(&min_code_size)
        || u32::from(min_code_size) >= MAX_CODE_SIZE
        || (1usize << min_code_size) > MAX_COLORS
    {
        return Err(GifError::Decode("unsupported LZW minimum code size"));
    }
    let clear: u16 = 1 << min_code_size;
    let eoi: u16 = clear + 1;
    let start_size = u32::from(min_code_size) + 1;

    dict.reset(clear);

    let end_of_frame = {
        let mut reader = CodeReader::new(window, cursor, start_size)?;
        let mut nextcode: u16 = eoi + 1;
        let mut nextlim: u16 = 1 << start_size;
        let mut oldcode: u16 = 0;
        let mut awaiting_first = true;

        while !sink.complete() {
            let code = reader.next_code()?;

            if code == clear {
                dict.reset(clear);
                reader.set_codesize(start_size);
                nextcode = eoi + 1;
                nextlim = 1 << start_size;
                awaiting_first = true;
                continue;
            }
            if code == eoi {
                return Err(GifError::Decode("end of stream before frame complete"));
            }
            if awaiting_first {
                // The first code of a segment carries no prefix; it must be
                // a literal root.
                if code >= clear {
                    return Err(GifError::Decode("first code after clear is not a literal"));
                }
                sink.push(code as u8)?;
                oldcode = code;
                awaiting_first = false;
                continue;
            }

            if code > nextcode {
                return Err(GifError::Decode("code beyond dictionary"));
            }
            if code == nextcode {
                // The classic self-referential case: the new entry is the
                // previous string extended by its own first byte, and this
                // code is that entry.
                let first = dict.first_byte(oldcode);
                dict.insert(nextcode, oldcode, first);
                dict.emit(nextcode, sink)?;
                grow(&mut reader, &mut nextcode, &mut nextlim);
            } else {
                let first = dict.first_byte(code);
                dict.emit(code, sink)?;
                if usize::from(nextcode) < TABLE_ENTRIES {
                    dict.insert(nextcode, oldcode, first);
                    grow(&mut reader, &mut nextcode, &mut nextlim);
                }
            }
            oldcode = code;
        }
        reader.end_of_frame
    };

    // Anything left of the chain (the EOI code, padding, trailing
    // sub-blocks) is dropped up to the terminator.
    if !end_of_frame {
        cursor.discard_sub_blocks()?;
    }
    Ok(())
}

fn grow(reader: &mut CodeReader<'_, '_>, nextcode: &mut u16, nextlim: &mut u16) {
    *nextcode += 1;
    if *nextcode >= *nextlim && reader.codesize < MAX_CODE_SIZE {
        reader.set_codesize(reader.codesize + 1);
        *nextlim <<= 1;
    }
}
