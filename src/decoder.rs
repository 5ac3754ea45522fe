//! GIF container state machine: header, extensions, image descriptors, and
//! the per-frame drive of the LZW pipeline.

use enough::Stop;

use crate::canvas::LineSink;
use crate::cursor::Cursor;
use crate::error::GifError;
use crate::limits::{MAX_COLORS, MAX_HEIGHT, MAX_WIDTH};
use crate::lzw;
use crate::lzw::dict::{Dictionary, SafeDict};
use crate::scratch::GifScratch;

const TRAILER: u8 = 0x3B;
const EXTENSION: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;

const EXT_GRAPHIC_CONTROL: u8 = 0xF9;
const EXT_APPLICATION: u8 = 0xFF;

const PALETTE_BYTES: usize = MAX_COLORS * 3;

/// Header version of the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GifVersion {
    Gif87a,
    Gif89a,
}

/// Canvas metadata, fixed at [`GifDecoder::new`].
#[derive(Clone, Copy, Debug)]
pub struct GifInfo {
    pub width: u16,
    pub height: u16,
    pub version: GifVersion,
}

/// Geometry and timing of a decoded frame.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    /// Display time, already scaled from the wire's hundredths of a second.
    pub delay_ms: u32,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub interlaced: bool,
}

/// Image-descriptor rectangle plus the interlace flag.
#[derive(Clone, Copy)]
pub struct FrameRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub interlaced: bool,
}

/// State carried from a graphic control extension to the image it precedes.
#[derive(Clone, Copy, Default)]
pub struct GraphicControl {
    pub delay_ms: u32,
    pub transparent: Option<u8>,
    pub disposal: u8,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ActivePalette {
    Global,
    Local,
}

/// Streaming GIF87a/89a decoder over an in-memory source.
///
/// Generic over the LZW dictionary mode; the mode follows from the scratch
/// type, so `GifDecoder::new(data, &mut SafeScratch::new())` and
/// `GifDecoder::new(data, &mut TurboScratch::new())` are the two builds.
pub struct GifDecoder<'a, D: Dictionary = SafeDict> {
    cursor: Cursor<'a>,
    scratch: &'a mut GifScratch<D>,
    info: GifInfo,
    background: u8,
    global_palette: [u8; PALETTE_BYTES],
    local_palette: [u8; PALETTE_BYTES],
    active: ActivePalette,
    control: GraphicControl,
    /// −1 loops forever, 0 plays once, n > 0 repeats n more times.
    loop_count: i32,
    /// The loop extension is honoured once; rewinding replays it, and a
    /// second read must not restart the countdown.
    loop_count_set: bool,
    anim_start: usize,
    frame_seen: bool,
    error_callback: Option<fn(&GifError)>,
}

impl<'a, D: Dictionary> GifDecoder<'a, D> {
    /// Parse the header, logical screen descriptor, and global colour
    /// table, and fix the rewind target.
    ///
    /// The source must outlive the decoder; the scratch is borrowed
    /// exclusively for the decoder's lifetime.
    pub fn new(data: &'a [u8], scratch: &'a mut GifScratch<D>) -> Result<Self, GifError> {
        if data.is_empty() {
            return Err(GifError::InvalidParam("source is empty"));
        }
        let mut cursor = Cursor::new(data);

        let mut header = [0u8; 13];
        cursor.read_exact(&mut header)?;
        if &header[0..3] != b"GIF" {
            return Err(GifError::BadFile("missing GIF signature"));
        }
        let version = match &header[3..6] {
            b"87a" => GifVersion::Gif87a,
            b"89a" => GifVersion::Gif89a,
            _ => return Err(GifError::BadFile("unknown GIF version")),
        };

        let width = u16::from_le_bytes([header[6], header[7]]);
        let height = u16::from_le_bytes([header[8], header[9]]);
        if width == 0
            || height == 0
            || usize::from(width) > MAX_WIDTH
            || usize::from(height) > MAX_HEIGHT
        {
            return Err(GifError::InvalidFrameDimensions {
                x: 0,
                y: 0,
                width,
                height,
            });
        }

        let packed = header[10];
        let background = header[11];
        // header[12] is the pixel aspect ratio; nothing uses it.

        let mut global_palette = [0u8; PALETTE_BYTES];
        if packed & 0x80 != 0 {
            let colors = 1usize << ((packed & 0x07) + 1);
            if colors > MAX_COLORS {
                return Err(GifError::UnsupportedColorDepth {
                    colors: colors as u16,
                });
            }
            cursor.read_exact(&mut global_palette[..colors * 3])?;
        }

        let anim_start = cursor.position();
        Ok(Self {
            cursor,
            scratch,
            info: GifInfo {
                width,
                height,
                version,
            },
            background,
            global_palette,
            local_palette: [0u8; PALETTE_BYTES],
            active: ActivePalette::Global,
            control: GraphicControl::default(),
            loop_count: 0,
            loop_count_set: false,
            anim_start,
            frame_seen: false,
            error_callback: None,
        })
    }

    pub fn info(&self) -> GifInfo {
        self.info
    }

    pub fn background_index(&self) -> u8 {
        self.background
    }

    /// RGB888 bytes of the palette active for the most recent frame.
    pub fn palette(&self) -> &[u8] {
        match self.active {
            ActivePalette::Global => &self.global_palette,
            ActivePalette::Local => &self.local_palette,
        }
    }

    /// The active palette as typed pixels.
    #[cfg(feature = "rgb")]
    pub fn palette_rgb(&self) -> &[rgb::RGB8] {
        use rgb::AsPixels as _;
        self.palette().as_pixels()
    }

    /// Install a callback invoked with the error before a failing call
    /// returns. The decoder itself never writes to any output stream.
    pub fn set_error_callback(&mut self, callback: Option<fn(&GifError)>) {
        self.error_callback = callback;
    }

    /// Reposition to the first frame. Loop bookkeeping is untouched.
    pub fn rewind(&mut self) {
        self.cursor.set_position(self.anim_start);
        self.frame_seen = false;
    }

    /// Explicitly end the decoder, releasing its borrows.
    pub fn close(self) {}

    /// Decode the next frame into `frame_buffer` (RGB888, row stride
    /// `canvas_width * 3`, at least `canvas_width * canvas_height * 3`
    /// bytes).
    ///
    /// Returns `Ok(Some(frame))` with the frame's delay and geometry,
    /// `Ok(None)` once the animation (including any Netscape loop count)
    /// has finished, or the first error encountered.
    ///
    /// Transparent pixels leave the destination bytes untouched unless the
    /// frame's disposal is restore-to-background, so across an animation
    /// the buffer must be handed back unchanged between calls: it carries
    /// the previous frame. The decoder never clears it.
    pub fn next_frame(
        &mut self,
        frame_buffer: &mut [u8],
        stop: impl Stop,
    ) -> Result<Option<Frame>, GifError> {
        let result = self.next_frame_inner(frame_buffer, &stop);
        if let Err(ref err) = result {
            if let Some(callback) = self.error_callback {
                callback(err);
            }
        }
        result
    }

    fn next_frame_inner(
        &mut self,
        frame_buffer: &mut [u8],
        stop: &dyn Stop,
    ) -> Result<Option<Frame>, GifError> {
        let needed = usize::from(self.info.width) * usize::from(self.info.height) * 3;
        if frame_buffer.len() < needed {
            return Err(GifError::BufferTooSmall {
                needed,
                actual: frame_buffer.len(),
            });
        }

        // A graphic control extension scopes to the one image it precedes.
        self.control = GraphicControl::default();
        self.active = ActivePalette::Global;

        loop {
            if self.cursor.eof() {
                if !self.step_loop()? {
                    return Ok(None);
                }
                continue;
            }
            match self.cursor.read_u8()? {
                TRAILER => {
                    if !self.step_loop()? {
                        return Ok(None);
                    }
                }
                EXTENSION => self.read_extension()?,
                IMAGE_SEPARATOR => return self.decode_image(frame_buffer, stop).map(Some),
                _ => return Err(GifError::BadFile("unexpected block separator")),
            }
        }
    }

    /// Handle the trailer (or a truncated tail): restart the animation if
    /// repetitions remain, otherwise report completion.
    fn step_loop(&mut self) -> Result<bool, GifError> {
        if !self.frame_seen {
            return Err(GifError::NoFrame);
        }
        match self.loop_count {
            -1 => {
                self.rewind();
                Ok(true)
            }
            0 => Ok(false),
            _ => {
                self.loop_count -= 1;
                self.rewind();
                Ok(true)
            }
        }
    }

    fn read_extension(&mut self) -> Result<(), GifError> {
        match self.cursor.read_u8()? {
            EXT_GRAPHIC_CONTROL => self.read_graphic_control(),
            EXT_APPLICATION => self.read_application(),
            // Comment, plain text, and unrecognised labels render nothing.
            _ => self.cursor.discard_sub_blocks(),
        }
    }

    fn read_graphic_control(&mut self) -> Result<(), GifError> {
        if self.cursor.read_u8()? != 4 {
            return Err(GifError::BadFile("graphic control extension size"));
        }
        let packed = self.cursor.read_u8()?;
        let delay = self.cursor.get_u16_le()?;
        let transparent_index = self.cursor.read_u8()?;
        if self.cursor.read_u8()? != 0 {
            return Err(GifError::BadFile("graphic control extension terminator"));
        }
        self.control = GraphicControl {
            delay_ms: u32::from(delay) * 10,
            transparent: (packed & 0x01 != 0).then_some(transparent_index),
            disposal: (packed >> 2) & 0x07,
        };
        Ok(())
    }

    fn read_application(&mut self) -> Result<(), GifError> {
        let size = self.cursor.read_u8()?;
        if size != 11 {
            self.cursor.skip(usize::from(size))?;
            return self.cursor.discard_sub_blocks();
        }
        let mut ident = [0u8; 11];
        self.cursor.read_exact(&mut ident)?;
        if &ident != b"NETSCAPE2.0" && &ident != b"ANIMEXTS1.0" {
            return self.cursor.discard_sub_blocks();
        }

        let sub = self.cursor.read_u8()?;
        if sub == 0 {
            return Ok(());
        }
        if sub != 3 {
            self.cursor.skip(usize::from(sub))?;
            return self.cursor.discard_sub_blocks();
        }
        if self.cursor.read_u8()? == 1 {
            let loops = self.cursor.get_u16_le()?;
            if !self.loop_count_set {
                // Wire zero means loop forever; N means N repeats beyond
                // the first play.
                self.loop_count = if loops == 0 { -1 } else { i32::from(loops) };
                self.loop_count_set = true;
            }
        } else {
            self.cursor.skip(2)?;
        }
        self.cursor.discard_sub_blocks()
    }

    fn decode_image(
        &mut self,
        frame_buffer: &mut [u8],
        stop: &dyn Stop,
    ) -> Result<Frame, GifError> {
        let x = self.cursor.get_u16_le()?;
        let y = self.cursor.get_u16_le()?;
        let width = self.cursor.get_u16_le()?;
        let height = self.cursor.get_u16_le()?;
        let packed = self.cursor.read_u8()?;

        if width == 0
            || height == 0
            || usize::from(width) > MAX_WIDTH
            || u32::from(x) + u32::from(width) > u32::from(self.info.width)
            || u32::from(y) + u32::from(height) > u32::from(self.info.height)
        {
            return Err(GifError::InvalidFrameDimensions {
                x,
                y,
                width,
                height,
            });
        }

        if packed & 0x80 != 0 {
            let colors = 1usize << ((packed & 0x07) + 1);
            if colors > MAX_COLORS {
                return Err(GifError::UnsupportedColorDepth {
                    colors: colors as u16,
                });
            }
            self.cursor.read_exact(&mut self.local_palette[..colors * 3])?;
            self.active = ActivePalette::Local;
        }

        let min_code_size = self.cursor.read_u8()?;

        let region = FrameRegion {
            x,
            y,
            width,
            height,
            interlaced: packed & 0x40 != 0,
        };
        let palette: &[u8] = match self.active {
            ActivePalette::Global => &self.global_palette,
            ActivePalette::Local => &self.local_palette,
        };
        let GifScratch { window, line, dict } = &mut *self.scratch;
        let mut sink = LineSink::new(
            line,
            frame_buffer,
            palette,
            stop,
            &region,
            usize::from(self.info.width),
            &self.control,
            self.background,
        );

        lzw::decode_frame(&mut self.cursor, window, dict, &mut sink, min_code_size)?;

        self.frame_seen = true;
        Ok(Frame {
            delay_ms: self.control.delay_ms,
            x,
            y,
            width,
            height,
            interlaced: region.interlaced,
        })
    }
}
