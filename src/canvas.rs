//! Scan-line assembly and compositing into the caller's canvas.

use enough::Stop;

use crate::decoder::{FrameRegion, GraphicControl};
use crate::error::GifError;

const INTERLACE_OFFSET: [usize; 4] = [0, 4, 2, 1];
const INTERLACE_STRIDE: [usize; 4] = [8, 8, 4, 2];

/// Restore-to-background disposal.
const DISPOSAL_BACKGROUND: u8 = 2;

/// Accumulates decoded palette indices and flushes each completed scan-line
/// through the active palette into the RGB888 canvas.
///
/// Emitted strings may straddle scan-lines; the overflow simply starts the
/// next line, so exactly `width * height` indices pass through per frame.
/// Indices past the last line (sloppy encoders pad the final string) are
/// dropped.
pub struct LineSink<'a> {
    line: &'a mut [u8],
    out: &'a mut [u8],
    palette: &'a [u8],
    stop: &'a dyn Stop,
    canvas_width: usize,
    frame_x: usize,
    frame_y: usize,
    width: usize,
    height: usize,
    interlaced: bool,
    transparent: Option<u8>,
    restore_background: bool,
    background: u8,
    filled: usize,
    rows_done: usize,
    row_in_pass: usize,
    pass: usize,
}

impl<'a> LineSink<'a> {
    pub fn new(
        line: &'a mut [u8],
        out: &'a mut [u8],
        palette: &'a [u8],
        stop: &'a dyn Stop,
        region: &FrameRegion,
        canvas_width: usize,
        control: &GraphicControl,
        background: u8,
    ) -> Self {
        Self {
            line,
            out,
            palette,
            stop,
            canvas_width,
            frame_x: usize::from(region.x),
            frame_y: usize::from(region.y),
            width: usize::from(region.width),
            height: usize::from(region.height),
            interlaced: region.interlaced,
            transparent: control.transparent,
            restore_background: control.disposal == DISPOSAL_BACKGROUND,
            background,
            filled: 0,
            rows_done: 0,
            row_in_pass: 0,
            pass: 0,
        }
    }

    /// Whether every scan-line of the frame has been composited.
    pub fn complete(&self) -> bool {
        self.rows_done == self.height
    }

    pub fn push(&mut self, index: u8) -> Result<(), GifError> {
        if self.complete() {
            return Ok(());
        }
        self.line[self.filled] = index;
        self.filled += 1;
        if self.filled == self.width {
            self.flush()?;
        }
        Ok(())
    }

    pub fn extend(&mut self, mut indices: &[u8]) -> Result<(), GifError> {
        while !indices.is_empty() {
            if self.complete() {
                return Ok(());
            }
            let take = (self.width - self.filled).min(indices.len());
            self.line[self.filled..self.filled + take].copy_from_slice(&indices[..take]);
            self.filled += take;
            indices = &indices[take..];
            if self.filled == self.width {
                self.flush()?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), GifError> {
        let y = self.next_row()?;
        if self.rows_done % 16 == 0 {
            self.stop.check()?;
        }

        let row_start = ((self.frame_y + y) * self.canvas_width + self.frame_x) * 3;
        let dest = &mut self.out[row_start..row_start + self.width * 3];
        for (&index, dst) in self.line[..self.width].iter().zip(dest.chunks_exact_mut(3)) {
            if self.transparent == Some(index) {
                if self.restore_background {
                    let p = usize::from(self.background) * 3;
                    dst.copy_from_slice(&self.palette[p..p + 3]);
                }
                // Otherwise the destination keeps whatever the caller left
                // there (previous frame or background fill).
            } else {
                let p = usize::from(index) * 3;
                dst.copy_from_slice(&self.palette[p..p + 3]);
            }
        }

        self.filled = 0;
        self.rows_done += 1;
        self.row_in_pass += 1;
        Ok(())
    }

    /// Frame-relative destination row for the line being flushed.
    fn next_row(&mut self) -> Result<usize, GifError> {
        if !self.interlaced {
            return Ok(self.rows_done);
        }
        let mut y = INTERLACE_OFFSET[self.pass] + self.row_in_pass * INTERLACE_STRIDE[self.pass];
        while y >= self.height && self.pass < 3 {
            self.pass += 1;
            self.row_in_pass = 0;
            y = INTERLACE_OFFSET[self.pass] + self.row_in_pass * INTERLACE_STRIDE[self.pass];
        }
        if y >= self.height {
            return Err(GifError::Decode("interlace pass out of rows"));
        }
        Ok(y)
    }
}
