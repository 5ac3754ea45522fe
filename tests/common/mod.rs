//! Shared helpers: build GIF byte streams from parts and drive the decoder
//! in both dictionary modes.
#![allow(dead_code)]

use zengif::{Dictionary, GifDecoder, GifError, GifScratch, SafeScratch, TurboScratch, Unstoppable};

pub const TRAILER: u8 = 0x3B;

// ── Stream building ──────────────────────────────────────────────────

fn size_field(len: usize) -> u8 {
    assert!(len.is_power_of_two() && (2..=256).contains(&len));
    (len.trailing_zeros() - 1) as u8
}

/// Header + logical screen descriptor + optional global colour table.
pub fn screen(version: &str, width: u16, height: u16, palette: &[[u8; 3]], background: u8) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(b"GIF");
    v.extend_from_slice(version.as_bytes());
    v.extend_from_slice(&width.to_le_bytes());
    v.extend_from_slice(&height.to_le_bytes());
    if palette.is_empty() {
        v.push(0);
    } else {
        v.push(0x80 | size_field(palette.len()));
    }
    v.push(background);
    v.push(0); // pixel aspect ratio
    for color in palette {
        v.extend_from_slice(color);
    }
    v
}

pub fn graphic_control(disposal: u8, delay: u16, transparent: Option<u8>) -> Vec<u8> {
    let mut packed = (disposal & 0x07) << 2;
    if transparent.is_some() {
        packed |= 0x01;
    }
    let mut v = vec![0x21, 0xF9, 4, packed];
    v.extend_from_slice(&delay.to_le_bytes());
    v.push(transparent.unwrap_or(0));
    v.push(0);
    v
}

pub fn netscape_loop(count: u16) -> Vec<u8> {
    let mut v = vec![0x21, 0xFF, 11];
    v.extend_from_slice(b"NETSCAPE2.0");
    v.extend_from_slice(&[3, 1]);
    v.extend_from_slice(&count.to_le_bytes());
    v.push(0);
    v
}

pub fn comment(text: &[u8]) -> Vec<u8> {
    let mut v = vec![0x21, 0xFE];
    v.extend(sub_blocks(text));
    v
}

/// Image descriptor + optional local colour table + LZW-compressed indices.
pub fn image(
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    interlaced: bool,
    local: &[[u8; 3]],
    min_code: u8,
    indices: &[u8],
) -> Vec<u8> {
    let body = sub_blocks(&compress(min_code, indices));
    image_raw(x, y, width, height, interlaced, local, min_code, &body)
}

/// Image block with a caller-supplied (possibly malformed) data body.
pub fn image_raw(
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    interlaced: bool,
    local: &[[u8; 3]],
    min_code: u8,
    body: &[u8],
) -> Vec<u8> {
    let mut v = vec![0x2C];
    v.extend_from_slice(&x.to_le_bytes());
    v.extend_from_slice(&y.to_le_bytes());
    v.extend_from_slice(&width.to_le_bytes());
    v.extend_from_slice(&height.to_le_bytes());
    let mut packed = 0u8;
    if interlaced {
        packed |= 0x40;
    }
    if !local.is_empty() {
        packed |= 0x80 | size_field(local.len());
    }
    v.push(packed);
    for color in local {
        v.extend_from_slice(color);
    }
    v.push(min_code);
    v.extend_from_slice(body);
    v
}

/// Frame the bytes as a sub-block chain with terminator.
pub fn sub_blocks(data: &[u8]) -> Vec<u8> {
    sub_blocks_of(data, 255)
}

pub fn sub_blocks_of(data: &[u8], chunk: usize) -> Vec<u8> {
    let mut v = Vec::new();
    for part in data.chunks(chunk) {
        v.push(part.len() as u8);
        v.extend_from_slice(part);
    }
    v.push(0);
    v
}

/// One complete single-frame file.
pub fn single_frame(width: u16, height: u16, palette: &[[u8; 3]], min_code: u8, indices: &[u8]) -> Vec<u8> {
    let mut v = screen("89a", width, height, palette, 0);
    v.extend(image(0, 0, width, height, false, &[], min_code, indices));
    v.push(TRAILER);
    v
}

// ── LZW encoding ─────────────────────────────────────────────────────

/// Bit-pack an explicit code sequence, tracking the same width-growth
/// schedule the decoder follows.
pub fn pack_codes(min_code: u8, codes: &[u16]) -> Vec<u8> {
    let clear = 1u16 << min_code;
    let eoi = clear + 1;
    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut nbits: u32 = 0;
    let mut width: u32 = u32::from(min_code) + 1;
    let mut nextcode = eoi + 1;
    let mut nextlim: u16 = 1 << width;
    let mut first = true;

    for &code in codes {
        assert!(u32::from(code) < (1 << width), "code {code} too wide");
        acc |= u32::from(code) << nbits;
        nbits += width;
        while nbits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            nbits -= 8;
        }

        if code == clear {
            width = u32::from(min_code) + 1;
            nextcode = eoi + 1;
            nextlim = 1 << width;
            first = true;
        } else if code == eoi {
        } else if first {
            first = false;
        } else if nextcode < 4096 {
            nextcode += 1;
            if nextcode >= nextlim && width < 12 {
                width += 1;
                nextlim <<= 1;
            }
        }
    }
    if nbits > 0 {
        out.push(acc as u8);
    }
    out
}

/// Minimal LZW compressor: clear code first, EOI last.
pub fn compress(min_code: u8, indices: &[u8]) -> Vec<u8> {
    use std::collections::HashMap;

    let clear = 1u16 << min_code;
    let eoi = clear + 1;
    let mut codes = vec![clear];
    let mut table: HashMap<(u16, u8), u16> = HashMap::new();
    let mut nextcode = eoi + 1;
    let mut prefix: Option<u16> = None;

    for &k in indices {
        assert!(u16::from(k) < clear, "index {k} outside root range");
        match prefix {
            None => prefix = Some(u16::from(k)),
            Some(p) => {
                if let Some(&extended) = table.get(&(p, k)) {
                    prefix = Some(extended);
                } else {
                    codes.push(p);
                    if nextcode < 4096 {
                        table.insert((p, k), nextcode);
                        nextcode += 1;
                    }
                    prefix = Some(u16::from(k));
                }
            }
        }
    }
    if let Some(p) = prefix {
        codes.push(p);
    }
    codes.push(eoi);
    pack_codes(min_code, &codes)
}

/// Rows of an interlaced frame in stream order.
pub fn interlace_order(height: usize) -> Vec<usize> {
    let mut rows = Vec::new();
    for (offset, stride) in [(0, 8), (4, 8), (2, 4), (1, 2)] {
        let mut y = offset;
        while y < height {
            rows.push(y);
            y += stride;
        }
    }
    rows
}

// ── Decoding drivers ─────────────────────────────────────────────────

/// Decode up to `limit` frames, returning each (canvas snapshot, delay).
pub fn collect_with<D: Dictionary>(
    scratch: &mut GifScratch<D>,
    data: &[u8],
    limit: usize,
) -> Result<Vec<(Vec<u8>, u32)>, GifError> {
    let mut decoder = GifDecoder::new(data, scratch)?;
    let info = decoder.info();
    let mut canvas = vec![0u8; usize::from(info.width) * usize::from(info.height) * 3];
    let mut frames = Vec::new();
    while frames.len() < limit {
        match decoder.next_frame(&mut canvas, Unstoppable)? {
            Some(frame) => frames.push((canvas.clone(), frame.delay_ms)),
            None => break,
        }
    }
    Ok(frames)
}

/// Decode in both dictionary modes, require identical behaviour, and
/// return the safe-mode result.
pub fn collect_both(data: &[u8], limit: usize) -> Result<Vec<(Vec<u8>, u32)>, GifError> {
    let safe = collect_with(&mut SafeScratch::new(), data, limit);
    let turbo = collect_with(&mut TurboScratch::new(), data, limit);
    match (&safe, &turbo) {
        (Ok(a), Ok(b)) => assert_eq!(a, b, "safe and turbo modes disagree"),
        (Err(a), Err(b)) => assert_eq!(
            std::mem::discriminant(a),
            std::mem::discriminant(b),
            "safe and turbo modes fail differently: {a:?} vs {b:?}"
        ),
        _ => panic!("safe and turbo modes disagree: {safe:?} vs {turbo:?}"),
    }
    safe
}

/// Decode expecting failure; the error must match across modes.
pub fn decode_err(data: &[u8]) -> GifError {
    collect_both(data, 8).unwrap_err()
}
