#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 GIF87a, two-colour palette, one red pixel
    let tiny: &[u8] = &[
        b'G', b'I', b'F', b'8', b'7', b'a', //
        1, 0, 1, 0, 0x80, 1, 0, // LSD: 1x1, 2-colour GCT, background 1
        0xFF, 0x00, 0x00, 0x00, 0xFF, 0x00, // palette: red, green
        0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0x00, // image descriptor
        0x02, 0x02, 0x44, 0x01, 0x00, // min code 2; codes: clear, 0, eoi
        0x3B,
    ];
    fs::write(format!("{dir}/tiny_1x1.gif"), tiny).unwrap();

    // 2x2 GIF89a with a graphic control extension and transparency
    let gce: &[u8] = &[
        b'G', b'I', b'F', b'8', b'9', b'a', //
        2, 0, 2, 0, 0x80, 0, 0, //
        0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, //
        0x21, 0xF9, 4, 0x09, 10, 0, 0, 0, // GCE: disposal 2, transparent 0
        0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0x00, //
        0x02, 0x03, 0x44, 0x82, 0x02, 0x00, // codes: clear, 0, 1, 1, 0, eoi
        0x3B,
    ];
    fs::write(format!("{dir}/gce_2x2.gif"), gce).unwrap();

    // Netscape looping header with no image
    let mut looping = Vec::new();
    looping.extend_from_slice(b"GIF89a");
    looping.extend_from_slice(&[3, 0, 3, 0, 0x80, 0, 0]);
    looping.extend_from_slice(&[0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);
    looping.extend_from_slice(&[0x21, 0xFF, 11]);
    looping.extend_from_slice(b"NETSCAPE2.0");
    looping.extend_from_slice(&[3, 1, 0, 0, 0]);
    looping.push(0x3B);
    fs::write(format!("{dir}/netscape_loop.gif"), looping).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_magic.bin"), b"GIF89a").unwrap();
    fs::write(format!("{dir}/cut_palette.bin"), b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xFF").unwrap();
    fs::write(format!("{dir}/bad_separator.bin"), b"GIF89a\x01\x00\x01\x00\x00\x00\x00\x99").unwrap();

    println!("Generated seed corpus in {dir}/");
}
