#![no_main]
use libfuzzer_sys::fuzz_target;

use zengif::{GifDecoder, SafeScratch, TurboScratch, Unstoppable};

fuzz_target!(|data: &[u8]| {
    // Both dictionary modes must survive arbitrary bytes without panicking.
    let mut safe = Box::new(SafeScratch::new());
    drain(GifDecoder::new(data, &mut *safe));

    let mut turbo = Box::new(TurboScratch::new());
    drain(GifDecoder::new(data, &mut *turbo));
});

fn drain<D: zengif::Dictionary>(
    decoder: Result<GifDecoder<'_, D>, zengif::GifError>,
) {
    let Ok(mut decoder) = decoder else { return };
    let info = decoder.info();
    let mut canvas = vec![0u8; usize::from(info.width) * usize::from(info.height) * 3];
    // Cap the frame count: a looping animation never reports completion.
    for _ in 0..16 {
        match decoder.next_frame(&mut canvas, Unstoppable) {
            Ok(Some(_)) => {}
            _ => break,
        }
    }
}
