#![no_main]

use classscope::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let context = ScanContext::new();
    let mut decoder = UnitDecoder::new();
    if let Ok(unit) = decoder.decode(&Memory::new(data.to_vec()), &ScanPolicy::comprehensive(), &context) {
        let mut linker = GraphLinker::new();
        let _ = linker.link(unit);
        let _ = linker.finish();
    }
});
