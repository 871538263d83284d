#![no_main]

use classscope::classfile::signatures::{
    parse_class_signature, parse_field_signature, parse_method_signature,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_class_signature(input);
        let _ = parse_method_signature(input);
        let _ = parse_field_signature(input);
    }
});
