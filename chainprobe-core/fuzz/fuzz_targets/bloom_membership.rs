#![no_main]
use chainprobe_core::bloom::{is_member, is_member_hex, BLOOM_BYTES};
use ethers_core::types::Bloom;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < BLOOM_BYTES {
        return;
    }
    let (filter, value) = data.split_at(BLOOM_BYTES);
    let bloom = Bloom::from_slice(filter);

    let _ = is_member(&bloom, value);
    if let Ok(s) = std::str::from_utf8(value) {
        let _ = is_member_hex(&bloom, s);
    }
});
