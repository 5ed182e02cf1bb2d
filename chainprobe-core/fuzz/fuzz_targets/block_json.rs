#![no_main]
use chainprobe_core::{check_bloom_coverage, check_logs_against_block, BlockSnapshot};
use ethers_core::types::Log;
use libfuzzer_sys::fuzz_target;

// Input: a JSON array `[block, [log, ...]]`.
fuzz_target!(|data: &[u8]| {
    let Ok((block, logs)) = serde_json::from_slice::<(BlockSnapshot, Vec<Log>)>(data) else {
        return;
    };

    let result = check_logs_against_block(&logs, &block);
    assert_eq!(result.errors_count, result.errors.len());
    assert_eq!(result.valid, result.errors.is_empty() && result.reason.is_none());

    let coverage = check_bloom_coverage(&logs, &block.logs_bloom);
    assert_eq!(coverage.in_bloom + coverage.missing, logs.len());
});
