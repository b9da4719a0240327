#![no_main]

use libfuzzer_sys::fuzz_target;
use sleuth_lookup::sanitizer;

fuzz_target!(|data: &str| {
    // 패닉 없이 Ok 또는 타입화된 Err을 반환해야 한다
    let _ = sanitizer::clean(data);
});
