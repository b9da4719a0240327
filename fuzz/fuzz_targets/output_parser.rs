#![no_main]

use libfuzzer_sys::fuzz_target;
use sleuth_lookup::OutputParser;

fuzz_target!(|data: &str| {
    let parser = OutputParser::new();

    // 어떤 입력에도 패닉 없이 레코드 목록을 반환해야 한다
    let _ = parser.parse(data);
});
