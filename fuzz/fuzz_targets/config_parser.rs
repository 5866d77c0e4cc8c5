#![no_main]

use detect_sp::config::AnalysisConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = AnalysisConfig::from_toml_str(input);
    }
});
