#![no_main]

use detect_sp::config::AnalysisConfig;
use detect_sp::dataset::Dataset;
use detect_sp::engine::analyze;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Loading and analyzing arbitrary records must not panic
        if let Ok(dataset) = Dataset::from_json_records(input) {
            let _ = analyze(&dataset, &AnalysisConfig::default());
        }
    }
});
