#![no_main]

use libfuzzer_sys::fuzz_target;

use parbench_core::timing::TimingExtractor;

fuzz_target!(|data: &[u8]| {
    let output = String::from_utf8_lossy(data);
    let extractor = TimingExtractor::default();

    if let Some(seconds) = extractor.extract(&output) {
        assert!(!seconds.is_nan(), "NaN from {output:?}");
        assert!(seconds >= 0.0, "negative duration {seconds} from {output:?}");
        assert!(output.contains("Time Taken"));
    }
});
