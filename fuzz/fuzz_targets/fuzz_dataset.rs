#![no_main]

use libfuzzer_sys::fuzz_target;

use parbench_core::provision::Dataset;

// Arbitrary bytes in a dataset file must load or fail cleanly.
fuzz_target!(|data: &[u8]| {
    let Ok(dir) = std::env::temp_dir().canonicalize() else {
        return;
    };
    let path = dir.join(format!("parbench_fuzz_{}.txt", std::process::id()));
    if std::fs::write(&path, data).is_err() {
        return;
    }
    let size = String::from_utf8_lossy(data).split_ascii_whitespace().count() as u64;
    let dataset = Dataset { path: path.clone(), size };
    if let Ok(values) = dataset.load() {
        assert_eq!(values.len() as u64, size);
        assert!(values.iter().all(|&v| v < size));
    }
    let _ = std::fs::remove_file(&path);
});
