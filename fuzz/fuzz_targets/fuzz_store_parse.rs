#![no_main]
use libfuzzer_sys::fuzz_target;
use shortcut_store::{checksum, parse_store};

fuzz_target!(|data: &[u8]| {
    let _ = checksum(data);

    // Any accepted store must describe spans inside the input
    if let Ok(store) = parse_store(data) {
        assert_eq!(store.len, data.len());
        for (record, entry) in store.records.iter().zip(&store.entries) {
            assert!(record.span.end <= data.len());
            assert_eq!(record.span, entry.span);
        }
    }
});
