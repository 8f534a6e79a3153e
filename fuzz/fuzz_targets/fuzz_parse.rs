#![no_main]

use cavern::battle::parse_battlefield;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Arbitrary text must parse or fail cleanly; accepted maps render back
    // to the same rows.
    if let Ok(battlefield) = parse_battlefield(text) {
        let rendered = battlefield.to_string();
        let reparsed = parse_battlefield(&rendered).expect("rendered map must parse");
        assert_eq!(reparsed, battlefield);
    }
});
