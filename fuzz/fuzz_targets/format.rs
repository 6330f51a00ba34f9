#![no_main]

use gocanon::Formatter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };
    let formatter = Formatter::default();
    // Rejected input is fine; accepted input must reach a fixed point.
    let Ok(once) = formatter.format_source(src) else {
        return;
    };
    let twice = formatter
        .format_source(&once)
        .expect("canonical output parses again");
    assert_eq!(once, twice);
});
