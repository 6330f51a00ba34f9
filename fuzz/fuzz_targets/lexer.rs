#![no_main]

use gocanon_syntax::lexer::Lexer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let mut last_end = 0usize;
    let mut steps = 0usize;
    let max_steps = s.len().saturating_mul(4) + 64;

    for t in Lexer::new(&s) {
        let (start, end) = (t.span.start as usize, t.span.end as usize);
        assert!(start <= end);
        assert!(end <= s.len());

        // Inserted semicolons are empty and may sit at a newline already passed.
        if !t.is_inserted_semi() {
            assert!(start >= last_end);
            last_end = end;
        }

        steps += 1;
        assert!(steps <= max_steps);
    }
});
