#![no_main]
use libfuzzer_sys::fuzz_target;
use stickyio_core::printf::{segments, sprintf};
use stickyio_core::{Arg, args};

fuzz_target!(|data: &[u8]| {
    // Arbitrary format strings must neither panic nor expand without bound.
    if data.is_empty() {
        return;
    }

    let format = String::from_utf8_lossy(data);
    let parsed = segments(format.as_bytes()).count();
    assert!(parsed <= format.len());

    let args: &[Arg<'_>] = args![-42, 42u64, 2.5, 'x', true, "str", 7, 3];
    let mut buf = Vec::new();
    sprintf(&format, args, &mut buf);

    // Each directive consumes at most one argument plus two `*` values and
    // renders at most two 4096-byte paddings plus its digits. Unused
    // arguments add one short trailing report.
    let directives = format.bytes().filter(|&b| b == b'%').count();
    assert!(buf.len() <= format.len() + directives * (2 * 4096 + 512) + 256);
});
