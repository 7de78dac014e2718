#![no_main]
use std::io::{self, Write};

use libfuzzer_sys::fuzz_target;
use stickyio_core::DeferredWriter;

/// Accepts a fuzzer-chosen number of bytes, then fails.
struct Budget {
    taken: Vec<u8>,
    budget: usize,
}

impl Write for Budget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::other("budget spent"));
        }
        let n = buf.len().min(self.budget);
        self.taken.extend_from_slice(&buf[..n]);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&header, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(header & 0x3f) + 1;
    let budget = usize::from(header >> 6) * 64;
    let mut w = DeferredWriter::with_capacity(capacity, Budget { taken: Vec::new(), budget });

    for chunk in ops.chunks(9) {
        let failed = w.err().is_some();
        let before = w.get_ref().taken.len();
        let value = chunk[1..]
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        match chunk[0] % 8 {
            0 => w.write_byte(chunk[0]),
            1 => {
                w.write_bytes(&chunk[1..]);
            }
            2 => {
                w.write_number64(value as i64, u32::from(chunk[0] % 35) + 2);
            }
            3 => {
                w.write_unsigned_number64(value, u32::from(chunk[0] % 35) + 2);
            }
            4 => w.write_u64_be(value),
            5 => w.write_u16_le(value as u16),
            6 => w.flush_interim(),
            _ => {
                w.reset_err();
                continue;
            }
        }
        assert!(!failed || w.get_ref().taken.len() == before);
        assert_eq!(w.available() + w.buffered(), w.size());
    }
});
