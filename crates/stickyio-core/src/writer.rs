//! Deferred-error writer.
//!
//! `DeferredWriter` sits on top of a [`BufferedSink`] and remembers the first
//! failure the sink reports. From then on every write is a no-op that returns
//! zero, and every error-returning call hands back the stored error, until
//! [`reset_err`](DeferredWriter::reset_err) is called. Callers can write a
//! whole section and check [`err`](DeferredWriter::err) once after flushing.
//!
//! Design: `write` and `read_from` return an [`Outcome`], the accepted
//! count together with the sticky error, so a partial transfer reports
//! both. The deferred variants keep only the count. Numbers and
//! fixed-width integers are encoded in a scratch array inside the writer,
//! so they never allocate.
//!
//! One owner issues calls; the scratch array is reused across them.

use std::fmt;
use std::io::{self, Read, Write};
use std::ops::Range;

use crate::buffer::{BufMode, BufferedSink, WriteResult};
use crate::config::{self, WriterConfig};
use crate::error::StickyError;
use crate::printf::{self, Arg};

/// Scratch capacity: 64 binary digits of `|i64::MIN|` plus a sign byte.
pub const SCRATCH_LEN: usize = 65;

/// Capacity the printf staging buffer may keep between calls.
const STAGING_RETAIN: usize = 1024;

/// Outcome of one operation: the bytes accepted, and the sticky error if
/// the writer is Failed afterwards.
pub type Outcome<N = usize> = WriteResult<N, StickyError>;

/// Buffered writer with a sticky error.
///
/// State is either OK (`err()` is `None`) or Failed. Only
/// [`reset_err`](Self::reset_err) leaves Failed. While Failed the sink
/// receives no further bytes.
pub struct DeferredWriter<W: Write> {
    sink: BufferedSink<W>,
    sticky: Option<StickyError>,
    scratch: [u8; SCRATCH_LEN],
    /// Rendered printf/print output, cleared on every use.
    staging: Vec<u8>,
}

impl<W: Write> DeferredWriter<W> {
    /// Wrap `sink` in a fresh 4096-byte, fully-buffered buffer.
    pub fn new(sink: W) -> Self {
        Self::with_config(WriterConfig::default(), sink)
    }

    /// Like [`new`](Self::new), but honoring the `STICKYIO_BUF_*`
    /// environment overrides (read once per process, see [`config::defaults`]).
    pub fn from_env(sink: W) -> Self {
        Self::with_config(config::defaults(), sink)
    }

    /// Wrap `sink` in a fully-buffered buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, sink: W) -> Self {
        Self::from_buffered(BufferedSink::with_capacity(capacity, sink))
    }

    pub fn with_config(config: WriterConfig, sink: W) -> Self {
        Self::from_buffered(BufferedSink::with_config(config, sink))
    }

    /// Adopt an already-buffered sink without adding a second buffer.
    pub fn from_buffered(sink: BufferedSink<W>) -> Self {
        Self {
            sink,
            sticky: None,
            scratch: [0u8; SCRATCH_LEN],
            staging: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Error state
    // -----------------------------------------------------------------------

    /// The sticky error, if any. Reading it does not clear it.
    pub fn err(&self) -> Option<&StickyError> {
        self.sticky.as_ref()
    }

    /// Clear the sticky error. Bytes written before the failure are not
    /// rolled back, and bytes the sink refused stay buffered.
    pub fn reset_err(&mut self) {
        if let Some(err) = self.sticky.take() {
            tracing::debug!(error = %err, "sticky error cleared");
        }
    }

    // -----------------------------------------------------------------------
    // Error-returning operations
    // -----------------------------------------------------------------------

    /// Flush the buffer to the sink. Returns the stored error without
    /// touching the sink if one is pending.
    pub fn flush(&mut self) -> Result<(), StickyError> {
        self.guard()?;
        tracing::trace!(pending = self.sink.buffered(), "flushing");
        match self.sink.flush() {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Buffer `data`. The result carries the bytes accepted even when the
    /// sink failed part-way; call [`into_result`](WriteResult::into_result)
    /// to keep only the error.
    pub fn write(&mut self, data: &[u8]) -> Outcome {
        if let Err(err) = self.guard() {
            return WriteResult::failed(0, err);
        }
        let result = self.sink.write(data);
        self.capture(result)
    }

    /// Drain `src` into the buffer until EOF, counting the bytes taken
    /// before any failure. Read failures are sticky too.
    pub fn read_from<R: Read + ?Sized>(&mut self, src: &mut R) -> Outcome<u64> {
        if let Err(err) = self.guard() {
            return WriteResult::failed(0, err);
        }
        let result = self.sink.read_from(src);
        self.capture(result)
    }

    // -----------------------------------------------------------------------
    // Deferred-error variants
    // -----------------------------------------------------------------------

    /// [`flush`](Self::flush) with the error left for [`err`](Self::err).
    pub fn flush_interim(&mut self) {
        let _ = self.flush();
    }

    /// [`write`](Self::write), count only. Zero while an error is pending.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        self.write(data).count
    }

    /// [`read_from`](Self::read_from), count only.
    pub fn read_bytes_from<R: Read + ?Sized>(&mut self, src: &mut R) -> u64 {
        self.read_from(src).count
    }

    pub fn write_byte(&mut self, byte: u8) {
        if self.sticky.is_some() {
            return;
        }
        if let Err(err) = self.sink.write_byte(byte) {
            self.fail(err);
        }
    }

    /// Write the UTF-8 encoding of `c`, returning its length.
    pub fn write_char(&mut self, c: char) -> usize {
        if self.sticky.is_some() {
            return 0;
        }
        let result = self.sink.write_char(c);
        self.capture(result).count
    }

    pub fn write_str(&mut self, s: &str) -> usize {
        self.write_bytes(s.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Introspection (independent of the error state)
    // -----------------------------------------------------------------------

    /// Free space left in the buffer.
    pub fn available(&self) -> usize {
        self.sink.available()
    }

    /// Bytes pending flush.
    pub fn buffered(&self) -> usize {
        self.sink.buffered()
    }

    /// Total buffer capacity.
    pub fn size(&self) -> usize {
        self.sink.size()
    }

    pub fn mode(&self) -> BufMode {
        self.sink.mode()
    }

    /// Borrow the raw sink.
    pub fn get_ref(&self) -> &W {
        self.sink.get_ref()
    }

    /// Mutably borrow the raw sink. Writing to it directly bypasses both the
    /// pending bytes and the sticky error.
    pub fn get_mut(&mut self) -> &mut W {
        self.sink.get_mut()
    }

    pub fn buffered_sink(&self) -> &BufferedSink<W> {
        &self.sink
    }

    /// Give up the writer, keeping the buffer and its pending bytes.
    pub fn into_inner(self) -> BufferedSink<W> {
        self.sink
    }

    // -----------------------------------------------------------------------
    // Numbers
    // -----------------------------------------------------------------------

    /// Write `n` in base 10.
    pub fn write_decimal(&mut self, n: isize) -> usize {
        self.write_number64(n as i64, 10)
    }

    /// # Panics
    ///
    /// If `base` is outside `2..=36` and no error is pending.
    pub fn write_number(&mut self, n: isize, base: u32) -> usize {
        self.write_number64(n as i64, base)
    }

    /// # Panics
    ///
    /// If `base` is outside `2..=36` and no error is pending.
    pub fn write_unsigned_number(&mut self, n: usize, base: u32) -> usize {
        self.write_unsigned_number64(n as u64, base)
    }

    /// Write `n` in `base`, with a leading `-` when negative and lowercase
    /// letters for digits above 9.
    ///
    /// # Panics
    ///
    /// If `base` is outside `2..=36` and no error is pending.
    pub fn write_number64(&mut self, n: i64, base: u32) -> usize {
        if self.sticky.is_some() {
            return 0;
        }
        check_radix(base);
        let digits = printf::render_digits(n.unsigned_abs(), base, false, &mut self.scratch);
        let mut start = SCRATCH_LEN - digits;
        if n < 0 {
            start -= 1;
            self.scratch[start] = b'-';
        }
        self.write_scratch(start..SCRATCH_LEN)
    }

    /// Write `n` in `base` with lowercase letters for digits above 9.
    ///
    /// # Panics
    ///
    /// If `base` is outside `2..=36` and no error is pending.
    pub fn write_unsigned_number64(&mut self, n: u64, base: u32) -> usize {
        if self.sticky.is_some() {
            return 0;
        }
        check_radix(base);
        let digits = printf::render_digits(n, base, false, &mut self.scratch);
        self.write_scratch(SCRATCH_LEN - digits..SCRATCH_LEN)
    }

    // -----------------------------------------------------------------------
    // Formatted text
    // -----------------------------------------------------------------------

    /// Render `format` with `args` (see [`printf::sprintf`]) and write the
    /// result. Returns the bytes accepted.
    pub fn printf(&mut self, format: &str, args: &[Arg<'_>]) -> usize {
        if self.sticky.is_some() {
            return 0;
        }
        self.staging.clear();
        printf::sprintf(format, args, &mut self.staging);
        self.write_staging()
    }

    /// Write `args` in their default form, spacing two operands only when
    /// neither is a string.
    pub fn print(&mut self, args: &[Arg<'_>]) -> usize {
        if self.sticky.is_some() {
            return 0;
        }
        self.staging.clear();
        printf::sprint(args, &mut self.staging);
        self.write_staging()
    }

    /// Write `args` space-separated, then a newline.
    pub fn println(&mut self, args: &[Arg<'_>]) -> usize {
        if self.sticky.is_some() {
            return 0;
        }
        self.staging.clear();
        printf::sprintln(args, &mut self.staging);
        self.write_staging()
    }

    /// Write `format_args!` output straight into the buffer.
    ///
    /// A `Display` impl that fails while the sink is healthy is recorded as
    /// an [`io::ErrorKind::Other`] error.
    pub fn print_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        if self.sticky.is_some() {
            return 0;
        }
        let mut adapter = FmtAdapter {
            sink: &mut self.sink,
            count: 0,
            error: None,
        };
        let status = fmt::write(&mut adapter, args);
        let FmtAdapter { count, error, .. } = adapter;
        match (error, status) {
            (Some(err), _) => {
                self.fail(err);
            }
            (None, Err(fmt::Error)) => {
                self.fail(io::Error::other("formatter error"));
            }
            (None, Ok(())) => {}
        }
        count
    }

    // -----------------------------------------------------------------------
    // Fixed-width binary
    // -----------------------------------------------------------------------

    pub fn write_u16_le(&mut self, v: u16) {
        self.write_fixed(v.to_le_bytes());
    }

    pub fn write_u16_be(&mut self, v: u16) {
        self.write_fixed(v.to_be_bytes());
    }

    pub fn write_u32_le(&mut self, v: u32) {
        self.write_fixed(v.to_le_bytes());
    }

    pub fn write_u32_be(&mut self, v: u32) {
        self.write_fixed(v.to_be_bytes());
    }

    pub fn write_u64_le(&mut self, v: u64) {
        self.write_fixed(v.to_le_bytes());
    }

    pub fn write_u64_be(&mut self, v: u64) {
        self.write_fixed(v.to_be_bytes());
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn guard(&self) -> Result<(), StickyError> {
        match &self.sticky {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Enter the Failed state with `err`.
    fn fail(&mut self, err: io::Error) -> StickyError {
        debug_assert!(self.sticky.is_none(), "sink used while failed");
        tracing::debug!(kind = ?err.kind(), error = %err, "writer entered failed state");
        let sticky = StickyError::from(err);
        self.sticky = Some(sticky.clone());
        sticky
    }

    fn capture<N>(&mut self, result: WriteResult<N>) -> Outcome<N> {
        match result.error {
            None => WriteResult::ok(result.count),
            Some(err) => {
                let err = self.fail(err);
                WriteResult::failed(result.count, err)
            }
        }
    }

    fn write_scratch(&mut self, range: Range<usize>) -> usize {
        let result = self.sink.write(&self.scratch[range]);
        self.capture(result).count
    }

    fn write_staging(&mut self) -> usize {
        let result = self.sink.write(&self.staging);
        self.staging.clear();
        self.staging.shrink_to(STAGING_RETAIN);
        self.capture(result).count
    }

    fn write_fixed<const N: usize>(&mut self, bytes: [u8; N]) {
        if self.sticky.is_some() {
            return;
        }
        self.scratch[..N].copy_from_slice(&bytes);
        self.write_scratch(0..N);
    }
}

impl<W: Write> From<BufferedSink<W>> for DeferredWriter<W> {
    fn from(sink: BufferedSink<W>) -> Self {
        Self::from_buffered(sink)
    }
}

/// Standard-interface view. A write the sink cut short reports the bytes it
/// did accept; the error stays sticky and is returned by the next call.
impl<W: Write> Write for DeferredWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let outcome = DeferredWriter::write(self, buf);
        match outcome.error {
            Some(_) if outcome.count > 0 => Ok(outcome.count),
            Some(err) => Err(err.into()),
            None => Ok(outcome.count),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        DeferredWriter::flush(self).map_err(io::Error::from)
    }
}

impl<W: Write + fmt::Debug> fmt::Debug for DeferredWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredWriter")
            .field("sink", &self.sink)
            .field("sticky", &self.sticky)
            .finish_non_exhaustive()
    }
}

/// Routes `fmt::Write` into the buffered sink, keeping the io error that a
/// bare `fmt::Error` cannot carry.
struct FmtAdapter<'a, W: Write> {
    sink: &'a mut BufferedSink<W>,
    count: usize,
    error: Option<io::Error>,
}

impl<W: Write> fmt::Write for FmtAdapter<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let result = self.sink.write_str(s);
        self.count += result.count;
        match result.error {
            Some(err) => {
                self.error = Some(err);
                Err(fmt::Error)
            }
            None => Ok(()),
        }
    }
}

fn check_radix(base: u32) {
    assert!(
        (2..=36).contains(&base),
        "radix must be in 2..=36, got {base}"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::config::DEFAULT_BUF_SIZE;

    /// Rejects every write.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts `budget` bytes, then fails.
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

    fn written(w: &mut DeferredWriter<Vec<u8>>) -> String {
        w.flush().unwrap();
        String::from_utf8(w.get_ref().clone()).unwrap()
    }

    #[test]
    fn test_text_primitives() {
        let mut w = DeferredWriter::with_capacity(64, Vec::new());
        w.write_byte(b'\n');
        assert_eq!(w.write_str("Hello, world\n"), 13);
        assert_eq!(w.write_bytes(b"Write\n"), 6);
        assert_eq!(w.write_char('\u{1F600}'), 4);
        assert_eq!(written(&mut w), "\nHello, world\nWrite\n😀");
        assert!(w.err().is_none());
    }

    #[test]
    fn test_numbers() {
        let mut w = DeferredWriter::with_capacity(256, Vec::new());
        assert_eq!(w.write_number64(-123, 10), 4);
        w.write_byte(b' ');
        assert_eq!(w.write_unsigned_number64(1 << 63, 2), 64);
        w.write_byte(b' ');
        w.write_number(255, 16);
        w.write_byte(b' ');
        w.write_unsigned_number(35, 36);
        w.write_byte(b' ');
        w.write_decimal(0);
        w.write_byte(b' ');
        assert_eq!(w.write_number64(i64::MIN, 2), 65);
        let expected = format!(
            "-123 1{} ff z 0 -1{}",
            "0".repeat(63),
            "0".repeat(63)
        );
        assert_eq!(written(&mut w), expected);
    }

    #[test]
    #[should_panic(expected = "radix must be in 2..=36")]
    fn test_bad_radix_panics() {
        let mut w = DeferredWriter::with_capacity(16, Vec::new());
        w.write_number64(1, 37);
    }

    #[test]
    fn test_bad_radix_is_ignored_once_failed() {
        let mut w = DeferredWriter::with_capacity(1, Broken);
        w.write_str("xy");
        assert!(w.err().is_some());
        assert_eq!(w.write_number64(1, 1), 0);
        assert_eq!(w.write_unsigned_number64(1, 99), 0);
    }

    #[test]
    fn test_fixed_width_byte_order() {
        let mut w = DeferredWriter::with_capacity(64, Vec::new());
        w.write_u16_le(0x0102);
        w.write_u16_be(0x0102);
        w.write_u32_le(0x0102_0304);
        w.write_u32_be(0x0102_0304);
        w.write_u64_le(0x0102_0304_0506_0708);
        w.write_u64_be(0x0102_0304_0506_0708);
        w.flush().unwrap();
        assert_eq!(
            w.get_ref().as_slice(),
            &[
                2, 1, 1, 2, //
                4, 3, 2, 1, 1, 2, 3, 4, //
                8, 7, 6, 5, 4, 3, 2, 1, 1, 2, 3, 4, 5, 6, 7, 8,
            ]
        );
    }

    #[test]
    fn test_formatted_output() {
        let mut w = DeferredWriter::with_capacity(64, Vec::new());
        assert_eq!(w.printf("The number is %03d\n", args![42]), 18);
        w.println(args![1, 2, 3, "foo"]);
        w.print(args![1, 2, 3, "no space nor newline"]);
        assert_eq!(
            written(&mut w),
            "The number is 042\n1 2 3 foo\n1 2 3no space nor newline"
        );
    }

    #[test]
    fn test_print_fmt_writes_without_staging() {
        let mut w = DeferredWriter::with_capacity(64, Vec::new());
        let n = w.print_fmt(format_args!("{}-{:>4}", "id", 7));
        assert_eq!(n, 7);
        assert_eq!(written(&mut w), "id-   7");
    }

    #[test]
    fn test_print_fmt_records_formatter_error() {
        struct Faulty;
        impl fmt::Display for Faulty {
            fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        let mut w = DeferredWriter::with_capacity(64, Vec::new());
        w.print_fmt(format_args!("ok {}", Faulty));
        let err = w.err().expect("formatter error recorded");
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(err.to_string(), "formatter error");
    }

    #[test]
    fn test_print_fmt_keeps_sink_error() {
        let mut w = DeferredWriter::with_mode_for_test(BufMode::None, Broken);
        assert_eq!(w.print_fmt(format_args!("{}", 42)), 0);
        assert_eq!(w.err().map(StickyError::kind), Some(io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_failing_sink_records_first_error() {
        let mut w = DeferredWriter::new(Broken);
        assert_eq!(w.write_str("foo"), 3);
        assert!(w.err().is_none());
        w.flush_interim();
        let first = w.err().cloned().expect("flush failure recorded");
        assert_eq!(first.kind(), io::ErrorKind::BrokenPipe);
        // Same error on every later call.
        assert!(w.flush().unwrap_err().same_as(&first));
        assert!(w.write(b"more").into_result().unwrap_err().same_as(&first));
        assert!(w.err().unwrap().same_as(&first));
    }

    #[test]
    fn test_failed_writer_is_a_no_op() {
        let sink = Budget {
            taken: Vec::new(),
            budget: 4,
        };
        let mut w = DeferredWriter::with_capacity(2, sink);
        w.write_str("abcdef");
        assert!(w.err().is_some());
        let taken = w.get_ref().taken.clone();
        let buffered = w.buffered();

        w.write_byte(b'x');
        assert_eq!(w.write_str("x"), 0);
        assert_eq!(w.write_bytes(b"x"), 0);
        assert_eq!(w.write_char('x'), 0);
        assert_eq!(w.write_decimal(1), 0);
        assert_eq!(w.printf("%d", args![1]), 0);
        assert_eq!(w.print(args![1]), 0);
        assert_eq!(w.println(args![1]), 0);
        assert_eq!(w.print_fmt(format_args!("{}", 1)), 0);
        assert_eq!(w.read_bytes_from(&mut &b"x"[..]), 0);
        w.write_u64_be(1);
        w.flush_interim();

        assert_eq!(w.get_ref().taken, taken);
        assert_eq!(w.buffered(), buffered);
        assert_eq!(w.available() + w.buffered(), w.size());
    }

    #[test]
    fn test_reset_err_resumes() {
        let sink = Budget {
            taken: Vec::new(),
            budget: 3,
        };
        let mut w = DeferredWriter::with_capacity(16, sink);
        w.write_str("abcdef");
        w.flush_interim();
        assert!(w.err().is_some());
        assert_eq!(w.buffered(), 3);

        w.reset_err();
        assert!(w.err().is_none());
        w.get_mut().budget = usize::MAX;
        w.write_str("gh");
        w.flush().unwrap();
        assert_eq!(w.get_ref().taken, b"abcdefgh");
    }

    #[test]
    fn test_read_from_counts_and_captures() {
        let mut w = DeferredWriter::with_capacity(4, Vec::new());
        let mut src: &[u8] = b"injected from reader\n";
        assert_eq!(w.read_from(&mut src).into_result().unwrap(), 21);
        assert_eq!(written(&mut w), "injected from reader\n");

        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }
        let err = w.read_from(&mut FailingReader).into_result().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert!(w.err().unwrap().same_as(&err));
    }

    #[test]
    fn test_read_from_reports_count_with_error() {
        /// Yields `data` once, then fails.
        struct ShortThenFail<'a> {
            data: &'a [u8],
        }
        impl Read for ShortThenFail<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.data.is_empty() {
                    return Err(io::Error::other("boom"));
                }
                self.data.read(buf)
            }
        }
        let mut w = DeferredWriter::with_capacity(64, Vec::new());
        let outcome = w.read_from(&mut ShortThenFail { data: b"12345" });
        assert_eq!(outcome.count, 5);
        let err = outcome.error.expect("read failure reported");
        assert_eq!(err.to_string(), "boom");
        assert!(w.err().unwrap().same_as(&err));
        assert_eq!(w.buffered(), 5);
    }

    #[test]
    fn test_write_reports_count_with_error() {
        let sink = Budget {
            taken: Vec::new(),
            budget: 5,
        };
        let mut w = DeferredWriter::with_mode_for_test(BufMode::None, sink);
        let outcome = w.write(b"0123456789");
        assert_eq!(outcome.count, 5);
        assert_eq!(outcome.error.map(|e| e.to_string()).as_deref(), Some("budget spent"));
        assert_eq!(w.get_ref().taken, b"01234");

        // Once failed, nothing is accepted and the stored error comes back.
        let again = w.write(b"x");
        assert_eq!(again.count, 0);
        assert!(again.error.unwrap().same_as(w.err().unwrap()));
    }

    #[test]
    fn test_new_uses_fixed_defaults() {
        let w = DeferredWriter::new(Vec::<u8>::new());
        assert_eq!(w.size(), DEFAULT_BUF_SIZE);
        assert_eq!(w.mode(), BufMode::Full);

        let config = config::defaults();
        let w = DeferredWriter::from_env(Vec::<u8>::new());
        assert_eq!(w.mode(), config.mode);
    }

    #[test]
    fn test_io_write_reports_partial_then_error() {
        let sink = Budget {
            taken: Vec::new(),
            budget: 5,
        };
        let mut w = DeferredWriter::from_buffered(BufferedSink::with_mode(BufMode::None, 0, sink));
        let n = Write::write(&mut w, b"0123456789").unwrap();
        assert_eq!(n, 5);
        assert!(w.err().is_some());
        let err = Write::write(&mut w, b"89").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(Write::flush(&mut w).is_err());
    }

    #[test]
    fn test_write_macro_through_io_write() {
        let mut w = DeferredWriter::with_capacity(32, Vec::new());
        write!(w, "{}+{}={}", 1, 2, 3).unwrap();
        Write::flush(&mut w).unwrap();
        assert_eq!(w.get_ref().as_slice(), b"1+2=3");
    }

    #[test]
    fn test_introspection_passthrough() {
        let mut w = DeferredWriter::with_capacity(100, Vec::new());
        assert_eq!((w.size(), w.buffered(), w.available()), (100, 0, 100));
        w.write_str("foo");
        assert_eq!((w.size(), w.buffered(), w.available()), (100, 3, 97));
        w.flush_interim();
        assert_eq!((w.size(), w.buffered(), w.available()), (100, 0, 100));
    }

    #[test]
    fn test_adopts_buffered_sink() {
        let buffered = BufferedSink::with_mode(BufMode::Line, 42, Vec::new());
        let mut w = DeferredWriter::from(buffered);
        assert_eq!(w.size(), 42);
        assert_eq!(w.mode(), BufMode::Line);
        w.write_str("line\nrest");
        assert_eq!(w.get_ref().as_slice(), b"line\n");
        let (sink, pending) = w.into_inner().into_parts();
        assert_eq!(sink, b"line\n");
        assert_eq!(pending, b"rest");
    }

    #[test]
    fn test_debug_shows_state() {
        let w = DeferredWriter::with_capacity(8, Vec::<u8>::new());
        let shown = format!("{w:?}");
        assert!(shown.starts_with("DeferredWriter"));
        assert!(shown.contains("sticky: None"));
    }

    impl<W: Write> DeferredWriter<W> {
        fn with_mode_for_test(mode: BufMode, sink: W) -> Self {
            Self::with_config(WriterConfig::default().with_mode(mode), sink)
        }
    }
}
