//! Buffered sink engine.
//!
//! Stages bytes in a fixed-capacity buffer in front of any `io::Write` and
//! hands them to the sink in batches. Three modes, after stdio's `_IOFBF`,
//! `_IOLBF` and `_IONBF`: fully-buffered, line-buffered and unbuffered.
//!
//! Design: the buffer never grows after construction and keeps no error
//! state of its own. Every write reports how many bytes it accepted together
//! with the error that stopped it, so callers can keep a sticky error on top
//! without losing partial counts.

use std::fmt;
use std::io::{self, Read, Write};

use crate::config::{DEFAULT_BUF_SIZE, WriterConfig};

/// Stack chunk used to relay reads when the sink is unbuffered.
const RELAY_CHUNK: usize = 1024;

/// Buffering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum BufMode {
    /// Fully buffered: flush when the buffer is full or on request.
    #[default]
    Full,
    /// Line buffered: additionally flush through the last newline of a write.
    Line,
    /// Unbuffered: zero capacity, every write goes straight to the sink.
    None,
}

impl BufMode {
    /// Parse from string (case-insensitive). Unknown names yield `None`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<BufMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "fully" | "block" => Some(BufMode::Full),
            "line" => Some(BufMode::Line),
            "none" | "unbuffered" | "off" => Some(BufMode::None),
            _ => Option::None,
        }
    }
}

/// Outcome of a buffered transfer: the bytes accepted, plus the error that
/// cut the transfer short, if any.
///
/// `count` is meaningful even when `error` is set; those bytes were taken
/// by the buffer or the sink before the failure.
#[derive(Debug)]
#[must_use]
pub struct WriteResult<N = usize, E = io::Error> {
    /// Bytes accepted.
    pub count: N,
    /// Failure reported by the sink or source.
    pub error: Option<E>,
}

impl<N, E> WriteResult<N, E> {
    pub(crate) fn ok(count: N) -> Self {
        Self { count, error: None }
    }

    pub(crate) fn failed(count: N, error: E) -> Self {
        Self {
            count,
            error: Some(error),
        }
    }

    /// True when no error cut the transfer short.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Collapse into a `Result`, dropping the partial count on failure.
    pub fn into_result(self) -> Result<N, E> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.count),
        }
    }
}

/// A byte sink with a fixed-size staging buffer in front of it.
///
/// Invariants:
/// - `pos <= data.len()`
/// - `data.len()` is fixed at creation (0 for [`BufMode::None`])
///
/// Dropping a `BufferedSink` does not flush it; call [`flush`](Self::flush)
/// or take the pending bytes with [`into_parts`](Self::into_parts).
pub struct BufferedSink<W: Write> {
    inner: W,
    data: Vec<u8>,
    /// Number of pending bytes at the front of `data`.
    pos: usize,
    mode: BufMode,
}

impl<W: Write> BufferedSink<W> {
    /// Fully-buffered sink with the default capacity.
    pub fn new(inner: W) -> Self {
        Self::with_capacity(DEFAULT_BUF_SIZE, inner)
    }

    /// Fully-buffered sink with the given capacity (at least one byte).
    pub fn with_capacity(capacity: usize, inner: W) -> Self {
        Self::with_mode(BufMode::Full, capacity, inner)
    }

    /// Sink with the given mode and capacity. Unbuffered sinks ignore the
    /// capacity and hold nothing.
    pub fn with_mode(mode: BufMode, capacity: usize, inner: W) -> Self {
        let cap = if matches!(mode, BufMode::None) {
            0
        } else {
            capacity.max(1)
        };
        Self {
            inner,
            data: vec![0u8; cap],
            pos: 0,
            mode,
        }
    }

    /// Sink configured from a [`WriterConfig`].
    pub fn with_config(config: WriterConfig, inner: W) -> Self {
        Self::with_mode(config.mode, config.capacity, inner)
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Current buffering mode.
    pub fn mode(&self) -> BufMode {
        self.mode
    }

    /// Total buffer capacity.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Bytes pending flush.
    pub fn buffered(&self) -> usize {
        self.pos
    }

    /// Free space left in the buffer.
    pub fn available(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The pending bytes themselves.
    pub fn buffer(&self) -> &[u8] {
        &self.data[..self.pos]
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying sink. Writing to it directly bypasses
    /// the pending bytes.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Take the sink apart without flushing, returning any pending bytes.
    pub fn into_parts(self) -> (W, Vec<u8>) {
        let mut data = self.data;
        data.truncate(self.pos);
        (self.inner, data)
    }

    // -----------------------------------------------------------------------
    // Write-side operations
    // -----------------------------------------------------------------------

    /// Buffer a write, flushing to the sink as the buffer fills.
    pub fn write(&mut self, data: &[u8]) -> WriteResult {
        match self.mode {
            BufMode::Line => self.write_line(data),
            BufMode::Full | BufMode::None => self.write_full(data),
        }
    }

    /// Buffer a single byte.
    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write(&[byte]).into_result().map(|_| ())
    }

    /// Buffer the UTF-8 encoding of `c`. Returns its encoded length.
    pub fn write_char(&mut self, c: char) -> WriteResult {
        let mut utf8 = [0u8; 4];
        self.write(c.encode_utf8(&mut utf8).as_bytes())
    }

    /// Buffer the bytes of `s`.
    pub fn write_str(&mut self, s: &str) -> WriteResult {
        self.write(s.as_bytes())
    }

    /// Hand every pending byte to the sink, then flush the sink itself.
    ///
    /// On failure the bytes the sink did not take stay buffered.
    pub fn flush(&mut self) -> io::Result<()> {
        self.flush_buf()?;
        self.inner.flush()
    }

    // -----------------------------------------------------------------------
    // Read-side operations
    // -----------------------------------------------------------------------

    /// Drain `src` until EOF, reading straight into the free space of the
    /// buffer and flushing whenever it fills.
    pub fn read_from<R: Read + ?Sized>(&mut self, src: &mut R) -> WriteResult<u64> {
        if self.data.is_empty() {
            return self.relay_from(src);
        }

        let mut total = 0u64;
        loop {
            if self.available() == 0 {
                if let Err(err) = self.flush_buf() {
                    return WriteResult::failed(total, err);
                }
            }
            match src.read(&mut self.data[self.pos..]) {
                Ok(0) => break,
                Ok(n) => {
                    self.pos += n;
                    total += n as u64;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return WriteResult::failed(total, err),
            }
        }

        if self.mode == BufMode::Line {
            if let Some(nl_pos) = self.buffer().iter().rposition(|&b| b == b'\n') {
                // Same rule as a line-buffered write: bytes after the last
                // newline stay pending.
                if let Err(err) = self.flush_front(nl_pos + 1) {
                    return WriteResult::failed(total, err);
                }
            }
        }
        WriteResult::ok(total)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn write_full(&mut self, mut data: &[u8]) -> WriteResult {
        let mut accepted = 0;
        while data.len() > self.available() {
            let taken = if self.pos == 0 {
                // Nothing staged: a write this large goes straight through.
                let direct = write_all_counted(&mut self.inner, data);
                if let Some(err) = direct.error {
                    return WriteResult::failed(accepted + direct.count, err);
                }
                direct.count
            } else {
                let room = self.available();
                self.data[self.pos..].copy_from_slice(&data[..room]);
                self.pos += room;
                if let Err(err) = self.flush_buf() {
                    return WriteResult::failed(accepted + room, err);
                }
                room
            };
            accepted += taken;
            data = &data[taken..];
        }
        self.data[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
        WriteResult::ok(accepted + data.len())
    }

    fn write_line(&mut self, data: &[u8]) -> WriteResult {
        let Some(nl_pos) = data.iter().rposition(|&b| b == b'\n') else {
            return self.write_full(data);
        };

        // Everything through the last newline reaches the sink now; the
        // remainder stays buffered.
        let (head, tail) = data.split_at(nl_pos + 1);
        let head_result = self.write_full(head);
        if head_result.error.is_some() {
            return head_result;
        }
        if let Err(err) = self.flush_buf() {
            return WriteResult::failed(head.len(), err);
        }
        let tail_result = self.write_full(tail);
        WriteResult {
            count: head.len() + tail_result.count,
            error: tail_result.error,
        }
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.flush_front(self.pos)
    }

    /// Hand the first `len` pending bytes to the sink. Whatever the sink
    /// does not take moves to the front of the buffer.
    fn flush_front(&mut self, len: usize) -> io::Result<()> {
        if len == 0 {
            return Ok(());
        }
        let written = write_all_counted(&mut self.inner, &self.data[..len]);
        self.data.copy_within(written.count..self.pos, 0);
        self.pos -= written.count;
        match written.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn relay_from<R: Read + ?Sized>(&mut self, src: &mut R) -> WriteResult<u64> {
        let mut chunk = [0u8; RELAY_CHUNK];
        let mut total = 0u64;
        loop {
            let n = match src.read(&mut chunk) {
                Ok(0) => return WriteResult::ok(total),
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return WriteResult::failed(total, err),
            };
            let written = write_all_counted(&mut self.inner, &chunk[..n]);
            total += written.count as u64;
            if let Some(err) = written.error {
                return WriteResult::failed(total, err);
            }
        }
    }
}

impl<W: Write + fmt::Debug> fmt::Debug for BufferedSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedSink")
            .field("inner", &self.inner)
            .field("mode", &self.mode)
            .field("buffered", &self.pos)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Write all of `data`, counting what the sink took before any failure.
fn write_all_counted<W: Write + ?Sized>(sink: &mut W, mut data: &[u8]) -> WriteResult {
    let mut written = 0;
    while !data.is_empty() {
        match sink.write(data) {
            Ok(0) => {
                return WriteResult::failed(
                    written,
                    io::Error::new(io::ErrorKind::WriteZero, "sink accepted zero bytes"),
                );
            }
            Ok(n) => {
                written += n;
                data = &data[n..];
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return WriteResult::failed(written, err),
        }
    }
    WriteResult::ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
