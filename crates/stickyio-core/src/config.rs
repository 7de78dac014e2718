//! Writer configuration.
//!
//! Buffer capacity and mode default to 4096 bytes, fully buffered. Callers
//! that want per-deployment tuning can opt into environment overrides:
//! - `STICKYIO_BUF_SIZE`: capacity in bytes, with an optional `k` (KiB) or
//!   `m` (MiB) suffix, e.g. `8192`, `64k`, `1m`.
//! - `STICKYIO_BUF_MODE`: `full`, `line` or `none` (see [`BufMode::from_str_loose`]).
//!
//! Only [`WriterConfig::from_env`] and [`defaults`] read the environment;
//! `defaults` reads it once and caches the result for the process.
//! `DeferredWriter::new` never consults it.

use std::sync::OnceLock;

use crate::buffer::BufMode;

/// Default buffer capacity in bytes.
pub const DEFAULT_BUF_SIZE: usize = 4096;

/// Environment variable overriding the buffer capacity.
pub const BUF_SIZE_ENV: &str = "STICKYIO_BUF_SIZE";

/// Environment variable overriding the buffering mode.
pub const BUF_MODE_ENV: &str = "STICKYIO_BUF_MODE";

/// Capacity and mode of the buffer placed in front of a raw sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WriterConfig {
    /// Buffer capacity in bytes.
    pub capacity: usize,
    /// Buffering mode.
    pub mode: BufMode,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUF_SIZE,
            mode: BufMode::Full,
        }
    }
}

impl WriterConfig {
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: BufMode) -> Self {
        self.mode = mode;
        self
    }

    /// Read overrides from the process environment, uncached.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing keys keep their
    /// defaults; unparseable values are logged and ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(BUF_SIZE_ENV) {
            match parse_buf_size(&raw) {
                Some(capacity) => config.capacity = capacity,
                None => tracing::warn!(
                    var = BUF_SIZE_ENV,
                    value = %raw,
                    "ignoring unparseable buffer size"
                ),
            }
        }

        if let Some(raw) = lookup(BUF_MODE_ENV) {
            match BufMode::from_str_loose(&raw) {
                Some(mode) => config.mode = mode,
                None => tracing::warn!(
                    var = BUF_MODE_ENV,
                    value = %raw,
                    "ignoring unknown buffering mode"
                ),
            }
        }

        config
    }
}

/// Parse a byte count such as `4096`, `64k` or `1M`. Zero is rejected.
#[must_use]
pub fn parse_buf_size(s: &str) -> Option<usize> {
    let s = s.trim();
    let (digits, multiplier) = match s.as_bytes().last()? {
        b'k' | b'K' => (&s[..s.len() - 1], 1024),
        b'm' | b'M' => (&s[..s.len() - 1], 1024 * 1024),
        _ => (s, 1),
    };
    let value: usize = digits.parse().ok()?;
    match value.checked_mul(multiplier)? {
        0 => None,
        bytes => Some(bytes),
    }
}

static PROCESS_DEFAULTS: OnceLock<WriterConfig> = OnceLock::new();

/// Environment-derived config, read on first call and cached thereafter.
#[must_use]
pub fn defaults() -> WriterConfig {
    *PROCESS_DEFAULTS.get_or_init(WriterConfig::from_env)
}
