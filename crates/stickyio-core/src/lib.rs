//! # stickyio-core
//!
//! Buffered output with deferred error checking.
//!
//! A [`DeferredWriter`] keeps the first error its sink reports and turns
//! every later write into a no-op, so a caller can emit a whole section
//! and check for failure once:
//!
//! ```
//! use stickyio_core::{DeferredWriter, args};
//!
//! let mut w = DeferredWriter::new(Vec::new());
//! w.write_str("id=");
//! w.write_decimal(42);
//! w.write_byte(b' ');
//! w.printf("%#x\n", args![255u32]);
//! w.flush_interim();
//! assert!(w.err().is_none());
//! assert_eq!(w.get_ref().as_slice(), b"id=42 0xff\n");
//! ```
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

mod macros;

pub mod buffer;
pub mod config;
pub mod error;
pub mod printf;
pub mod writer;

pub use buffer::{BufMode, BufferedSink, WriteResult};
pub use config::{DEFAULT_BUF_SIZE, WriterConfig};
pub use error::StickyError;
pub use printf::Arg;
pub use writer::{DeferredWriter, Outcome, SCRATCH_LEN};
