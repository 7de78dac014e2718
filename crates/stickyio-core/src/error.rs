//! Sticky error type.
//!
//! A `DeferredWriter` keeps the first sink failure it sees and hands it back
//! from every error-returning call until the error is reset. `io::Error` is
//! not `Clone`, so the original is shared behind an `Arc` and every copy
//! refers to the same underlying error.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// The first error reported by the sink, retained verbatim.
#[derive(Debug, Clone, Error)]
#[error(transparent)]
pub struct StickyError(Arc<io::Error>);

impl StickyError {
    /// Kind of the underlying I/O error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        self.0.kind()
    }

    /// The original error reported by the sink.
    #[must_use]
    pub fn get_ref(&self) -> &io::Error {
        &self.0
    }

    /// True if both values carry the very same recorded failure.
    #[must_use]
    pub fn same_as(&self, other: &StickyError) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<io::Error> for StickyError {
    fn from(err: io::Error) -> Self {
        Self(Arc::new(err))
    }
}

impl From<StickyError> for io::Error {
    fn from(err: StickyError) -> Self {
        io::Error::new(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_clone_shares_the_original() {
        let err = StickyError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        let copy = err.clone();
        assert!(err.same_as(&copy));
        assert_eq!(copy.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(copy.to_string(), "gone");
    }

    #[test]
    fn test_distinct_failures_are_not_the_same() {
        let a = StickyError::from(io::Error::other("a"));
        let b = StickyError::from(io::Error::other("a"));
        assert!(!a.same_as(&b));
    }

    #[test]
    fn test_converts_back_to_io_error() {
        let err = StickyError::from(io::Error::new(io::ErrorKind::WriteZero, "short"));
        let io_err: io::Error = err.clone().into();
        assert_eq!(io_err.kind(), io::ErrorKind::WriteZero);
        let inner = io_err
            .get_ref()
            .and_then(|e| e.downcast_ref::<StickyError>())
            .expect("sticky error as payload");
        assert!(inner.same_as(&err));
    }

    #[test]
    fn test_transparent_display_and_source() {
        let err = StickyError::from(io::Error::other("disk full"));
        assert_eq!(err.to_string(), "disk full");
        // Transparent: the source is the wrapped error's source, which is none here.
        assert!(err.source().is_none());
    }
}
