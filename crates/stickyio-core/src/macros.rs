/// Build a `&[Arg]` slice for [`printf`](crate::DeferredWriter::printf),
/// [`print`](crate::DeferredWriter::print) and
/// [`println`](crate::DeferredWriter::println).
///
/// ```
/// use stickyio_core::{DeferredWriter, args};
///
/// let mut w = DeferredWriter::with_capacity(64, Vec::new());
/// w.printf("%s has %d items\n", args!["cart", 3]);
/// w.flush().unwrap();
/// assert_eq!(w.get_ref().as_slice(), b"cart has 3 items\n");
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        &[$($crate::Arg::from($arg)),*]
    };
}
