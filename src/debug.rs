//! Macros for last-resort debugging.
//!
//! Encoding errors are terminal and carry only a kind and a short message,
//! so finding out where inside a deeply nested value tree an error was
//! produced can be tedious. The macro `xerr!()` helps with that: it logs
//! the error expression at debug level and, if the `extra-debug` feature
//! is enabled, prints a backtrace before resolving into whatever the
//! expression it encloses resolves to. Use it whenever you initially
//! produce an error, i.e.:
//!
//! ```rust,ignore
//! if unused > 7 {
//!     xerr!(return Err(EncodeError::invalid_value("unused bits")))
//! }
//! ```

#[cfg(feature = "extra-debug")]
pub use backtrace::Backtrace;

#[cfg(feature = "extra-debug")]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => {{
        log::debug!("encode error at {}:{}", file!(), line!());
        eprintln!(
            "--- EXTRA DEBUG ---\n{:?}\n--- EXTRA DEBUG ---",
            $crate::debug::Backtrace::new()
        );
        $test
    }}
}

#[cfg(not(feature = "extra-debug"))]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => {{
        log::debug!("encode error at {}:{}", file!(), line!());
        $test
    }}
}
