//! Logging abstraction layer
//!
//! Logging macros that forward to either the `log` or the `tracing` crate.
//! Every record is emitted under the [`TARGET`] target, so route matching
//! can be filtered on its own (`RUST_LOG=route_pattern=trace`).
//!
//! # Features
//!
//! - `log` (default) - Uses the standard `log` crate
//! - `tracing` - Uses the `tracing` crate for structured logging
//!
//! Choose one feature at compile time. They are mutually exclusive.
//! With neither enabled the macros expand to nothing.
//!
//! # Usage
//!
//! ```ignore
//! use route_pattern::{debug_log, trace_log, warn_log};
//!
//! debug_log!("Registered route '{}' as {}", id, pattern);
//! trace_log!("Resolving path: '{}'", path);
//! warn_log!("Rejected route pattern: {}", err);
//! ```

/// Log target shared by every record this crate emits
pub const TARGET: &str = "route_pattern";

#[doc(hidden)]
#[macro_export]
macro_rules! __route_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: $crate::logging::TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!(target: $crate::logging::TARGET, $($arg)*);
    };
}

/// Trace-level logging
///
/// Per-resolution detail: cache hits, match attempts.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::__route_log!(trace, $($arg)*)
    };
}

/// Debug-level logging
///
/// Table mutations and snapshot publishing.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::__route_log!(debug, $($arg)*)
    };
}

/// Warn-level logging
///
/// Rejected patterns and ambiguous registrations.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::__route_log!(warn, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_accept_format_args() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = "/a/b";
        trace_log!("Resolving path: '{}'", path);
        debug_log!("Published snapshot {}", 3);
        warn_log!("Duplicate shape {path}");
    }
}
