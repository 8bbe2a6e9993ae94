//! Logging facilities for pkgview.
//!
//! pkgview uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in the host application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("pkgview=debug,pkgview_core=info")
//!         .init();
//!
//!     // Host code...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "pkgview_core";
    /// Signal system target.
    pub const SIGNAL: &str = "pkgview_core::signal";
    /// Event coalescer target.
    pub const COALESCER: &str = "pkgview_core::coalescer";
    /// Model/view synchronisation target.
    pub const SYNC: &str = "pkgview::sync";
    /// Headless view state target.
    pub const VIEW: &str = "pkgview::view";
    /// Caption formatting target.
    pub const CAPTION: &str = "pkgview::caption";
    /// Performance spans target.
    pub const PERF: &str = "pkgview::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to measure how long an operation such as a recompute takes.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it compiles and doesn't panic
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_targets_are_namespaced() {
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::COALESCER.starts_with(targets::CORE));
        assert!(targets::SYNC.starts_with("pkgview::"));
    }
}
