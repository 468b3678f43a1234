//! Logging setup for the `tpform` binary.
//!
//! The service logs the endpoint at `debug`, the request body at `trace` and
//! mapped failures at `warn`. Higher verbosity also opens up the HTTP client:
//! `-v` shows reqwest's request events, `-vv` adds hyper's connection pool.
//! `RUST_LOG`, when set and valid, replaces the computed filter entirely.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much of the submission pipeline to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Submission progress.
    #[default]
    Normal,
    /// Endpoints, result counts and HTTP client events.
    Verbose,
    /// Request bodies and connection-level detail.
    Trace,
}

impl Verbosity {
    /// Filter directives used when `RUST_LOG` does not override them.
    #[must_use]
    pub fn directives(self) -> &'static str {
        match self {
            Self::Quiet => "typeprocess=error",
            Self::Normal => "typeprocess=info",
            Self::Verbose => "typeprocess=debug,reqwest=debug",
            Self::Trace => "typeprocess=trace,reqwest=trace,hyper_util=debug",
        }
    }
}

/// Build the event filter.
///
/// A non-empty, parseable `rust_log` wins; otherwise the directives for
/// `verbosity` apply.
#[must_use]
pub fn build_filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directives()))
}

/// Initialize the logging system.
///
/// Events go to stderr so that submission results on stdout stay
/// machine-readable. Event targets are shown from `Verbose` up, where
/// reqwest and hyper events are mixed in.
///
/// # Examples
///
/// ```no_run
/// use typeprocess::{init_logging, logging::Verbosity};
///
/// // Show request endpoints and result counts
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let subscriber = tracing_subscriber::registry()
        .with(build_filter(verbosity, rust_log.as_deref()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= Verbosity::Verbose),
        );

    // A subscriber may already be installed (tests, embedding callers)
    let _ = subscriber.try_init();
}

/// Initialize logging for tests.
///
/// Only warnings and errors are shown, through the test writer.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_directives_per_verbosity() {
        assert_eq!(Verbosity::Quiet.directives(), "typeprocess=error");
        assert_eq!(Verbosity::Normal.directives(), "typeprocess=info");
        assert_eq!(
            Verbosity::Verbose.directives(),
            "typeprocess=debug,reqwest=debug"
        );
        assert_eq!(
            Verbosity::Trace.directives(),
            "typeprocess=trace,reqwest=trace,hyper_util=debug"
        );
    }

    #[test]
    fn test_http_client_targets_only_when_verbose() {
        assert!(!Verbosity::Normal.directives().contains("reqwest"));
        assert!(!Verbosity::Verbose.directives().contains("hyper"));
        assert!(Verbosity::Trace.directives().contains("hyper_util="));
    }

    #[test]
    fn test_verbosity_order() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Verbose < Verbosity::Trace);
    }

    #[test]
    fn test_build_filter_from_verbosity() {
        assert_eq!(
            build_filter(Verbosity::Quiet, None).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
        assert_eq!(
            build_filter(Verbosity::Trace, None).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_build_filter_rust_log_overrides() {
        let filter = build_filter(Verbosity::Quiet, Some("typeprocess=debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_build_filter_ignores_unusable_rust_log() {
        let blank = build_filter(Verbosity::Normal, Some("  "));
        assert_eq!(blank.max_level_hint(), Some(LevelFilter::INFO));

        let invalid = build_filter(Verbosity::Normal, Some("typeprocess=loud"));
        assert_eq!(invalid.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        // Only the first call installs a subscriber; later calls are no-ops
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
    }
}
