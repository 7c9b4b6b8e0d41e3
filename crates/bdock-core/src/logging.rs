#![forbid(unsafe_code)]

//! Tracing subscriber setup.
//!
//! bdock emits `tracing` events under the `bdock.*` targets. Hosts that do
//! not install their own subscriber can call [`init`] once at startup.
//!
//! The filter is read from the `BDOCK_LOG` environment variable using
//! `EnvFilter` syntax (e.g. `BDOCK_LOG=bdock.drag=trace,info`) and defaults
//! to `info`. With the `tracing-json` feature the output is one JSON object
//! per line.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "BDOCK_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Build the filter from [`LOG_ENV_VAR`], falling back to `info`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    filter_from(std::env::var(LOG_ENV_VAR).ok().as_deref())
}

/// Unset, blank or unparsable directives fall back to the default.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a global fmt subscriber.
///
/// Returns `false` if a global subscriber was already set; the existing one
/// is kept.
pub fn init() -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    #[cfg(feature = "tracing-json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "tracing-json"))]
    let result = builder.with_target(true).try_init();
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_falls_back_to_info() {
        assert_eq!(filter_from(None).to_string(), "info");
        assert_eq!(filter_from(Some("  ")).to_string(), "info");
    }

    #[test]
    fn bad_directive_falls_back_to_info() {
        assert_eq!(filter_from(Some("bdock.drag=loud")).to_string(), "info");
    }

    #[test]
    fn valid_directive_is_kept() {
        assert_eq!(filter_from(Some("bdock.drag=trace")).to_string(), "bdock.drag=trace");
    }

    #[test]
    fn env_filter_reads_the_bdock_variable() {
        let expected = filter_from(std::env::var(LOG_ENV_VAR).ok().as_deref()).to_string();
        assert_eq!(env_filter().to_string(), expected);
    }
}
