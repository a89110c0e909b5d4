//! Log subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the log filter: `RUST_LOG` when set, else `grade_engine={level}`
/// with everything else at `warn`.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("warn,grade_engine={}", level)))
        .unwrap_or_else(|_| EnvFilter::new("warn,grade_engine=info"))
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparsable_level_falls_back() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = filter("not a level!!");
        assert!(filter.to_string().contains("grade_engine=info"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init("debug");
        init("info");
    }
}
