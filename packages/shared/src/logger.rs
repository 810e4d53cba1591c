//! Logging setup for the Project 42 binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the library crate named by `crate_name` and the binary.
/// `RUST_LOG` overrides it entirely when set.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose logs should be shown (e.g., "p42_client")
/// * `binary_name` - The name of the binary (e.g., "p42-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use p42_shared::logger::setup_logger;
///
/// setup_logger("p42_client", "p42-client", "info");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(crate_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directives used when `RUST_LOG` is not set.
fn default_directives(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={}",
        crate_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_normalizes_names() {
        // テスト項目: クレート名とバイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let crate_name = "p42-client";
        let binary_name = "p42-client";

        // when (操作):
        let result = default_directives(crate_name, binary_name, "debug");

        // then (期待する結果):
        assert_eq!(result, "p42_client=debug,p42_client=debug");
    }
}
