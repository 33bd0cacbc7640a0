//! Log filter construction for the `sprout` binary

use tracing_subscriber::EnvFilter;

/// Level used until the configuration file has been read
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Per-crate directives for a configured level
pub fn default_directives(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { BOOTSTRAP_LEVEL } else { level };
    format!(
        "sprout_studio={level},sprout_common={level},sprout_path={level}",
        level = level
    )
}

/// `RUST_LOG` when set, else the directives for `level`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Whether `RUST_LOG` overrides the configured level
pub fn rust_log_set() -> bool {
    std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_cover_every_crate() {
        assert_eq!(
            default_directives("debug"),
            "sprout_studio=debug,sprout_common=debug,sprout_path=debug"
        );
    }

    #[test]
    fn test_blank_level_uses_bootstrap_level() {
        assert_eq!(default_directives("  "), default_directives(BOOTSTRAP_LEVEL));
    }
}
