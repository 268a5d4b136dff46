use tracing_subscriber::{EnvFilter, fmt};

use crate::app::AppError;

/// Used when `RUST_LOG` is unset or unparseable. HTTP client internals are
/// kept at warn so the poll loop stays readable at info.
pub const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn,rustls=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init() -> Result<(), AppError> {
    fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
        .map_err(AppError::logging_init)
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    use super::DEFAULT_FILTER;

    #[test]
    fn default_filter_directives_parse() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
