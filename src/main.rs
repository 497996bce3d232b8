//! Converts every `*.xlsx` day sheet in the current directory to `<name>_cleaned.csv`.

use diet_sheet::converter;
use diet_sheet::converter::options::Options;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Result lines go to stdout, diagnostics to stderr
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    converter::run(&Options::default())?;
    Ok(())
}

/// Log filter from `RUST_LOG` directives, warnings only when none are given.
fn log_filter(directives: Option<String>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    fn scanner_debug_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "diet_sheet::diet::scanner", Level::DEBUG)
        })
    }

    fn scanner_warn_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "diet_sheet::diet::scanner", Level::WARN)
        })
    }

    #[test]
    fn rust_log_raises_the_level() {
        assert!(scanner_debug_enabled(log_filter(Some("diet_sheet=debug".to_owned()))));
    }

    #[test]
    fn warnings_by_default() {
        assert!(!scanner_debug_enabled(log_filter(None)));
        assert!(scanner_warn_enabled(log_filter(None)));
        assert!(!scanner_debug_enabled(log_filter(Some(String::new()))));
    }
}
