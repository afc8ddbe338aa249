use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the process-wide tracing subscriber.
///
/// Output goes to stdout as bare lines (no timestamp, level or target) since
/// it doubles as the tool's narration. `RUST_LOG` overrides the default
/// `info` filter; `RUST_LOG=debug` also shows pass boundaries.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_writer(std::io::stdout);

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_logging_init() {
        // only the first init in a process can succeed
        let _ = init();
        tracing::info!("narration line");
        assert!(init().is_err());
    }
}
