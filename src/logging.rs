use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Registry, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this more than
/// once is a no-op.
pub fn init_tracing(default_level: &str) {
    if INITIALISED.set(()).is_err() {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = build_subscriber(filter, std::io::stderr, std::io::stderr().is_terminal());

    // Another subscriber may already be installed by an embedding application
    let _ = subscriber.try_init();
}

fn build_subscriber<W>(
    filter: EnvFilter,
    writer: W,
    ansi: bool,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    Registry::default().with(filter).with(fmt_layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::fmt::TestWriter;

    #[test]
    fn test_filter_applies_to_scoped_subscriber() {
        let subscriber = build_subscriber(EnvFilter::new("warn"), TestWriter::new(), false);
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(Level::WARN));
            assert!(!tracing::enabled!(Level::DEBUG));
            tracing::warn!("captured by the test writer");
        });
    }

    #[test]
    fn test_target_directive() {
        let filter = EnvFilter::new("info,lung_slice::stats=debug");
        let subscriber = build_subscriber(filter, TestWriter::new(), false);
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "lung_slice::stats", Level::DEBUG));
            assert!(!tracing::enabled!(target: "lung_slice::session", Level::DEBUG));
        });
    }
}
