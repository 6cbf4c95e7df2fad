use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the global stdout subscriber. Unknown levels fall back to INFO.
pub fn setup_logging(level: &str) {
    let max_level = level.trim().parse::<Level>().unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_target(false)
        .finish();

    // a second install (tests, embedding) keeps the first subscriber
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Tracing subscriber already set: {e}");
    }
}
