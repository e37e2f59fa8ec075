use tracing::Level;

/// Install a `fmt` subscriber for the crate's own diagnostics.
///
/// The logger reports publish failures, invalid levels and shutdown
/// progress through `tracing`; applications that don't already install a
/// subscriber can call this once at startup. Returns `false` if a global
/// subscriber was already set.
pub fn init_diagnostics(max_level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .try_init()
        .is_ok()
}
