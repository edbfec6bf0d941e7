#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber wired to the test writer so dropped-event and
/// unresolvable-root warnings show up in failing test output.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
