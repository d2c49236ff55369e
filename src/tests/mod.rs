mod precision_tests;
mod surgery_tests;

/// Route `tracing` output to the test harness; repeated calls are no-ops
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
