//! Tracing subscriber setup shared by binaries and tests.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "stayframe_core=info,stayframe_storage=info,stayframe_extract=info,stayframe_merge=info,stayframe=info"
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `fallback`,
/// which in turn wins over [`default_log_filter`].
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(fallback: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(default_log_filter())));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
