//! Opt-in tracing setup for binaries embedding the library.
//!
//! The library itself only emits `tracing` events; installing a
//! subscriber is the host's call. Hosts with their own subscriber skip
//! this entirely.

use tracing_subscriber::EnvFilter;

/// Install a formatted `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to the given default directive when `RUST_LOG` is unset.
/// Safe to call more than once; later calls lose quietly against an
/// already-installed subscriber.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init_tracing("info");
        init_tracing("debug");
    }
}
