//! Internal diagnostics for the logger itself.
//!
//! These go to the `log` crate, never back through a `Logger`, so a failing
//! sink cannot trigger further writes to itself.

pub mod context;

pub use context::DiagContext;

/// Install an `env_logger` backend for internal diagnostics.
///
/// Controlled by `RUST_LOG`, defaulting to `warn`. Safe to call repeatedly.
pub fn init_diagnostics() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .is_test(cfg!(test))
        .try_init();
}
