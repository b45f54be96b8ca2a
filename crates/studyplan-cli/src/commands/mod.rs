pub mod auth;
pub mod config;
pub mod plan;

/// Runtime for the async export and OAuth calls.
pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
