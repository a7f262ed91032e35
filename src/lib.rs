// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod highlight;
pub mod language;
pub mod layout;
pub mod logging;
pub mod pressed_keys;
pub mod runtime;
pub mod scoring;
pub mod session;
