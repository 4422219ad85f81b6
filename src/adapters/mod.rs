// Adapters - External system implementations

pub mod libav;
pub mod toml_config;

// Re-export adapters
pub use libav::LibavBackend;
pub use toml_config::TomlConfigAdapter;
