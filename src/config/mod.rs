/// Database configuration and connection management
pub mod database;

/// Group seed configuration loading from config.toml
pub mod groups;
