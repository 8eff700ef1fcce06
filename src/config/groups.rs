//! Group seed configuration loading from config.toml
//!
//! This module provides functionality to load initial group definitions from
//! a TOML configuration file. The groups defined in config.toml are used to
//! seed the database on first run; groups that already exist are left alone.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of group configurations to seed
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Configuration for a single savings circle
#[derive(Debug, Deserialize, Clone)]
pub struct GroupConfig {
    /// Name of the group
    pub name: String,
    /// Target number of members
    pub member_count: i32,
    /// Fixed monthly contribution per member, in whole currency units
    pub monthly_amount: i64,
    /// Date of the first collection (ISO format, e.g. `2024-01-15`)
    pub start_date: NaiveDate,
    /// Members to create with the group
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

/// Configuration for a single seeded member
#[derive(Debug, Deserialize, Clone)]
pub struct MemberConfig {
    /// Display name of the member
    pub name: String,
    /// Role within the group: `"owner"`, `"admin"`, or `"member"`
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "member".to_string()
}

/// Loads group configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads group configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
