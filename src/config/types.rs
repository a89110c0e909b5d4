//! Configuration types for the grade engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::{Deserialize, Serialize};

use crate::classification::DoctoratePolicy;
use crate::formula::Dialect;
use crate::roster::RosterColumns;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// The `host:port` address to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Engine settings read from `engine.yaml`.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dialect used when formulas are returned as text.
    pub dialect: Dialect,
    /// How Doctorate is treated where the table has no step.
    pub doctorate_policy: DoctoratePolicy,
    /// Roster header names.
    pub roster: RosterColumns,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// HTTP listener settings.
    pub server: ServerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            doctorate_policy: DoctoratePolicy::default(),
            roster: RosterColumns::default(),
            log_level: "info".to_string(),
            server: ServerConfig::default(),
        }
    }
}
