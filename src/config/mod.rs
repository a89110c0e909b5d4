//! Configuration loading and management for the grade engine.
//!
//! This module loads engine settings and the sheet layout from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use grade_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Doctorate policy: {:?}", config.engine().doctorate_policy);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, ServerConfig};
