//! Configuration module for Sitewalk
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing values fall back to the crawler defaults.
//!
//! # Example
//!
//! ```no_run
//! use sitewalk::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitewalk.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, PolicyConfig, DEFAULT_ACCEPT_LANGUAGE,
    DEFAULT_CLIENT_IDENTITY, DEFAULT_IGNORE_EXTENSIONS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
