//! Configuration for kubetree
//!
//! A small YAML file layered under environment overrides and command line
//! flags. Everything has a default, so the file is optional.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{ColorMode, Config, parse_condition_types};
