//! Default configuration values

use super::schema::Config;

pub const CONDITION_TYPE_READY: &str = "Ready";

/// Get the default configuration
pub fn default_config() -> Config {
    Config::default()
}

pub(super) fn condition_types() -> Vec<String> {
    vec![CONDITION_TYPE_READY.to_string()]
}

pub(super) fn page_size() -> u32 {
    crate::fetch::PAGE_SIZE
}
