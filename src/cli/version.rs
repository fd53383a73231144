//! Version string

/// Version reported by `--version`, prefixed with `v`
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
