//! Command line front end
//!
//! Argument parsing, logging setup and the top level run loop.

mod args;
mod logging;
mod run;
mod version;

pub use args::{Args, Target, split_kind_name};
pub use logging::init_logging;
pub use run::{NO_OWNED_RESOURCES, RenderOptions, TreeRequest, run, show_tree};
pub use version::VERSION;
