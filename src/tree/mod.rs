//! Ownership tree
//!
//! Objects are indexed by UID with owner → children edges, then walked
//! depth-first from a chosen root to produce the printed table.

mod age;
mod index;
mod object;
mod render;

pub use age::{format_age, human_duration};
pub use index::OwnershipIndex;
pub use object::Object;
pub use render::{TreeRenderer, TreeRow, display_prefix, format_table};
