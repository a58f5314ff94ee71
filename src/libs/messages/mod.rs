//! User-facing message catalog and the output macros built on it.

pub mod display;
pub mod macros;
pub mod types;

pub use types::{Entity, Message};
