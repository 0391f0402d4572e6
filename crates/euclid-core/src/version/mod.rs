//! Component version ordering.

pub mod ordinal;

pub use ordinal::{ComponentVersion, InvalidVersion};
