//! Filesystem primitives shared across features.

pub mod atomic;
pub mod swap;

pub use atomic::write_atomic;
pub use swap::{recover, swap_into_place};
