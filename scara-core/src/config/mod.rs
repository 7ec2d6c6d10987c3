//! Configuration types
//!
//! Board-agnostic configuration structures, embedded in the firmware as
//! postcard binary data.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
