//! Core traits and adapters for andermix.

pub mod traits;
pub mod wrappers;

pub use traits::*;
pub use wrappers::*;
