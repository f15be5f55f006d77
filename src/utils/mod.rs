//! Small formatting helpers shared by the programs.

pub mod format;

pub use format::*;
