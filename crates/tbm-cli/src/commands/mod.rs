//! Command implementations.

pub mod browse;
pub mod count;
pub mod list;
pub mod show;
