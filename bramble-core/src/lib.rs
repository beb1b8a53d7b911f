//! Core functionality for Bramble property-based testing.
//!
//! This crate provides the execution core: the seeded random source, lazily
//! expanded shrink trees, the property contract, the trial runner with its
//! shrink search, run reports, and assertions built on top of them.

pub mod assertion;
pub mod data;
pub mod error;
pub mod property;
pub mod report;
pub mod runner;
pub mod shrinkable;

// Re-export the main types
pub use assertion::*;
pub use data::*;
pub use error::*;
pub use property::*;
pub use report::*;
pub use runner::*;
pub use shrinkable::*;
