//! Bramble property-based testing library.
//!
//! This is the main entry point for Bramble, re-exporting the runner,
//! shrink trees and assertions from `bramble-core`.

pub use bramble_core::*;
