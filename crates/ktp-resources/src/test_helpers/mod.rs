//! Test helpers for resource manager tests
//!
//! Recording notifier, sinks and openers plus a failing catalog store, so the
//! manager can be exercised without touching the filesystem.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
