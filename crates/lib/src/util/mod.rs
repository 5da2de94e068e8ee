//! Shared utilities.
//!
//! Test helpers for simulating the build toolchain.

#[cfg(all(test, unix))]
pub mod testutil;
