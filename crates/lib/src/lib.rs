//! eggpack-lib: packaging logic for eggpack
//!
//! This crate turns a Scrapy project into a single egg archive:
//! - `descriptor`: reads `scrapy.cfg` and resolves the settings module
//! - `setup`: writes the `setup.py` build descriptor, preserving any existing one
//! - `build`: runs the build toolchain in a throwaway workspace and locates the egg
//! - `emit`: streams the egg to a sink and removes the workspace
//! - `package`: the whole pipeline as a single call

pub mod build;
pub mod consts;
pub mod descriptor;
pub mod emit;
pub mod package;
pub mod setup;
pub mod util;
