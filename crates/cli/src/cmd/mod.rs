mod build;
mod inspect;

pub use build::{BuildArgs, cmd_build};
pub use inspect::cmd_inspect;
