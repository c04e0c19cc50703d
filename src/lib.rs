pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ReproConfig;

pub use adapters::CondaToolchain;
pub use crate::core::{engine::ReproEngine, provisioner::Provisioner, runner::StageRunner};
pub use utils::error::{ReproError, Result};
