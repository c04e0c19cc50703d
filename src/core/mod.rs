pub mod engine;
pub mod provisioner;
pub mod runner;

pub use crate::domain::model::{
    EnvironmentSpec, PackageRequirement, RunSummary, StageResult, StepSpec,
};
pub use crate::domain::ports::{ConfigProvider, Toolchain};
pub use crate::utils::error::Result;
