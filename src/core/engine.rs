use crate::core::provisioner::Provisioner;
use crate::core::runner::StageRunner;
use crate::domain::model::{EnvironmentSpec, RunSummary};
use crate::domain::ports::{ConfigProvider, Toolchain};
use crate::utils::error::{ReproError, Result};
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

/// 整條 reproduction pipeline：provision (或 verify) → run tier steps。
/// 兩個階段嚴格排序，任一失敗即整體失敗，不做任何恢復
pub struct ReproEngine<T: Toolchain, C: ConfigProvider> {
    toolchain: T,
    config: C,
    monitor: SystemMonitor,
    skip_provision: bool,
}

impl<T: Toolchain, C: ConfigProvider> ReproEngine<T, C> {
    pub fn new(toolchain: T, config: C) -> Self {
        Self {
            toolchain,
            config,
            monitor: SystemMonitor::new(false),
            skip_provision: false,
        }
    }

    pub fn new_with_monitoring(toolchain: T, config: C, monitor_enabled: bool) -> Self {
        Self {
            toolchain,
            config,
            monitor: SystemMonitor::new(monitor_enabled),
            skip_provision: false,
        }
    }

    pub fn with_skip_provision(mut self, skip: bool) -> Self {
        self.skip_provision = skip;
        self
    }

    pub async fn run(&self, tier: &str) -> Result<RunSummary> {
        let execution_id = format!("repro-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S"));
        let started = Instant::now();

        tracing::info!("🚀 Starting reproduction run {} (tier: {})", execution_id, tier);

        let steps = self
            .config
            .steps(tier)
            .ok_or_else(|| ReproError::InvalidConfigValueError {
                field: "tier".to_string(),
                value: tier.to_string(),
                reason: "Tier is not declared in the spec file".to_string(),
            })?;

        let spec = EnvironmentSpec::from_raw(
            self.config.env_name(),
            self.config.channels(),
            self.config.packages(),
        )?;

        // 階段一：環境必須在 driver 調用前就緒，失敗即中止
        let provisioner = Provisioner::new(&self.toolchain);
        if self.skip_provision {
            tracing::info!("⏭️  Skipping provisioning, verifying environment '{}'", spec.name);
            provisioner.verify(&spec.name).await?;
        } else {
            provisioner.provision(&spec).await?;
        }

        self.monitor.log_stats("Provisioning");

        // 階段二：依序執行 driver steps
        let runner = StageRunner::new(
            &self.toolchain,
            self.config.env_name(),
            self.config.interpreter(),
            self.config.workdir(),
        );
        let stages = runner.run_steps(&steps).await?;

        self.monitor.log_final_stats();

        let summary = RunSummary {
            execution_id,
            tier: tier.to_string(),
            stages,
            total_duration: started.elapsed(),
        };

        tracing::info!(
            "🏁 Run {} completed: {} steps in {:?}",
            summary.execution_id,
            summary.stages.len(),
            summary.total_duration
        );

        Ok(summary)
    }
}
