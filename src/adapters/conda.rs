use crate::domain::model::EnvironmentSpec;
use crate::domain::ports::Toolchain;
use crate::utils::error::{ReproError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// 以 conda 相容 CLI 實作的 Toolchain。binary 可替換（mamba、micromamba、測試 stub）
#[derive(Debug, Clone)]
pub struct CondaToolchain {
    binary: String,
}

impl CondaToolchain {
    pub fn new() -> Self {
        Self {
            binary: "conda".to_string(),
        }
    }

    pub fn with_binary<S: Into<String>>(binary: S) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for CondaToolchain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Toolchain for CondaToolchain {
    async fn env_exists(&self, name: &str) -> Result<bool> {
        tracing::debug!("Listing environments via: {} env list --json", self.binary);

        let output = Command::new(&self.binary)
            .args(["env", "list", "--json"])
            .output()
            .await?;

        if !output.status.success() {
            return Err(ReproError::ToolchainError {
                message: format!(
                    "'{} env list' exited with {}: {}",
                    self.binary,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        // 輸出格式: {"envs": ["/path/to/envs/<name>", ...]}
        let listing: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        let envs = listing
            .get("envs")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ReproError::ToolchainError {
                message: format!("'{} env list --json' returned no 'envs' array", self.binary),
            })?;

        let found = envs.iter().any(|entry| {
            entry
                .as_str()
                .and_then(|path| Path::new(path).file_name())
                .and_then(|f| f.to_str())
                .map(|f| f == name)
                .unwrap_or(false)
        });

        Ok(found)
    }

    async fn create_env(&self, spec: &EnvironmentSpec) -> Result<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["create", "-y", "-n", &spec.name]);

        for channel in &spec.channels {
            cmd.arg("-c").arg(channel);
        }

        for package in &spec.packages {
            cmd.arg(package.to_string());
        }

        tracing::info!(
            "🔧 Creating environment '{}' ({} packages)",
            spec.name,
            spec.packages.len()
        );

        // 繼承 stdio，讓使用者看到 solver 的進度輸出
        let status = cmd.status().await?;

        if !status.success() {
            return Err(ReproError::ProvisioningError {
                name: spec.name.clone(),
                reason: format!(
                    "'{} create' exited with {} (unresolved package constraints?)",
                    self.binary, status
                ),
            });
        }

        Ok(())
    }

    async fn run_step(
        &self,
        env_name: &str,
        interpreter: &str,
        script: &str,
        workdir: &Path,
    ) -> Result<i32> {
        tracing::debug!(
            "Running '{} {}' in environment '{}' (cwd: {})",
            interpreter,
            script,
            env_name,
            workdir.display()
        );

        // driver 不接受任何參數；工作目錄固定在 repository root
        let status = Command::new(&self.binary)
            .args(["run", "--no-capture-output", "-n", env_name])
            .arg(interpreter)
            .arg(script)
            .current_dir(workdir)
            .status()
            .await?;

        Ok(status.code().unwrap_or(-1))
    }
}
