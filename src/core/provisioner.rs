use crate::domain::model::EnvironmentSpec;
use crate::domain::ports::Toolchain;
use crate::utils::error::{ReproError, Result};

/// Environment Provisioner：把環境規格實體化為可啟用的環境。
/// 名稱在工具的 namespace 中必須唯一，重複建立是錯誤而非沿用。
pub struct Provisioner<'a, T: Toolchain> {
    toolchain: &'a T,
}

impl<'a, T: Toolchain> Provisioner<'a, T> {
    pub fn new(toolchain: &'a T) -> Self {
        Self { toolchain }
    }

    pub async fn provision(&self, spec: &EnvironmentSpec) -> Result<()> {
        if self.toolchain.env_exists(&spec.name).await? {
            return Err(ReproError::ProvisioningError {
                name: spec.name.clone(),
                reason: "an environment with this name already exists".to_string(),
            });
        }

        tracing::info!("🔧 Provisioning environment '{}'", spec.name);
        self.toolchain.create_env(spec).await?;
        tracing::info!("✅ Environment '{}' provisioned", spec.name);

        Ok(())
    }

    /// skip-provision 路徑：只確認環境存在，不建立
    pub async fn verify(&self, name: &str) -> Result<()> {
        if !self.toolchain.env_exists(name).await? {
            return Err(ReproError::EnvironmentMissingError {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
