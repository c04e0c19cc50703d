use crate::domain::model::{EnvironmentSpec, StepSpec};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// 對外部環境工具 (conda/mamba) 的抽象，測試時以 mock 替換
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// 檢查指定名稱的環境是否已存在於工具的 environment store
    async fn env_exists(&self, name: &str) -> Result<bool>;

    /// 依規格建立新環境；解析失敗以非零退出呈現為錯誤
    async fn create_env(&self, spec: &EnvironmentSpec) -> Result<()>;

    /// 在已佈建的環境中執行一個 driver script（不帶參數），回傳其 exit code
    async fn run_step(
        &self,
        env_name: &str,
        interpreter: &str,
        script: &str,
        workdir: &Path,
    ) -> Result<i32>;
}

pub trait ConfigProvider: Send + Sync {
    fn env_name(&self) -> &str;

    fn channels(&self) -> &[String];

    /// conda 風格的 `name[=version]` 字串
    fn packages(&self) -> &[String];

    fn interpreter(&self) -> &str;

    fn workdir(&self) -> &str;

    /// 指定 tier 的有序 step 列表；tier 不存在時回傳 None
    fn steps(&self, tier: &str) -> Option<Vec<StepSpec>>;
}
