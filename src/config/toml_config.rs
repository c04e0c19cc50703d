use crate::domain::model::{PackageRequirement, StepSpec};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ReproError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_INTERPRETER: &str = "python";
const DEFAULT_WORKDIR: &str = ".";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproConfig {
    pub project: ProjectConfig,
    pub environment: EnvironmentConfig,
    pub runner: Option<RunnerConfig>,
    pub tiers: HashMap<String, TierConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,
    pub channels: Option<Vec<String>>,
    pub packages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub interpreter: Option<String>,
    pub workdir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    pub description: Option<String>,
    pub steps: Vec<StepConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    pub name: String,
    pub script: String,
}

impl ReproConfig {
    /// 從 TOML 檔案載入 reproduction spec
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReproError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析 spec
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReproError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPRO_ENV_NAME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證 spec 的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_identifier("environment.name", &self.environment.name)?;

        if self.environment.packages.is_empty() {
            return Err(ReproError::MissingConfigError {
                field: "environment.packages".to_string(),
            });
        }

        // 所有套件字串必須可解析
        for raw in &self.environment.packages {
            PackageRequirement::parse(raw)?;
        }

        crate::utils::validation::validate_path("runner.workdir", self.workdir())?;

        if self.tiers.is_empty() {
            return Err(ReproError::MissingConfigError {
                field: "tiers".to_string(),
            });
        }

        for (tier_name, tier) in &self.tiers {
            if tier.steps.is_empty() {
                return Err(ReproError::InvalidConfigValueError {
                    field: format!("tiers.{}.steps", tier_name),
                    value: String::new(),
                    reason: "Tier must declare at least one step".to_string(),
                });
            }

            for step in &tier.steps {
                crate::utils::validation::validate_non_empty_string(
                    &format!("tiers.{}.steps.name", tier_name),
                    &step.name,
                )?;
                crate::utils::validation::validate_path(
                    &format!("tiers.{}.steps.script", tier_name),
                    &step.script,
                )?;
            }
        }

        Ok(())
    }

    pub fn tier_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tiers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn tier(&self, name: &str) -> Option<&TierConfig> {
        self.tiers.get(name)
    }
}

impl ConfigProvider for ReproConfig {
    fn env_name(&self) -> &str {
        &self.environment.name
    }

    fn channels(&self) -> &[String] {
        self.environment.channels.as_deref().unwrap_or(&[])
    }

    fn packages(&self) -> &[String] {
        &self.environment.packages
    }

    fn interpreter(&self) -> &str {
        self.runner
            .as_ref()
            .and_then(|r| r.interpreter.as_deref())
            .unwrap_or(DEFAULT_INTERPRETER)
    }

    fn workdir(&self) -> &str {
        self.runner
            .as_ref()
            .and_then(|r| r.workdir.as_deref())
            .unwrap_or(DEFAULT_WORKDIR)
    }

    fn steps(&self, tier: &str) -> Option<Vec<StepSpec>> {
        self.tiers.get(tier).map(|t| {
            t.steps
                .iter()
                .map(|s| StepSpec {
                    name: s.name.clone(),
                    script: s.script.clone(),
                })
                .collect()
        })
    }
}

impl Validate for ReproConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
