use crate::utils::error::{ReproError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// 單一套件需求，從 conda 風格的 `name=version` 字串解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequirement {
    pub name: String,
    pub version: Option<String>,
}

impl PackageRequirement {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.splitn(2, '=');
        let name = parts.next().unwrap_or("").trim();
        let version = parts.next().map(|v| v.trim_start_matches('=').trim());

        if name.is_empty() {
            return Err(ReproError::InvalidConfigValueError {
                field: "environment.packages".to_string(),
                value: raw.to_string(),
                reason: "Package name cannot be empty".to_string(),
            });
        }

        if let Some(v) = version {
            if v.is_empty() {
                return Err(ReproError::InvalidConfigValueError {
                    field: "environment.packages".to_string(),
                    value: raw.to_string(),
                    reason: "Version pin cannot be empty; drop the '=' to leave unpinned"
                        .to_string(),
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            version: version.map(|v| v.to_string()),
        })
    }
}

impl fmt::Display for PackageRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// 環境規格：建立一次、執行期間不再變動
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub name: String,
    pub channels: Vec<String>,
    pub packages: Vec<PackageRequirement>,
}

impl EnvironmentSpec {
    pub fn from_raw(name: &str, channels: &[String], packages: &[String]) -> Result<Self> {
        let packages = packages
            .iter()
            .map(|p| PackageRequirement::parse(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            channels: channels.to_vec(),
            packages,
        })
    }
}

/// Tier 中的單一 driver step；script 以 repository root 為基準，不帶任何參數執行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    pub name: String,
    pub script: String,
}

/// 已完成 step 的執行結果
#[derive(Debug, Clone)]
pub struct StageResult {
    pub step_name: String,
    pub script: String,
    pub duration: Duration,
}

/// 一次 reproduction run 的彙總
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub execution_id: String,
    pub tier: String,
    pub stages: Vec<StageResult>,
    pub total_duration: Duration,
}

impl RunSummary {
    pub fn as_metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        summary.insert(
            "execution_id".to_string(),
            serde_json::Value::String(self.execution_id.clone()),
        );
        summary.insert(
            "tier".to_string(),
            serde_json::Value::String(self.tier.clone()),
        );
        summary.insert(
            "total_steps".to_string(),
            serde_json::Value::Number(self.stages.len().into()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((self.total_duration.as_millis() as u64).into()),
        );

        let executed_steps: Vec<serde_json::Value> = self
            .stages
            .iter()
            .map(|s| serde_json::Value::String(s.step_name.clone()))
            .collect();
        summary.insert(
            "executed_steps".to_string(),
            serde_json::Value::Array(executed_steps),
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pinned_package() {
        let pkg = PackageRequirement::parse("python=3.8").unwrap();
        assert_eq!(pkg.name, "python");
        assert_eq!(pkg.version.as_deref(), Some("3.8"));
        assert_eq!(pkg.to_string(), "python=3.8");
    }

    #[test]
    fn test_parse_unpinned_package() {
        let pkg = PackageRequirement::parse("matplotlib").unwrap();
        assert_eq!(pkg.name, "matplotlib");
        assert!(pkg.version.is_none());
        assert_eq!(pkg.to_string(), "matplotlib");
    }

    #[test]
    fn test_parse_double_equals_pin() {
        // pip 風格的 `==` 也接受
        let pkg = PackageRequirement::parse("econ-ark==0.10.6").unwrap();
        assert_eq!(pkg.name, "econ-ark");
        assert_eq!(pkg.version.as_deref(), Some("0.10.6"));
    }

    #[test]
    fn test_parse_rejects_empty_name_or_version() {
        assert!(PackageRequirement::parse("").is_err());
        assert!(PackageRequirement::parse("=3.8").is_err());
        assert!(PackageRequirement::parse("numpy=").is_err());
    }

    #[test]
    fn test_environment_spec_from_raw() {
        let channels = vec!["conda-forge".to_string()];
        let packages = vec!["python=3.8".to_string(), "numpy".to_string()];
        let spec = EnvironmentSpec::from_raw("paper-repro", &channels, &packages).unwrap();

        assert_eq!(spec.name, "paper-repro");
        assert_eq!(spec.packages.len(), 2);
        assert_eq!(spec.packages[0].to_string(), "python=3.8");
    }

    #[test]
    fn test_run_summary_metadata() {
        let summary = RunSummary {
            execution_id: "repro-20260101T000000".to_string(),
            tier: "min".to_string(),
            stages: vec![
                StageResult {
                    step_name: "policy-functions".to_string(),
                    script: "Code/Python/Simulations/PolicyFuncs.py".to_string(),
                    duration: Duration::from_millis(100),
                },
                StageResult {
                    step_name: "age-means".to_string(),
                    script: "Code/Python/Simulations/AgeMeans.py".to_string(),
                    duration: Duration::from_millis(200),
                },
            ],
            total_duration: Duration::from_millis(300),
        };

        let meta = summary.as_metadata();
        assert_eq!(
            meta.get("total_steps").unwrap(),
            &serde_json::Value::Number(2.into())
        );
        assert_eq!(
            meta.get("total_duration_ms").unwrap(),
            &serde_json::Value::Number(300.into())
        );

        let executed = meta.get("executed_steps").unwrap().as_array().unwrap();
        assert_eq!(executed[0], serde_json::Value::String("policy-functions".to_string()));
        assert_eq!(executed[1], serde_json::Value::String("age-means".to_string()));
    }
}
