use crate::domain::model::{StageResult, StepSpec};
use crate::domain::ports::Toolchain;
use crate::utils::error::{ReproError, Result};
use std::path::PathBuf;
use std::time::Instant;

/// Pipeline Runner：在已佈建的環境中依序執行一個 tier 的 driver steps。
/// 嚴格循序、無重試、無並發；第一個非零 exit 即中止
pub struct StageRunner<'a, T: Toolchain> {
    toolchain: &'a T,
    env_name: String,
    interpreter: String,
    workdir: PathBuf,
}

impl<'a, T: Toolchain> StageRunner<'a, T> {
    pub fn new(toolchain: &'a T, env_name: &str, interpreter: &str, workdir: &str) -> Self {
        Self {
            toolchain,
            env_name: env_name.to_string(),
            interpreter: interpreter.to_string(),
            workdir: PathBuf::from(workdir),
        }
    }

    pub async fn run_steps(&self, steps: &[StepSpec]) -> Result<Vec<StageResult>> {
        let mut results = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            tracing::info!(
                "▶️  Step {}/{}: {} ({})",
                index + 1,
                steps.len(),
                step.name,
                step.script
            );

            let started = Instant::now();
            let code = self
                .toolchain
                .run_step(&self.env_name, &self.interpreter, &step.script, &self.workdir)
                .await?;
            let duration = started.elapsed();

            if code != 0 {
                tracing::error!(
                    "❌ Step '{}' exited with code {} after {:?}",
                    step.name,
                    code,
                    duration
                );
                // 後續 steps 不再嘗試；輸出產物的完整性由 driver 自行負責
                return Err(ReproError::DriverFailure {
                    step: step.name.clone(),
                    code,
                });
            }

            tracing::info!("✅ Step '{}' completed in {:?}", step.name, duration);

            results.push(StageResult {
                step_name: step.name.clone(),
                script: step.script.clone(),
                duration,
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EnvironmentSpec;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// 記錄每次呼叫並依 script 名稱決定 exit code
    struct RecordingToolchain {
        invocations: Mutex<Vec<(String, String, String, PathBuf)>>,
        failing_script: Option<(String, i32)>,
    }

    impl RecordingToolchain {
        fn new() -> Self {
            Self {
                invocations: Mutex::new(Vec::new()),
                failing_script: None,
            }
        }

        fn failing_on(script: &str, code: i32) -> Self {
            Self {
                invocations: Mutex::new(Vec::new()),
                failing_script: Some((script.to_string(), code)),
            }
        }

        fn invocations(&self) -> Vec<(String, String, String, PathBuf)> {
            self.invocations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Toolchain for RecordingToolchain {
        async fn env_exists(&self, _name: &str) -> Result<bool> {
            Ok(true)
        }

        async fn create_env(&self, _spec: &EnvironmentSpec) -> Result<()> {
            Ok(())
        }

        async fn run_step(
            &self,
            env_name: &str,
            interpreter: &str,
            script: &str,
            workdir: &Path,
        ) -> Result<i32> {
            self.invocations.lock().unwrap().push((
                env_name.to_string(),
                interpreter.to_string(),
                script.to_string(),
                workdir.to_path_buf(),
            ));

            match &self.failing_script {
                Some((failing, code)) if failing == script => Ok(*code),
                _ => Ok(0),
            }
        }
    }

    fn three_steps() -> Vec<StepSpec> {
        vec![
            StepSpec {
                name: "policy-functions".to_string(),
                script: "Code/Python/Simulations/PolicyFuncs.py".to_string(),
            },
            StepSpec {
                name: "few-agents".to_string(),
                script: "Code/Python/Simulations/FewAgents.py".to_string(),
            },
            StepSpec {
                name: "age-means".to_string(),
                script: "Code/Python/Simulations/AgeMeans.py".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_runs_all_steps_in_order() {
        let toolchain = RecordingToolchain::new();
        let runner = StageRunner::new(&toolchain, "paper-repro", "python", ".");

        let results = runner.run_steps(&three_steps()).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].step_name, "policy-functions");
        assert_eq!(results[2].step_name, "age-means");

        let invocations = toolchain.invocations();
        assert_eq!(invocations.len(), 3);
        assert_eq!(invocations[0].2, "Code/Python/Simulations/PolicyFuncs.py");
        assert_eq!(invocations[1].2, "Code/Python/Simulations/FewAgents.py");
        assert_eq!(invocations[2].2, "Code/Python/Simulations/AgeMeans.py");
    }

    #[tokio::test]
    async fn test_invocation_contract() {
        let toolchain = RecordingToolchain::new();
        let runner = StageRunner::new(&toolchain, "paper-repro", "python", "/repo/root");

        runner.run_steps(&three_steps()[..1]).await.unwrap();

        let invocations = toolchain.invocations();
        let (env, interpreter, script, workdir) = &invocations[0];
        assert_eq!(env, "paper-repro");
        assert_eq!(interpreter, "python");
        // driver 不帶參數：script 欄位就是完整的調用內容
        assert_eq!(script, "Code/Python/Simulations/PolicyFuncs.py");
        // 工作目錄固定在 repository root
        assert_eq!(workdir, &PathBuf::from("/repo/root"));
    }

    #[tokio::test]
    async fn test_stops_at_first_failing_step() {
        let toolchain = RecordingToolchain::failing_on("Code/Python/Simulations/FewAgents.py", 1);
        let runner = StageRunner::new(&toolchain, "paper-repro", "python", ".");

        let err = runner.run_steps(&three_steps()).await.unwrap_err();

        match err {
            ReproError::DriverFailure { step, code } => {
                assert_eq!(step, "few-agents");
                assert_eq!(code, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // 第三個 step 不能被執行
        assert_eq!(toolchain.invocations().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_step_list_is_noop() {
        let toolchain = RecordingToolchain::new();
        let runner = StageRunner::new(&toolchain, "paper-repro", "python", ".");

        let results = runner.run_steps(&[]).await.unwrap();
        assert!(results.is_empty());
        assert!(toolchain.invocations().is_empty());
    }
}
