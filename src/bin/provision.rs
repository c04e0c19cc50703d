use anyhow::Context;
use clap::Parser;
use repro_kit::config::toml_config::ReproConfig;
use repro_kit::domain::model::EnvironmentSpec;
use repro_kit::domain::ports::ConfigProvider;
use repro_kit::utils::{logger, validation::Validate};
use repro_kit::{CondaToolchain, Provisioner};

/// 只執行 Environment Provisioner，不跑 pipeline。
/// 之後可用 `repro-kit --skip-provision` 重複使用建立好的環境
#[derive(Parser)]
#[command(name = "provision")]
#[command(about = "Provision the reproduction environment without running any tier")]
struct Args {
    /// Path to the TOML reproduction spec
    #[arg(short, long, default_value = "repro.toml")]
    spec: String,

    /// Environment tool binary (conda-compatible)
    #[arg(long, default_value = "conda")]
    toolchain: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let config = ReproConfig::from_file(&args.spec)
        .with_context(|| format!("Failed to load spec file '{}'", args.spec))?;

    config
        .validate()
        .context("Spec validation failed")?;

    let spec = EnvironmentSpec::from_raw(config.env_name(), config.channels(), config.packages())
        .context("Invalid environment specification")?;

    let toolchain = CondaToolchain::with_binary(&args.toolchain);
    let provisioner = Provisioner::new(&toolchain);

    match provisioner.provision(&spec).await {
        Ok(()) => {
            println!("✅ Environment '{}' provisioned", spec.name);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    }
}
