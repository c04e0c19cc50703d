use clap::Parser;
use repro_kit::config::toml_config::ReproConfig;
use repro_kit::domain::ports::ConfigProvider;
use repro_kit::utils::{logger, validation::Validate};
use repro_kit::{CliConfig, CondaToolchain, ReproEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting reproduction harness");
    tracing::info!("📁 Loading spec from: {}", args.spec);

    // 載入 TOML spec
    let config = match ReproConfig::from_file(&args.spec) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load spec file '{}': {}", args.spec, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證 spec
    if let Err(e) = config.validate() {
        tracing::error!("❌ Spec validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Spec loaded and validated successfully");

    display_run_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - Nothing will be provisioned or executed");
        perform_dry_run(&config, &args);
        return Ok(());
    }

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立 toolchain 與 engine 並執行
    let toolchain = CondaToolchain::with_binary(&args.toolchain);
    let engine = ReproEngine::new_with_monitoring(toolchain, config, args.monitor)
        .with_skip_provision(args.skip_provision);

    match engine.run(&args.tier).await {
        Ok(summary) => {
            tracing::info!("✅ Reproduction run completed successfully!");
            println!("✅ Reproduction run completed successfully!");
            println!(
                "🏁 {} step(s) in {:?} (tier: {})",
                summary.stages.len(),
                summary.total_duration,
                summary.tier
            );
            for stage in &summary.stages {
                println!("   {} - {:?}", stage.step_name, stage.duration);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Reproduction run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // driver 的 exit code 原樣傳遞；其餘依嚴重程度
            let exit_code = match &e {
                repro_kit::ReproError::DriverFailure { code, .. } if *code > 0 => *code,
                other => match other.severity() {
                    repro_kit::utils::error::ErrorSeverity::Low => 1,
                    repro_kit::utils::error::ErrorSeverity::Medium => 2,
                    repro_kit::utils::error::ErrorSeverity::High => 1,
                    repro_kit::utils::error::ErrorSeverity::Critical => 3,
                },
            };

            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_run_summary(config: &ReproConfig, args: &CliConfig) {
    println!("📋 Run Summary:");
    println!(
        "  Project: {} v{}",
        config.project.name, config.project.version
    );
    println!("  Environment: {}", config.env_name());
    println!("  Tier: {}", args.tier);
    println!("  Toolchain: {}", args.toolchain);
    println!("  Interpreter: {}", config.interpreter());

    if args.skip_provision {
        println!("  ⏭️  Provisioning will be skipped");
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &ReproConfig, args: &CliConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🔧 Environment:");
    println!("  Name: {}", config.env_name());
    if !config.channels().is_empty() {
        println!("  Channels: {}", config.channels().join(", "));
    }
    println!("  Packages ({}):", config.packages().len());
    for package in config.packages() {
        println!("    {}", package);
    }

    println!();
    println!("📦 Available tiers: {}", config.tier_names().join(", "));

    match config.steps(&args.tier) {
        Some(steps) => {
            println!();
            println!("▶️  Tier '{}' would run {} step(s):", args.tier, steps.len());
            for (index, step) in steps.iter().enumerate() {
                println!("  {}. {} -> {}", index + 1, step.name, step.script);
            }
        }
        None => {
            println!();
            println!("⚠️  Tier '{}' is not declared in the spec", args.tier);
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Rerun without --dry-run to execute.");
}
