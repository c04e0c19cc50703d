use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "repro-kit")]
#[command(about = "Reproduction harness for the two-asset consumption-savings paper figures")]
pub struct CliConfig {
    /// Path to the TOML reproduction spec
    #[arg(short, long, default_value = "repro.toml")]
    pub spec: String,

    /// Reproduction tier to run (e.g. min, mid, all)
    #[arg(short, long, default_value = "min")]
    pub tier: String,

    /// Reuse an already-provisioned environment instead of creating it
    #[arg(long)]
    pub skip_provision: bool,

    /// Show the execution plan without provisioning or running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Environment tool binary (conda-compatible)
    #[arg(long, default_value = "conda")]
    pub toolchain: String,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
