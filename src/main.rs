use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use vpcplan::config_loader;
use vpcplan::orchestrator::{assemble_plan, write_plan, PlanFormat};
use vpcplan::plan::{apply_plan, DryRunBackend};

/// Topology planner for multi-tier VPC networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network definition YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output path for the generated plan
    #[arg(short, long, default_value = "vpc_plan.json")]
    output: PathBuf,

    /// Plan format (defaults to the output file extension, then JSON)
    #[arg(short, long, value_enum)]
    format: Option<PlanFormat>,

    /// Walk every intent through a dry-run backend after planning
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting vpcplan");
    info!("Network file: {:?}", args.config);
    info!("Output file: {:?}", args.output);

    let spec = config_loader::load_config(&args.config)?;

    let plan = assemble_plan(&spec)
        .wrap_err_with(|| format!("Failed to plan '{}'", spec.name))?;

    let format = args
        .format
        .or_else(|| PlanFormat::from_path(&args.output))
        .unwrap_or(PlanFormat::Json);
    write_plan(&plan, &args.output, format)?;

    if args.dry_run {
        let mut backend = DryRunBackend::new();
        let ensured = apply_plan(&plan, &mut backend).wrap_err("Dry run failed")?;
        info!("Dry run ensured {} resources", ensured.len());
    }

    info!("Planning completed successfully");
    Ok(())
}
