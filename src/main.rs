use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use kira_ckdrisk::artifacts::{Artifacts, load_artifacts};
use kira_ckdrisk::cli::{Cli, Commands, EgfrArgs, PredictArgs, ValidateArgs};
use kira_ckdrisk::clinical::egfr::EGFR_UNIT;
use kira_ckdrisk::clinical::{CkdStage, calculate_egfr};
use kira_ckdrisk::ctx::Ctx;
use kira_ckdrisk::error::{ErrorKind, classify};
use kira_ckdrisk::io;
use kira_ckdrisk::pipeline::Pipeline;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Predict(args) => run_predict(args),
        Commands::Egfr(args) => run_egfr(args),
        Commands::Validate(args) => run_validate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

fn report_error(err: &anyhow::Error) -> ExitCode {
    match classify(err) {
        Some(ErrorKind::Validation) => {
            warn!(kind = "validation", "request rejected");
            eprintln!("error: {:#}", err);
            eprintln!("please correct the input and try again");
            ExitCode::from(ErrorKind::Validation.exit_code())
        }
        Some(kind) => {
            error!(kind = kind.as_str(), "request failed");
            eprintln!("error: {:#}", err);
            ExitCode::from(kind.exit_code())
        }
        None => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_predict(args: PredictArgs) -> Result<()> {
    // Artifacts load before the observation is even looked at.
    let artifacts = Arc::new(load_artifacts(&args.artifacts)?);

    let (observation, warnings) = match &args.input {
        Some(path) => io::observation::read_observation(path)?,
        None => (args.observation.to_observation(), Vec::new()),
    };

    let mut ctx = Ctx::new(
        artifacts,
        observation,
        args.out.clone(),
        args.json,
        args.tsv,
        env!("CARGO_PKG_VERSION"),
    );
    ctx.warnings.extend(warnings);

    Pipeline::full().run(&mut ctx)?;
    print_summary(&ctx)
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    let warnings = ctx.all_warnings();
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in &warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn run_egfr(args: EgfrArgs) -> Result<()> {
    let egfr = calculate_egfr(args.creatinine, args.age, args.sex.into())?;
    let stage = CkdStage::from_egfr(egfr);
    println!("eGFR: {:.2} {}", egfr, EGFR_UNIT);
    println!("Stage: {}", stage.describe());
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let artifacts = load_artifacts(&args.artifacts)?;
    print_validate_summary(&artifacts);
    Ok(())
}

fn print_validate_summary(artifacts: &Artifacts) {
    println!("kira-ckdrisk validate ok");
    println!("features: {}", artifacts.scaler.n_features());
    println!("feature order: {}", artifacts.feature_order().join(", "));
    println!("selected: {}", artifacts.selector.n_features_out());
    println!(
        "selected features: {}",
        artifacts.selected_feature_names.join(", ")
    );
    for fp in &artifacts.fingerprints {
        println!("{}\t{}\t{}\t{}", fp.name, fp.crc64, fp.bytes, fp.path);
    }
    if !artifacts.warnings.is_empty() {
        println!("warnings:");
        for warning in &artifacts.warnings {
            println!("- {}", warning);
        }
    }
}
