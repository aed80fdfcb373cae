//! CLI entrypoint for Paper Triage
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use triage_application::{RunRankingInput, RunRankingUseCase};
use triage_infrastructure::{ConfigLoader, HttpOracleSettings, HttpScoringOracle, load_candidates};
use triage_presentation::{
    Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress, disable_colors,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Input file is required for everything but --show-config
    let input_path = match &cli.input {
        Some(path) => path,
        None => bail!("Input file is required. Use --show-config to inspect configuration."),
    };

    info!("Starting Paper Triage");

    // Load and validate configuration
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    file_config.validate().context("invalid configuration")?;

    if !file_config.output.color {
        disable_colors();
    }

    // CLI flags override the config file
    let mut pipeline = file_config.pipeline_config();
    if let Some(batch_size) = cli.batch_size {
        pipeline = pipeline.with_batch_size(batch_size);
    }
    if let Some(top_n) = cli.top_n {
        pipeline = pipeline.with_top_n(top_n);
    }
    if let Some(max_retries) = cli.max_retries {
        pipeline = pipeline.with_max_retries(max_retries);
    }
    if let Some(seed) = cli.seed {
        pipeline = pipeline.with_seed(seed);
    }

    let format = cli
        .output
        .or_else(|| {
            file_config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config_name)
        })
        .unwrap_or(OutputFormat::Full);

    // Load candidates
    let pool = load_candidates(input_path)?;

    // Print header
    if !cli.quiet {
        println!();
        println!("+============================================================+");
        println!("|              Paper Triage - Two-Stage Ranking              |");
        println!("+============================================================+");
        println!();
        println!("Papers: {}", pool.len());
        println!(
            "Oracle: {} @ {}",
            file_config.oracle.model, file_config.oracle.endpoint
        );
        println!();
    }

    // === Dependency Injection ===
    // Create the infrastructure adapter (HTTP oracle)
    let settings = HttpOracleSettings::from(&file_config.oracle);
    if settings.api_key.is_none() {
        warn!(
            var = %file_config.oracle.api_key_env,
            "no API key in environment, sending unauthenticated requests"
        );
    }
    let oracle = Arc::new(HttpScoringOracle::new(settings)?);

    // Cancellation: Ctrl-C always, deadline when requested
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling run");
            ctrl_c_token.cancel();
        }
    });
    if let Some(secs) = cli.deadline_secs {
        let deadline_token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            warn!("deadline reached, cancelling run");
            deadline_token.cancel();
        });
    }

    // Build input
    let input = RunRankingInput::new(pool.clone())
        .with_config(pipeline)
        .with_cancellation(token);

    // Create use case with the injected oracle
    let use_case = RunRankingUseCase::new(oracle);

    // Execute with or without progress reporting
    let report = if cli.quiet {
        use_case.execute(input).await?
    } else if cli.verbose > 0 {
        // Log lines and progress bars fight over the terminal
        use_case.execute_with_progress(input, &SimpleProgress).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    // Output results
    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&report, &pool),
        OutputFormat::Ranking => ConsoleFormatter::format_ranking(&report, &pool),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };

    println!("{}", output);

    if let Some(path) = &cli.save {
        std::fs::write(path, ConsoleFormatter::format_json(&report))
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        if !cli.quiet {
            println!("Report saved to {}", path.display());
        }
    }

    Ok(())
}
