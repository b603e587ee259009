use anyhow::{Context, Result};
use chrono::Local;
use hoop2stats::cli::Args;
use hoop2stats::config::{self, RunSeeds};
use hoop2stats::frame_source::{FrameSource, RecordedFrameSource, SimulatedFrameSource};
use hoop2stats::progress::{AnalysisProgressTracker, ProgressSink};
use hoop2stats::report::{self, AnalysisReport};
use hoop2stats::session::{self, CancelToken};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Creates a timestamped output directory and returns its path
fn create_output_dir() -> Result<String> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let output_dir = format!("./runs/{}", timestamp);
    fs::create_dir_all(&output_dir)?;
    Ok(output_dir)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hoop2stats=info")),
        )
        .init();

    let args: Args = argh::from_env();
    let config = config::build_config(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let seeds = RunSeeds::derive(seed);

    let (mut source, source_name): (Box<dyn FrameSource>, String) = match &args.observations {
        Some(path) => (
            Box::new(RecordedFrameSource::load(Path::new(path))?),
            path.clone(),
        ),
        None => {
            info!("No observations given, simulating {:.0}s of video (seed {})", args.duration, seed);
            let simulated = SimulatedFrameSource::new(args.duration, seeds.source)
                .with_accelerator(!args.simulate_gpu_failure);
            (Box::new(simulated), "simulated".to_string())
        }
    };

    let total_samples = config.total_samples(source.duration_secs());
    let mut progress: Box<dyn ProgressSink> = if args.headless {
        Box::new(|_: f64| {})
    } else {
        Box::new(AnalysisProgressTracker::new(
            total_samples,
            config.sample_rate_hz,
            &source_name,
        ))
    };

    let cancel = CancelToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping analysis");
            ctrl_c.cancel();
        }
    });

    let outcome = session::analyze(
        source.as_mut(),
        progress.as_mut(),
        &config,
        StdRng::seed_from_u64(seeds.session),
        &cancel,
    )
    .await
    .context("analysis failed")?;

    println!("{}", report::render_summary(&outcome, args.recent));

    let output_dir = create_output_dir()?;
    info!("Created output directory: {}", output_dir);

    let results_path = format!("{}/results.json", output_dir);
    AnalysisReport::new(&source_name, config.sample_rate_hz, outcome)
        .write_json(Path::new(&results_path))?;
    println!("Results saved to: {}", results_path);

    // Move results to output_filepath if specified
    if !args.output_filepath.is_empty() {
        println!("Moving results to: {}", args.output_filepath);
        fs::rename(&results_path, &args.output_filepath)
            .with_context(|| format!("failed to move results to {}", args.output_filepath))?;
        println!("Results moved successfully to: {}", args.output_filepath);
    }

    Ok(())
}
