use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::GuiBridge;
use physcore::counting::CountingParameters;
use physcore::format::fixed;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Inverse-square counting lab driver")]
struct Args {
    /// Run one measurement campaign at the configured distance and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Measure across the configured distance sweep
    #[arg(long, default_value_t = false)]
    sweep: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Source to detector distance r (m)
    #[arg(long, default_value_t = 0.4)]
    distance: f64,
    /// Inverse-square constant K (s^-1 m^2)
    #[arg(long, default_value_t = 2.0)]
    constant: f64,
    /// Background count rate (s^-1)
    #[arg(long, default_value_t = 6.0)]
    background: f64,
    /// Counting time T (s)
    #[arg(long, default_value_t = 10.0)]
    count_time: f64,
    #[arg(long, default_value_t = 20)]
    measurements: usize,
    #[arg(long)]
    seed: Option<u64>,
    /// Append the offline summary to this file
    #[arg(long, requires = "offline")]
    report: Option<PathBuf>,
    /// Keep the HTTP bridge alive for interactive sessions
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let parameters =
            CountingParameters::new(args.distance, args.constant, args.background, args.count_time);
        WorkflowConfig::from_args(parameters, args.measurements, args.seed)
    };
    workflow_config.validate()?;

    let runner = Runner::new(workflow_config.clone());

    if args.offline {
        let result = runner.execute()?;

        println!(
            "Offline run -> r {} m, C_net {} s^-1, C_gross {} s^-1",
            fixed(result.parameters.distance_m, 2),
            fixed(result.model.net_rate, 2),
            fixed(result.model.gross_rate, 2)
        );
        println!(
            "counts -> measurements {}, expected {}, mean {}, variance {}",
            result.counts.len(),
            fixed(result.expected_counts, 2),
            fixed(result.mean_counts, 2),
            fixed(result.variance_counts, 2)
        );
        for measurement in result.history.iter().take(5) {
            println!(
                "  r={}m N={} Cnet={}s^-1",
                fixed(measurement.distance_m, 2),
                measurement.counts,
                fixed(measurement.net_rate, 2)
            );
        }
        for line in runner.evaluate_models()?.lines() {
            println!("{}", line);
        }

        if let Some(report_path) = args.report {
            let report = format!(
                "r={} K={} bg={} T={} measurements={} expected={:.3} mean={:.3} variance={:.3} exact_draws={} gaussian_draws={}\n",
                result.parameters.distance_m,
                result.parameters.constant,
                result.parameters.background_rate,
                result.parameters.count_time_s,
                result.counts.len(),
                result.expected_counts,
                result.mean_counts,
                result.variance_counts,
                result.metrics.exact_draws,
                result.metrics.gaussian_draws
            );
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating report dir {}", parent.display()))?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&report_path)
                .with_context(|| format!("opening report {}", report_path.display()))?;
            file.write_all(report.as_bytes())?;
        }
    }
    if args.sweep {
        for point in runner.sweep()? {
            println!(
                "r={}m theory={}s^-1 measured={}s^-1 ({} measurements)",
                fixed(point.distance_m, 2),
                fixed(point.theoretical_net_rate, 2),
                fixed(point.mean_net_rate, 2),
                point.measurements
            );
        }
    }
    if args.serve {
        let session = Arc::new(RwLock::new(runner.open_session()?));
        let gui_bridge = GuiBridge::new(session);
        gui_bridge.serve(workflow_config.curve);
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
