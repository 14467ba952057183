use anyhow::Context;
use clap::Parser;
use generator::sample::build_sample_set;
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::MapModel;
use linergycore::data_interface::FaultRecord;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::DriverConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Linergy report driver and data bridge")]
struct Args {
    /// Render text and PDF reports for the loaded fault set and exit
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load driver settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Load fault records from a YAML file instead of synthesizing them
    #[arg(long)]
    faults: Option<PathBuf>,
    #[arg(long, default_value = "tools/data/reports")]
    out_dir: PathBuf,
    #[arg(long, default_value_t = 12)]
    count: usize,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Keep the data bridge alive for the visualizer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let driver_config = if let Some(path) = args.config {
        DriverConfig::load(path)?
    } else {
        DriverConfig::from_args(args.out_dir, args.count, args.seed)
    };

    let mut sample = build_sample_set(&driver_config.to_sample_config())?;
    if let Some(path) = args.faults {
        sample.faults = load_fault_file(&path)?;
    }

    let runner = Runner::new(driver_config.clone());
    let gui_bridge = GuiBridge::new(Arc::new(runner.clone()));
    let model = MapModel {
        faults: sample.faults.clone(),
        structures: sample.structures.clone(),
        lines: sample.lines.clone(),
    };
    gui_bridge.publish(&model)?;

    if args.offline {
        let summary = runner.render_all(&sample.faults, &sample.lines)?;
        let metrics = runner.metrics();

        println!(
            "Offline run -> reports {}, degraded {}, files {}",
            summary.written,
            summary.degraded,
            summary.files.len()
        );
        gui_bridge.publish_status("Offline report batch ready.");

        let log_line = format!(
            "reports={} degraded={} errors={} files={}\n",
            summary.written,
            summary.degraded,
            metrics.errors,
            summary.files.len()
        );
        let log_path = driver_config.out_dir.join("render.log");
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        file.write_all(log_line.as_bytes())?;
    }
    if args.serve {
        gui_bridge.publish_status("Data bridge running (Ctrl+C to stop)...");
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

fn load_fault_file(path: &PathBuf) -> anyhow::Result<Vec<FaultRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading fault file {}", path.display()))?;
    let faults: Vec<FaultRecord> = serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing fault file {}", path.display()))?;
    Ok(faults)
}
