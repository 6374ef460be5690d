use clap::Parser;
use tracing_subscriber::EnvFilter;

use mds_runtime::config::{self, RuntimeConfig};

/// Control runtime for the two-wheel chassis
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Serial port of the wheel motor controller
    #[arg(long, default_value = config::DRIVE_PORT)]
    drive_port: String,

    /// Serial port of the vision module
    #[arg(long, default_value = config::VISION_PORT)]
    vision_port: String,

    /// Poll the vision module every cycle
    #[arg(long)]
    vision: bool,

    /// Control loop frequency in Hz
    #[arg(long, default_value_t = config::LOOP_HZ)]
    loop_hz: u64,

    /// Weave pattern phase step per cycle
    #[arg(long, default_value_t = config::WEAVE_PHASE_STEP)]
    phase_step: f64,

    /// Weave pattern peak turn command
    #[arg(long, default_value_t = config::WEAVE_AMPLITUDE)]
    amplitude: i16,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();
    let config = RuntimeConfig {
        drive_port: args.drive_port,
        vision_port: args.vision_port,
        vision_enabled: args.vision,
        loop_hz: args.loop_hz,
        phase_step: args.phase_step,
        amplitude: args.amplitude,
    };

    if let Err(e) = mds_runtime::runtime::run(config).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
