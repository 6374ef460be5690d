// Vision diagnostic: READ-ONLY check of the vision module link
//
// Knocks on the module, then streams a few seconds of detections as JSON
// lines. Nothing is written to the chassis - it's completely safe.
//
// Usage: cargo run --example vision_diagnostic -- [port]
// Example: cargo run --example vision_diagnostic -- /dev/ttyUSB0

use std::thread::sleep;
use std::time::Duration;

use mds_runtime::config::{VISION_CONNECT_ATTEMPTS, VISION_PORT, VISION_RETRY_PAUSE};
use mds_runtime::console;
use mds_runtime::vision::{PollReport, VisionSensor, VisionSource};

const POLL_CYCLES: u32 = 120;
const POLL_PERIOD: Duration = Duration::from_millis(25);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("debug".parse().unwrap()),
        )
        .init();

    // Get port from args or use default
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| VISION_PORT.to_string());

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║           Vision Module Diagnostic (READ-ONLY)               ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  This tool only talks to the camera - no chassis movement    ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Serial port: {}", port);
    println!();

    // Open the serial link
    println!("Step 1: Opening serial port...");
    let mut sensor = match VisionSensor::open(&port) {
        Ok(sensor) => {
            println!("  ✓ Serial port opened successfully");
            sensor
        }
        Err(e) => {
            println!("  {}", console::bus_error(&e.to_string()));
            println!();
            println!("Troubleshooting:");
            println!("  - Check the port path is correct");
            println!("  - Verify the module is powered and in serial (UART) mode");
            println!("  - Confirm the module's protocol speed is 9600 baud");
            return Err(e.into());
        }
    };
    println!();

    // Knock handshake
    println!("Step 2: Knocking on the module...");
    match sensor.connect(VISION_CONNECT_ATTEMPTS, VISION_RETRY_PAUSE) {
        Ok(()) => println!("  ✓ Module answered"),
        Err(e) => {
            println!("  {}", console::bus_error(&e.to_string()));
            println!();
            println!("  - Check TX/RX are not swapped");
            println!("  - Check the module's output protocol setting");
            return Err(e.into());
        }
    }
    println!();

    // Stream detections
    println!(
        "Step 3: Polling for {} cycles ({} ms period), JSON lines below...",
        POLL_CYCLES,
        POLL_PERIOD.as_millis()
    );
    println!();

    let mut detections_seen = 0u32;
    let mut empty_cycles = 0u32;
    for _ in 0..POLL_CYCLES {
        match sensor.poll() {
            PollReport::LinkDown => {
                println!("  {}", console::bus_error("module stopped answering"));
                break;
            }
            PollReport::NothingLearned => {
                println!("  (nothing learned - press the learn button on the module)");
            }
            PollReport::NoDetections => empty_cycles += 1,
            PollReport::Detections(detections) => {
                for detection in &detections {
                    println!("{}", serde_json::to_string(detection)?);
                }
                detections_seen += detections.len() as u32;
            }
        }
        sleep(POLL_PERIOD);
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Diagnostic Complete                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "Detections: {}, empty cycles: {}",
        detections_seen, empty_cycles
    );
    println!();
    println!("If the module answered but every cycle was empty:");
    println!("  1. Teach it a target (learn button) and re-run");
    println!("  2. Point the camera at the learned object");
    println!();
    println!("Next step: run the chassis with '--vision' to poll it in the loop");

    Ok(())
}
