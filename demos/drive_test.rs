// Drive test: careful, step-by-step test for the chassis
//
// IMPORTANT: This tool WILL spin the wheels.
//
// Usage: cargo run --example drive_test -- [port]
// Example: cargo run --example drive_test -- /dev/ttyACM0
//
// Safety features:
// - Explicit confirmation before any writes
// - Starts with a zero vector
// - Very slow test speeds
// - Easy abort with Ctrl+C

use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

use mds_runtime::chassis::{ChassisActuator, Drivetrain, WHEEL_MOTOR_IDS};
use mds_runtime::config::DRIVE_PORT;
use mds_runtime::console;
use mds_runtime::messages::ChassisCommand;

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().eq_ignore_ascii_case("y")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    // Get port from args or use default
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DRIVE_PORT.to_string());

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Chassis Drive Test (WITH WRITES)               ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  ⚠  This tool WILL write to motors and cause movement!       ║");
    println!("║  ⚠  Make sure wheels are OFF THE GROUND before proceeding!   ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Serial port: {}", port);
    println!("Expected motor ids: {:?}", WHEEL_MOTOR_IDS);
    println!();

    if !confirm("Are the robot's wheels OFF THE GROUND (robot elevated/on blocks)?") {
        println!("Please elevate the robot so the wheels can spin freely.");
        return Ok(());
    }

    println!();
    println!("Opening serial port...");
    let mut drivetrain = match Drivetrain::open(&port) {
        Ok(d) => d,
        Err(e) => {
            println!("{}", console::bus_error(&e.to_string()));
            return Err(e.into());
        }
    };
    println!("✓ Connected");
    println!();

    // ========== STEP 1: Configure for velocity control ==========
    println!("Step 1: Initializing drivetrain...");
    println!("  This will: ping both motors → disable torque → set velocity mode → enable torque");
    println!();

    if !confirm("Proceed with motor configuration?") {
        println!("Aborted.");
        return Ok(());
    }

    if let Err(e) = drivetrain.initialize() {
        println!("{}", console::bus_error(&e.to_string()));
        return Err(e.into());
    }
    println!("  ✓ Drivetrain ready");
    println!();

    // ========== STEP 2: Zero vector ==========
    println!("Step 2: Sending a ZERO chassis vector...");
    println!("  This should NOT cause any movement.");
    println!();

    if !confirm("Send zero vector?") {
        cleanup(&mut drivetrain);
        return Ok(());
    }

    drivetrain.set_chassis_vector(ChassisCommand::zero())?;
    println!("  ✓ Zero vector sent");
    sleep(Duration::from_millis(500));

    println!("  Reading back wheel velocities...");
    let vel = drivetrain.wheel_velocities()?;
    println!("    star={} port={} (should be ~0)", vel.star, vel.port);
    println!();

    // ========== STEP 3: Very slow motion test ==========
    println!("Step 3: Very slow motion test");
    println!("  Turn/forward commands at ~10% of full scale");
    println!("  Duration: 0.3 seconds per direction");
    println!();
    println!("  ⚠  WATCH THE WHEELS - they should spin slowly!");
    println!("  ⚠  Press Ctrl+C at any time to abort!");
    println!();

    if !confirm("Proceed with motion test?") {
        cleanup(&mut drivetrain);
        return Ok(());
    }

    let test_duration = Duration::from_millis(300);
    let pause_duration = Duration::from_millis(500);

    let tests = [
        ("Turn to starboard", ChassisCommand::new(25, 0)),
        ("Turn to port", ChassisCommand::new(-25, 0)),
        ("Forward", ChassisCommand::new(0, 25)),
        ("Backward", ChassisCommand::new(0, -25)),
    ];

    for (name, cmd) in tests {
        println!("  Testing: {} (turn={}, forward={})...", name, cmd.turn, cmd.forward);

        drivetrain.set_chassis_vector(cmd)?;
        sleep(test_duration);

        // Stop between tests
        drivetrain.stop()?;
        sleep(pause_duration);
    }

    // ========== FINAL: Stop and cleanup ==========
    println!();
    println!("Step 4: Stopping motors...");
    cleanup(&mut drivetrain);
    println!("  ✓ Motors stopped");

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Test Complete!                            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("If the wheels moved as expected, the drive chain is working.");
    println!("You can now run the weave pattern with: cargo run");

    Ok(())
}

fn cleanup(drivetrain: &mut Drivetrain) {
    // Zero the wheels, then release torque; ignore errors on the way out
    let _ = drivetrain.stop();
    let _ = drivetrain.disable_torque();
}
