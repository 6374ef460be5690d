// Keyboard teleop: W/S forward-back, A/D turn, R/F speed, Q quit
//
// Writes chassis vectors straight to the drivetrain. Wheels on the ground
// this time - that's the point - so start at the LOW speed step.
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

use mds_runtime::chassis::{ChassisActuator, Drivetrain};
use mds_runtime::config::DRIVE_PORT;
use mds_runtime::messages::ChassisCommand;

const FORWARD_SPEEDS: [i16; 3] = [40, 120, 255];
const TURN_SPEEDS: [i16; 3] = [40, 100, 200];
const INPUT_TIMEOUT_MS: u64 = 100; // Zero the vector after this much time with no input
const SEND_PERIOD: Duration = Duration::from_millis(20); // ~50Hz effective rate

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DRIVE_PORT.to_string());

    info!("Opening drivetrain on {}...", port);
    let mut drivetrain = Drivetrain::open(&port)?;
    drivetrain.initialize()?;

    info!("Controls: W/S=forward-back, A/D=turn, R/F=speed, Q=quit");
    info!("Speed: LOW");

    enable_raw_mode()?;
    let result = run_teleop(&mut drivetrain);
    disable_raw_mode()?;

    // Always leave the chassis stopped
    drivetrain.stop()?;
    result
}

fn run_teleop(drivetrain: &mut Drivetrain) -> Result<(), Box<dyn std::error::Error>> {
    let mut speed_idx: usize = 0;

    // Persistent vector state
    let mut forward: i16 = 0;
    let mut turn: i16 = 0;
    let mut last_movement_input = Instant::now();

    loop {
        if event::poll(SEND_PERIOD)? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    // Movement - update the vector and refresh the timestamp
                    KeyCode::Char('w') if pressed => {
                        forward = FORWARD_SPEEDS[speed_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        forward = -FORWARD_SPEEDS[speed_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        turn = -TURN_SPEEDS[speed_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        turn = TURN_SPEEDS[speed_idx];
                        last_movement_input = Instant::now();
                    }

                    // Speed control
                    KeyCode::Char('r') if pressed => {
                        speed_idx = (speed_idx + 1).min(2);
                        print_speed(speed_idx);
                    }
                    KeyCode::Char('f') if pressed => {
                        speed_idx = speed_idx.saturating_sub(1);
                        print_speed(speed_idx);
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        // Zero the vector if no movement input for INPUT_TIMEOUT_MS
        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            forward = 0;
            turn = 0;
        }

        drivetrain.set_chassis_vector(ChassisCommand::new(turn, forward))?;
    }

    Ok(())
}

fn print_speed(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Speed: {}", label);
}
