// Loop rate, serial ports, weave parameters, vision retry policy
use std::time::Duration;

// Control loop frequency (25 ms period)
pub const LOOP_HZ: u64 = 40;

// Startup banner printed once at boot
pub const MOTD: &str = "mds-runtime: two-wheel chassis control";

// Serial port for the wheel motor controller
pub const DRIVE_PORT: &str = "/dev/ttyACM0";

// Serial port for the HuskyLens vision module
pub const VISION_PORT: &str = "/dev/ttyUSB0";

// Vision module UART speed (HuskyLens serial-mode default)
pub const VISION_BAUDRATE: u32 = 9600;

// Weave test pattern: phase step per cycle and peak turn command
pub const WEAVE_PHASE_STEP: f64 = 0.01;
pub const WEAVE_AMPLITUDE: i16 = 255;

// Vision handshake retry policy (bounded, with a fixed pause between tries)
pub const VISION_CONNECT_ATTEMPTS: u32 = 5;
pub const VISION_RETRY_PAUSE: Duration = Duration::from_millis(500);

// Enable the vision polling path (off by default; the drive loop does not
// depend on the sensor)
pub const VISION_ENABLED: bool = false;

/// Per-run settings, overridable from the command line.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub drive_port: String,
    pub vision_port: String,
    pub vision_enabled: bool,
    pub loop_hz: u64,
    pub phase_step: f64,
    pub amplitude: i16,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            drive_port: DRIVE_PORT.to_string(),
            vision_port: VISION_PORT.to_string(),
            vision_enabled: VISION_ENABLED,
            loop_hz: LOOP_HZ,
            phase_step: WEAVE_PHASE_STEP,
            amplitude: WEAVE_AMPLITUDE,
        }
    }
}
