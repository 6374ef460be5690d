// Fixed-rate control loop
//
// One interval tick per cycle: advance the weave pattern, push the chassis
// vector, then (when enabled) poll the vision module. The interval runs on
// the monotonic clock, so a slow vision poll delays but never accumulates
// into drift the way a fixed sleep would.
//
// The drive write is the only call that can abort the loop; the vision
// side only degrades health.

use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::chassis::{BusError, ChassisActuator, Drivetrain};
use crate::config::{MOTD, RuntimeConfig, VISION_CONNECT_ATTEMPTS, VISION_RETRY_PAUSE};
use crate::messages::{ChassisCommand, RuntimeHealth};
use crate::pattern::SineWeave;
use crate::vision::{Detection, PollReport, VisionError, VisionSensor, VisionSource};

pub struct Runtime {
    pattern: SineWeave,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new(pattern: SineWeave) -> Self {
        Self {
            pattern,
            health: RuntimeHealth::Ok,
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    /// Advance the pattern one cycle and hand the command to the chassis
    pub fn tick_drive(
        &mut self,
        chassis: &mut impl ChassisActuator,
    ) -> Result<ChassisCommand, BusError> {
        let cmd = self.pattern.next_command();
        chassis.set_chassis_vector(cmd)?;
        Ok(cmd)
    }

    /// Run one vision polling cycle and log the outcome. Health flips on
    /// link state changes only, so a dead module warns once, not at 40 Hz.
    pub fn tick_vision(&mut self, vision: &mut impl VisionSource) -> PollReport {
        let report = vision.poll();

        match &report {
            PollReport::LinkDown => {
                if self.health != RuntimeHealth::VisionDown {
                    warn!("Failed to request data from the vision module, recheck the connection");
                }
                self.health = RuntimeHealth::VisionDown;
                return report;
            }
            PollReport::NothingLearned => {
                warn!("Nothing learned, press the learn button on the module to teach it a target");
            }
            PollReport::NoDetections => {
                info!("No block or arrow in view");
            }
            PollReport::Detections(detections) => {
                for detection in detections {
                    log_detection(detection);
                }
            }
        }

        if self.health == RuntimeHealth::VisionDown {
            info!("Vision link recovered");
        }
        self.health = RuntimeHealth::Ok;
        report
    }
}

fn log_detection(detection: &Detection) {
    match detection {
        Detection::Block {
            x_center,
            y_center,
            width,
            height,
            id,
        } => info!(
            "Block: x_center={}, y_center={}, width={}, height={}, id={}",
            x_center, y_center, width, height, id
        ),
        Detection::Arrow {
            x_origin,
            y_origin,
            x_target,
            y_target,
            id,
        } => info!(
            "Arrow: x_origin={}, y_origin={}, x_target={}, y_target={}, id={}",
            x_origin, y_origin, x_target, y_target, id
        ),
    }
}

fn connect_vision(port: &str) -> Result<VisionSensor, VisionError> {
    let mut sensor = VisionSensor::open(port)?;
    sensor.connect(VISION_CONNECT_ATTEMPTS, VISION_RETRY_PAUSE)?;
    Ok(sensor)
}

pub async fn run(config: RuntimeConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("{}", MOTD);

    info!("Opening drivetrain on {}", config.drive_port);
    let mut drivetrain = Drivetrain::open(&config.drive_port)?;
    drivetrain.initialize()?;

    let mut runtime = Runtime::new(SineWeave::new(config.phase_step, config.amplitude));

    // The drive loop does not depend on the sensor: a failed handshake
    // degrades the run instead of aborting it.
    let mut vision = if config.vision_enabled {
        match connect_vision(&config.vision_port) {
            Ok(sensor) => Some(sensor),
            Err(e) => {
                warn!("Vision module unavailable, driving without it: {}", e);
                runtime.health = RuntimeHealth::VisionDown;
                None
            }
        }
    } else {
        None
    };

    let mut tick = interval(Duration::from_millis(1000 / config.loop_hz));

    info!(
        "Runtime started: {} Hz loop, weave amplitude {}, vision {}",
        config.loop_hz,
        config.amplitude,
        if config.vision_enabled { "on" } else { "off" }
    );

    loop {
        tick.tick().await;

        let cmd = runtime.tick_drive(&mut drivetrain)?;
        debug!("chassis vector: turn={}, forward={}", cmd.turn, cmd.forward);

        if let Some(sensor) = vision.as_mut() {
            runtime.tick_vision(sensor);
        }
    }
}
