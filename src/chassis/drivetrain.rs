// Two-motor drivetrain
//
// Combines the differential mix and the motor bus protocol into the one
// operation the control loop needs: set the chassis vector.

use tracing::{debug, info, warn};

use super::bus::{BusError, MotorBus, OperatingMode, Register};
use super::kinematics::{chassis_to_wheel_raw, WheelVelocities};
use crate::messages::ChassisCommand;

/// Bus ids of the wheel motors (as configured in the servos)
pub const MOTOR_ID_STAR: u8 = 1;
pub const MOTOR_ID_PORT: u8 = 2;

pub const WHEEL_MOTOR_IDS: [u8; 2] = [MOTOR_ID_STAR, MOTOR_ID_PORT];

/// The write-only seam the control loop drives the chassis through.
/// Production uses [`Drivetrain`]; tests use a recording double.
pub trait ChassisActuator {
    fn set_chassis_vector(&mut self, cmd: ChassisCommand) -> Result<(), BusError>;

    fn stop(&mut self) -> Result<(), BusError> {
        self.set_chassis_vector(ChassisCommand::zero())
    }
}

/// Drivetrain for the starboard/port wheel pair
pub struct Drivetrain {
    bus: MotorBus,
    motor_ids: [u8; 2], // [star, port]
}

impl Drivetrain {
    pub fn open(port: &str) -> Result<Self, BusError> {
        Self::with_motor_ids(port, WHEEL_MOTOR_IDS)
    }

    pub fn with_motor_ids(port: &str, motor_ids: [u8; 2]) -> Result<Self, BusError> {
        info!("Opening motor bus on {}", port);
        let bus = MotorBus::open(port)?;
        Ok(Self { bus, motor_ids })
    }

    /// Prepare both motors for velocity commands: verify they answer, then
    /// torque off, switch to velocity mode, torque back on.
    pub fn initialize(&mut self) -> Result<(), BusError> {
        info!("Initializing wheel motors {:?}", self.motor_ids);

        for &id in &self.motor_ids {
            match self.bus.ping(id) {
                Ok(true) => debug!("motor {} responding", id),
                Ok(false) => {
                    warn!("motor {} not responding to ping", id);
                    return Err(BusError::Timeout { id });
                }
                Err(e) => return Err(e),
            }
        }

        for &id in &self.motor_ids {
            self.bus.disable_torque(id)?;
        }
        for &id in &self.motor_ids {
            self.bus.set_operating_mode(id, OperatingMode::Velocity)?;
        }
        for &id in &self.motor_ids {
            self.bus.enable_torque(id)?;
        }

        info!("Drivetrain ready");
        Ok(())
    }

    fn set_wheel_velocities(&mut self, velocities: WheelVelocities) -> Result<(), BusError> {
        debug!(
            "wheel velocities: star={}, port={}",
            velocities.star, velocities.port
        );

        let data = [
            (self.motor_ids[0], velocities.star),
            (self.motor_ids[1], velocities.port),
        ];
        self.bus.sync_write_i16(Register::GoalVelocity, &data)
    }

    /// Release both motors so the chassis can be pushed by hand
    pub fn disable_torque(&mut self) -> Result<(), BusError> {
        info!("Disabling torque on wheel motors");
        for &id in &self.motor_ids {
            self.bus.disable_torque(id)?;
        }
        Ok(())
    }

    /// Read back the present wheel velocities
    pub fn wheel_velocities(&mut self) -> Result<WheelVelocities, BusError> {
        let star = self.bus.get_velocity(self.motor_ids[0])?;
        let port = self.bus.get_velocity(self.motor_ids[1])?;
        Ok(WheelVelocities::new(star, port))
    }

    pub fn ping(&mut self, id: u8) -> Result<bool, BusError> {
        self.bus.ping(id)
    }

    pub fn motor_ids(&self) -> [u8; 2] {
        self.motor_ids
    }
}

impl ChassisActuator for Drivetrain {
    fn set_chassis_vector(&mut self, cmd: ChassisCommand) -> Result<(), BusError> {
        self.set_wheel_velocities(chassis_to_wheel_raw(cmd))
    }
}

impl Drop for Drivetrain {
    fn drop(&mut self) {
        // Leave the wheels stopped if the runtime unwinds
        if let Err(e) = self.stop() {
            warn!("Failed to stop wheels on drop: {}", e);
        }
    }
}
