// Chassis control for the two-wheel base
//
// Provides:
// - Differential mixing (chassis vector -> wheel velocities)
// - Serial motor bus protocol
// - High-level drivetrain API and the actuator seam for the control loop

pub mod bus;
mod drivetrain;
pub mod kinematics;

pub use bus::{BusError, MotorBus};
pub use drivetrain::{
    ChassisActuator, Drivetrain, MOTOR_ID_PORT, MOTOR_ID_STAR, WHEEL_MOTOR_IDS,
};
pub use kinematics::{chassis_to_wheel_raw, WheelVelocities};
