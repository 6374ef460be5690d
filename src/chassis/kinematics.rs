// Differential mixing for the two-wheel chassis
// Converts a chassis vector (turn, forward) into individual wheel commands.

use crate::messages::ChassisCommand;

/// Chassis command full scale: both components live in [-255, +255]
pub const COMMAND_FULL_SCALE: i16 = 255;

/// Raw bus velocity corresponding to a full-scale wheel command
const RAW_FULL_SCALE: f32 = 2400.0;

/// Hard cap on the raw velocity sent to a motor (safety limit)
const MAX_RAW: i16 = 3000;

/// The port motor is mirror-mounted, so its forward sense is reversed on
/// the bus
const PORT_DIRECTION: f32 = -1.0;

/// Raw wheel velocity commands for the two motors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WheelVelocities {
    pub star: i16,
    pub port: i16,
}

impl WheelVelocities {
    pub fn new(star: i16, port: i16) -> Self {
        Self { star, port }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

fn to_raw(units: f32, full_scale: i16) -> i16 {
    let raw = units * (RAW_FULL_SCALE / full_scale as f32);
    (raw.round() as i32).clamp(-(MAX_RAW as i32), MAX_RAW as i32) as i16
}

/// Mix a chassis vector into raw wheel commands.
///
/// Positive `forward` drives both wheels ahead; positive `turn` yaws the
/// chassis toward starboard (starboard wheel slows, port wheel speeds up).
/// When the mix saturates, both wheels are rescaled together so the
/// turn/forward ratio is preserved.
pub fn chassis_to_wheel_raw(cmd: ChassisCommand) -> WheelVelocities {
    chassis_to_wheel_raw_with_params(cmd, COMMAND_FULL_SCALE)
}

pub fn chassis_to_wheel_raw_with_params(
    cmd: ChassisCommand,
    full_scale: i16,
) -> WheelVelocities {
    let mut star = (cmd.forward as f32) - (cmd.turn as f32);
    let mut port = (cmd.forward as f32) + (cmd.turn as f32);

    let peak = star.abs().max(port.abs());
    if peak > full_scale as f32 {
        let scale = full_scale as f32 / peak;
        star *= scale;
        port *= scale;
    }

    WheelVelocities {
        star: to_raw(star, full_scale),
        port: to_raw(port * PORT_DIRECTION, full_scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vector() {
        let wheels = chassis_to_wheel_raw(ChassisCommand::zero());
        assert_eq!(wheels, WheelVelocities::zero());
    }

    #[test]
    fn test_pure_forward_drives_wheels_in_opposite_bus_sense() {
        // Mirror-mounted motors: equal chassis-forward speed means opposite
        // signs on the bus
        let wheels = chassis_to_wheel_raw(ChassisCommand::new(0, 100));
        assert!(wheels.star > 0);
        assert!(wheels.port < 0);
        assert_eq!(wheels.star, -wheels.port);
    }

    #[test]
    fn test_pure_turn_spins_wheels_same_bus_sense() {
        // Opposite chassis motion on each side -> same sign on the bus
        let wheels = chassis_to_wheel_raw(ChassisCommand::new(100, 0));
        assert!(wheels.star < 0);
        assert!(wheels.port < 0);
        assert_eq!(wheels.star, wheels.port);
    }

    #[test]
    fn test_full_scale_turn_maps_to_raw_full_scale() {
        let wheels = chassis_to_wheel_raw(ChassisCommand::new(255, 0));
        assert_eq!(wheels.star, -2400);
        assert_eq!(wheels.port, -2400);
    }

    #[test]
    fn test_saturated_mix_preserves_ratio() {
        // turn 200 + forward 200: star = 0, port = 400 -> rescaled to 255
        let wheels = chassis_to_wheel_raw(ChassisCommand::new(200, 200));
        assert_eq!(wheels.star, 0);
        assert_eq!(wheels.port.abs(), 2400);
    }

    #[test]
    fn test_raw_never_exceeds_safety_cap() {
        for turn in [-255i16, -128, 0, 128, 255] {
            for forward in [-255i16, -128, 0, 128, 255] {
                let wheels = chassis_to_wheel_raw(ChassisCommand::new(turn, forward));
                assert!(wheels.star.abs() <= MAX_RAW);
                assert!(wheels.port.abs() <= MAX_RAW);
            }
        }
    }

    #[test]
    fn test_custom_full_scale() {
        let wheels =
            chassis_to_wheel_raw_with_params(ChassisCommand::new(100, 0), 100);
        assert_eq!(wheels.star, -2400);
    }
}
