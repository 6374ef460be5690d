// Message types shared across the runtime

use serde::{Deserialize, Serialize};

/// One chassis motion command: a turn rate and a forward speed, both in
/// actuator units (±255). Produced once per control cycle and consumed
/// immediately by the drivetrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChassisCommand {
    pub turn: i16,
    pub forward: i16,
}

impl ChassisCommand {
    pub fn new(turn: i16, forward: i16) -> Self {
        Self { turn, forward }
    }

    /// All-stop command
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Health state reported by the runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    /// Vision path is enabled but the sensor link is not answering
    VisionDown,
}
