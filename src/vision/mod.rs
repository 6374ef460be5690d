// Vision module client
//
// Provides:
// - HuskyLens serial frame protocol (encode/parse/decode)
// - Request/drain sensor client with a bounded connect handshake
// - The polling seam the control loop consumes

pub mod protocol;
mod sensor;

pub use protocol::{Detection, VisionError};
pub use sensor::{PollReport, VisionSensor, VisionSource};
