// Vision sensor client
//
// Request/response client for the HuskyLens module. One `request()` pulls
// the full result set for the current camera frame into a local queue;
// `read()` then drains it one detection at a time, matching the device's
// poll-and-drain usage.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

use serialport::{self, SerialPort};

use super::protocol::{
    decode_detection, decode_info, Command, Detection, Frame, VisionError, HEADER, MAX_PAYLOAD,
};
use crate::config::VISION_BAUDRATE;

const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Outcome of one polling cycle, in the order the conditions are checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollReport {
    /// The module did not answer the request
    LinkDown,
    /// The module answered but has no learned model to match against
    NothingLearned,
    /// Learned and alive, but nothing in view this frame
    NoDetections,
    /// Everything queued for this frame, drained
    Detections(Vec<Detection>),
}

/// Client-side view of the vision module. The provided `poll()` runs one
/// full request/drain cycle and folds the outcome into a [`PollReport`].
pub trait VisionSource {
    /// Fetch the current frame's results into the local queue
    fn request(&mut self) -> Result<(), VisionError>;

    /// Whether the module has at least one learned model
    fn is_learned(&self) -> bool;

    /// Whether any detections remain queued
    fn available(&self) -> bool;

    /// Pop the next queued detection
    fn read(&mut self) -> Option<Detection>;

    fn poll(&mut self) -> PollReport {
        if self.request().is_err() {
            return PollReport::LinkDown;
        }
        if !self.is_learned() {
            return PollReport::NothingLearned;
        }
        if !self.available() {
            return PollReport::NoDetections;
        }

        let mut detections = Vec::new();
        while let Some(detection) = self.read() {
            detections.push(detection);
        }
        PollReport::Detections(detections)
    }
}

/// Serial-attached vision module
pub struct VisionSensor {
    port: Box<dyn SerialPort>,
    queue: VecDeque<Detection>,
    learned_count: u16,
}

impl VisionSensor {
    /// Open the sensor link at the module's default speed
    pub fn open(port_name: &str) -> Result<Self, VisionError> {
        Self::open_with_baudrate(port_name, VISION_BAUDRATE)
    }

    pub fn open_with_baudrate(port_name: &str, baudrate: u32) -> Result<Self, VisionError> {
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .open()?;

        Ok(Self {
            port,
            queue: VecDeque::new(),
            learned_count: 0,
        })
    }

    /// Knock until the module answers, up to `attempts` tries with a fixed
    /// pause in between. Returns Err once the budget is spent so the caller
    /// can decide whether to halt or run degraded.
    pub fn connect(&mut self, attempts: u32, pause: Duration) -> Result<(), VisionError> {
        for attempt in 1..=attempts {
            match self.knock() {
                Ok(()) => {
                    info!("Vision module answered knock (attempt {})", attempt);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Vision knock attempt {}/{} failed: {}", attempt, attempts, e);
                    if attempt < attempts {
                        std::thread::sleep(pause);
                    }
                }
            }
        }
        Err(VisionError::HandshakeFailed { attempts })
    }

    fn knock(&mut self) -> Result<(), VisionError> {
        self.send_frame(&Frame::new(Command::Knock, &[]))?;
        let reply = self.read_frame()?;
        if reply.command != Command::ReturnOk as u8 {
            return Err(VisionError::InvalidFrame {
                reason: format!("expected OK to knock, got 0x{:02X}", reply.command),
            });
        }
        Ok(())
    }

    fn send_frame(&mut self, frame: &Frame) -> Result<(), VisionError> {
        let bytes = frame.encode();
        self.port.write_all(&bytes)?;
        self.port.flush()?;
        Ok(())
    }

    /// Read one frame off the wire: fixed 5-byte head, then the announced
    /// payload plus checksum, validated by the protocol parser.
    fn read_frame(&mut self) -> Result<Frame, VisionError> {
        let mut head = [0u8; 5];
        self.port.read_exact(&mut head).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                VisionError::Timeout
            } else {
                VisionError::Io(e)
            }
        })?;

        if head[..3] != HEADER {
            return Err(VisionError::InvalidFrame {
                reason: format!("bad header {:02X?}", &head[..3]),
            });
        }
        let length = head[3] as usize;
        if length > MAX_PAYLOAD {
            return Err(VisionError::InvalidFrame {
                reason: format!("payload length {} out of range", length),
            });
        }

        let mut bytes = head.to_vec();
        let mut rest = vec![0u8; length + 1];
        self.port.read_exact(&mut rest).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                VisionError::Timeout
            } else {
                VisionError::Io(e)
            }
        })?;
        bytes.extend_from_slice(&rest);

        Frame::parse(&bytes)
    }
}

impl VisionSource for VisionSensor {
    /// Ask the module for everything it currently sees. Replaces the
    /// queue; detections never survive across requests.
    fn request(&mut self) -> Result<(), VisionError> {
        self.queue.clear();

        self.send_frame(&Frame::new(Command::Request, &[]))?;

        let reply = self.read_frame()?;
        if reply.command != Command::ReturnInfo as u8 {
            return Err(VisionError::InvalidFrame {
                reason: format!("expected info frame, got 0x{:02X}", reply.command),
            });
        }
        let info = decode_info(&reply.payload)?;
        self.learned_count = info.learned_count;

        for _ in 0..info.result_count {
            let frame = self.read_frame()?;
            self.queue.push_back(decode_detection(&frame)?);
        }

        debug!(
            "vision frame {}: {} result(s), {} learned",
            info.frame_number,
            self.queue.len(),
            self.learned_count
        );
        Ok(())
    }

    fn is_learned(&self) -> bool {
        self.learned_count > 0
    }

    fn available(&self) -> bool {
        !self.queue.is_empty()
    }

    fn read(&mut self) -> Option<Detection> {
        self.queue.pop_front()
    }
}
