// HuskyLens serial protocol
//
// Frame format: [0x55, 0xAA, 0x11, Length, Command, Payload..., Checksum]
// Length counts payload bytes only; the checksum is the low byte of the
// sum of every preceding byte. All payload fields are little-endian u16.

use serde::{Deserialize, Serialize};

/// Frame header: two sync bytes plus the protocol address
pub const HEADER: [u8; 3] = [0x55, 0xAA, 0x11];

/// Largest payload the device sends (info and result frames are 10 bytes)
pub const MAX_PAYLOAD: usize = 16;

/// Command bytes used by the client
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask for everything the current algorithm sees
    Request = 0x20,
    /// Reply head: counts of results and learned models
    ReturnInfo = 0x29,
    ReturnBlock = 0x2A,
    ReturnArrow = 0x2B,
    /// Liveness handshake
    Knock = 0x2C,
    ReturnOk = 0x2E,
}

/// Vision protocol errors
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid frame: {reason}")]
    InvalidFrame { reason: String },

    #[error("Frame checksum mismatch")]
    ChecksumMismatch,

    #[error("Timeout waiting for the vision module")]
    Timeout,

    #[error("Vision module handshake failed after {attempts} attempts")]
    HandshakeFailed { attempts: u32 },
}

/// One detection reported by the vision module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detection {
    /// Bounding box around a learned object
    Block {
        x_center: u16,
        y_center: u16,
        width: u16,
        height: u16,
        id: u16,
    },
    /// Line/arrow from origin to target
    Arrow {
        x_origin: u16,
        y_origin: u16,
        x_target: u16,
        y_target: u16,
        id: u16,
    },
}

/// Payload of a ReturnInfo frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
    /// Number of result frames that follow
    pub result_count: u16,
    /// Number of learned model ids
    pub learned_count: u16,
    pub frame_number: u16,
}

/// A complete, validated frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(command: Command, payload: &[u8]) -> Self {
        Self {
            command: command as u8,
            payload: payload.to_vec(),
        }
    }

    /// Serialize with header and trailing checksum
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(6 + self.payload.len());
        bytes.extend_from_slice(&HEADER);
        bytes.push(self.payload.len() as u8);
        bytes.push(self.command);
        bytes.extend_from_slice(&self.payload);
        bytes.push(checksum(&bytes));
        bytes
    }

    /// Parse one complete frame from `bytes`, validating header, length
    /// and checksum
    pub fn parse(bytes: &[u8]) -> Result<Self, VisionError> {
        if bytes.len() < 6 {
            return Err(VisionError::InvalidFrame {
                reason: format!("short frame: {} bytes", bytes.len()),
            });
        }
        if bytes[..3] != HEADER {
            return Err(VisionError::InvalidFrame {
                reason: format!("bad header {:02X?}", &bytes[..3]),
            });
        }

        let length = bytes[3] as usize;
        if bytes.len() != 6 + length {
            return Err(VisionError::InvalidFrame {
                reason: format!("length {} does not match frame size {}", length, bytes.len()),
            });
        }
        if checksum(&bytes[..bytes.len() - 1]) != bytes[bytes.len() - 1] {
            return Err(VisionError::ChecksumMismatch);
        }

        Ok(Self {
            command: bytes[4],
            payload: bytes[5..bytes.len() - 1].to_vec(),
        })
    }
}

/// Low byte of the byte sum
pub fn checksum(bytes: &[u8]) -> u8 {
    let sum: u32 = bytes.iter().map(|&b| b as u32).sum();
    (sum & 0xFF) as u8
}

fn field(payload: &[u8], index: usize) -> u16 {
    u16::from_le_bytes([payload[index * 2], payload[index * 2 + 1]])
}

/// Decode a ReturnInfo payload
pub fn decode_info(payload: &[u8]) -> Result<Info, VisionError> {
    if payload.len() < 6 {
        return Err(VisionError::InvalidFrame {
            reason: format!("info payload too short: {} bytes", payload.len()),
        });
    }
    Ok(Info {
        result_count: field(payload, 0),
        learned_count: field(payload, 1),
        frame_number: field(payload, 2),
    })
}

/// Decode a result frame (block or arrow) into a [`Detection`]
pub fn decode_detection(frame: &Frame) -> Result<Detection, VisionError> {
    if frame.payload.len() < 10 {
        return Err(VisionError::InvalidFrame {
            reason: format!("result payload too short: {} bytes", frame.payload.len()),
        });
    }
    let p = &frame.payload;

    match frame.command {
        c if c == Command::ReturnBlock as u8 => Ok(Detection::Block {
            x_center: field(p, 0),
            y_center: field(p, 1),
            width: field(p, 2),
            height: field(p, 3),
            id: field(p, 4),
        }),
        c if c == Command::ReturnArrow as u8 => Ok(Detection::Arrow {
            x_origin: field(p, 0),
            y_origin: field(p, 1),
            x_target: field(p, 2),
            y_target: field(p, 3),
            id: field(p, 4),
        }),
        other => Err(VisionError::InvalidFrame {
            reason: format!("unexpected result command 0x{:02X}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knock_frame_bytes() {
        let bytes = Frame::new(Command::Knock, &[]).encode();
        // 0x55 + 0xAA + 0x11 + 0x00 + 0x2C = 0x13C -> checksum 0x3C
        assert_eq!(bytes, vec![0x55, 0xAA, 0x11, 0x00, 0x2C, 0x3C]);
    }

    #[test]
    fn test_encode_parse_round_trip() {
        let frame = Frame::new(Command::Request, &[]);
        assert_eq!(Frame::parse(&frame.encode()).unwrap(), frame);

        let frame = Frame::new(Command::ReturnBlock, &[1, 0, 2, 0, 3, 0, 4, 0, 5, 0]);
        assert_eq!(Frame::parse(&frame.encode()).unwrap(), frame);
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        let mut bytes = Frame::new(Command::Knock, &[]).encode();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            Frame::parse(&bytes),
            Err(VisionError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let mut bytes = Frame::new(Command::Knock, &[]).encode();
        bytes[0] = 0x00;
        assert!(matches!(
            Frame::parse(&bytes),
            Err(VisionError::InvalidFrame { .. })
        ));
    }

    #[test]
    fn test_decode_block() {
        // x=160, y=120, w=40, h=30, id=1
        let payload = [160, 0, 120, 0, 40, 0, 30, 0, 1, 0];
        let frame = Frame::new(Command::ReturnBlock, &payload);
        assert_eq!(
            decode_detection(&frame).unwrap(),
            Detection::Block {
                x_center: 160,
                y_center: 120,
                width: 40,
                height: 30,
                id: 1,
            }
        );
    }

    #[test]
    fn test_decode_arrow() {
        // origin (10, 20) -> target (300, 40), id 2; 300 = 0x012C
        let payload = [10, 0, 20, 0, 0x2C, 0x01, 40, 0, 2, 0];
        let frame = Frame::new(Command::ReturnArrow, &payload);
        assert_eq!(
            decode_detection(&frame).unwrap(),
            Detection::Arrow {
                x_origin: 10,
                y_origin: 20,
                x_target: 300,
                y_target: 40,
                id: 2,
            }
        );
    }

    #[test]
    fn test_decode_info() {
        // 2 results, 1 learned model, frame 7
        let payload = [2, 0, 1, 0, 7, 0, 0, 0, 0, 0];
        let info = decode_info(&payload).unwrap();
        assert_eq!(info.result_count, 2);
        assert_eq!(info.learned_count, 1);
        assert_eq!(info.frame_number, 7);
    }

    #[test]
    fn test_decode_detection_rejects_info_frame() {
        let frame = Frame::new(Command::ReturnInfo, &[0; 10]);
        assert!(decode_detection(&frame).is_err());
    }
}
