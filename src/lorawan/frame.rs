//! Uplink frame assembly
//!
//! An unconfirmed uplink on the wire:
//!
//! ```text
//! | MHDR | DevAddr (LE) | FCtrl | FCnt (LE) | FPort | FRMPayload ... | MIC |
//! |  1   |      4       |   1   |     2     |   1   |       N        |  4  |
//! ```

use core::fmt;
use core::ops::Deref;

use heapless::Vec;

use super::mac::{FCtrl, MType, FHDR, HEADER_SIZE};
use crate::config::device::SessionCredentials;
use crate::crypto::{self, Direction, MIC_SIZE};

/// Transceiver FIFO capacity, the upper bound of a frame
pub const MAX_FRAME_SIZE: usize = 64;

/// Largest payload that still fits the FIFO
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - HEADER_SIZE - MIC_SIZE;

/// Frame assembly error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Header, payload and MIC would not fit the transceiver FIFO
    PayloadTooLarge {
        /// Requested payload length
        len: usize,
        /// Largest accepted payload length
        max: usize,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::PayloadTooLarge { len, max } => {
                write!(f, "payload of {} bytes exceeds {} byte limit", len, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}

/// A complete physical-layer uplink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UplinkFrame {
    bytes: Vec<u8, MAX_FRAME_SIZE>,
}

impl UplinkFrame {
    /// Frame bytes, ready for the FIFO
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MAC header, frame header and port
    pub fn header(&self) -> &[u8] {
        &self.bytes[..HEADER_SIZE]
    }

    /// Frame counter carried in the header
    pub fn frame_counter(&self) -> u16 {
        u16::from_le_bytes([self.bytes[6], self.bytes[7]])
    }

    /// Application port
    pub fn port(&self) -> u8 {
        self.bytes[8]
    }

    /// Encrypted application payload
    pub fn encrypted_payload(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..self.bytes.len() - MIC_SIZE]
    }

    /// Message integrity code
    pub fn mic(&self) -> [u8; MIC_SIZE] {
        let mut mic = [0u8; MIC_SIZE];
        mic.copy_from_slice(&self.bytes[self.bytes.len() - MIC_SIZE..]);
        mic
    }
}

impl Deref for UplinkFrame {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Builds unconfirmed uplinks for one set of credentials
#[derive(Debug, Clone, Copy)]
pub struct FrameBuilder<'a> {
    credentials: &'a SessionCredentials,
}

impl<'a> FrameBuilder<'a> {
    /// Create a builder for the given session
    pub fn new(credentials: &'a SessionCredentials) -> Self {
        Self { credentials }
    }

    /// Encrypt `payload` and wrap it into a frame
    ///
    /// Fails before doing any work when the frame would exceed
    /// [`MAX_FRAME_SIZE`]. The frame counter is only read; advancing it is
    /// up to the caller.
    pub fn build(&self, payload: &[u8], port: u8, fcnt: u16) -> Result<UplinkFrame, FrameError> {
        let too_large = || FrameError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        };
        if HEADER_SIZE + payload.len() + MIC_SIZE > MAX_FRAME_SIZE {
            return Err(too_large());
        }

        let dev_addr = self.credentials.device_address();

        let mut bytes: Vec<u8, MAX_FRAME_SIZE> = Vec::new();
        bytes.push(MType::UnconfirmedDataUp as u8).map_err(|_| too_large())?;

        let fhdr = FHDR {
            dev_addr,
            f_ctrl: FCtrl::default(),
            f_cnt: fcnt,
        };
        fhdr.serialize_into(&mut bytes).map_err(|_| too_large())?;
        bytes.push(port).map_err(|_| too_large())?;

        // Encrypt in place behind the header
        bytes.extend_from_slice(payload).map_err(|_| too_large())?;
        crypto::encrypt_payload(
            self.credentials.application_key(),
            dev_addr,
            fcnt,
            Direction::Up,
            &mut bytes[HEADER_SIZE..],
        );

        let mic = crypto::compute_mic(
            self.credentials.network_key(),
            &bytes,
            dev_addr,
            fcnt,
            Direction::Up,
        );
        bytes.extend_from_slice(&mic).map_err(|_| too_large())?;

        Ok(UplinkFrame { bytes })
    }
}
