//! High-level uplink interface
//!
//! [`Device`] ties a session's credentials to a [`Radio`]: each call builds
//! one unconfirmed uplink and transmits it. The frame counter stays with the
//! caller, who must advance it between calls.

use core::fmt;
use core::time::Duration;

use crate::{
    config::device::SessionCredentials,
    lorawan::frame::{FrameBuilder, FrameError},
    radio::traits::Radio,
};

/// LoRaWAN device error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError<E> {
    /// Frame could not be built
    Frame(FrameError),
    /// Radio error
    Radio(E),
}

impl<E> From<FrameError> for DeviceError<E> {
    fn from(error: FrameError) -> Self {
        DeviceError::Frame(error)
    }
}

impl<E: fmt::Display> fmt::Display for DeviceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Frame(err) => write!(f, "frame error: {}", err),
            DeviceError::Radio(err) => write!(f, "radio error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for DeviceError<E> {}

/// ABP device sending unconfirmed uplinks
pub struct Device<R: Radio> {
    radio: R,
    credentials: SessionCredentials,
    last_fcnt: Option<u16>,
}

impl<R: Radio> Device<R> {
    /// Create a device from an initialized radio and its session
    pub fn new(radio: R, credentials: SessionCredentials) -> Self {
        Self {
            radio,
            credentials,
            last_fcnt: None,
        }
    }

    /// Send `payload` on `port` using the radio's default timeout
    pub fn send_data(&mut self, payload: &[u8], port: u8, fcnt: u16) -> Result<(), DeviceError<R::Error>> {
        let timeout = self.radio.tx_timeout();
        self.send_data_with_timeout(payload, port, fcnt, timeout)
    }

    /// Send `payload` on `port`, waiting at most `timeout` for TxDone
    ///
    /// Oversized payloads are rejected before the radio is touched.
    pub fn send_data_with_timeout(
        &mut self,
        payload: &[u8],
        port: u8,
        fcnt: u16,
        timeout: Duration,
    ) -> Result<(), DeviceError<R::Error>> {
        let frame = FrameBuilder::new(&self.credentials).build(payload, port, fcnt)?;
        self.last_fcnt = Some(fcnt);
        log::debug!("device: uplink fcnt {} port {} ({} bytes)", fcnt, port, frame.len());

        self.radio
            .transmit(frame.as_bytes(), timeout)
            .map_err(DeviceError::Radio)
    }

    /// Frame counter of the last attempted send
    pub fn last_frame_counter(&self) -> Option<u16> {
        self.last_fcnt
    }

    /// Session credentials
    pub fn credentials(&self) -> &SessionCredentials {
        &self.credentials
    }

    /// Get radio reference
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Get mutable radio reference, e.g. to change the data rate
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Give back the radio and credentials
    pub fn release(self) -> (R, SessionCredentials) {
        (self.radio, self.credentials)
    }
}
