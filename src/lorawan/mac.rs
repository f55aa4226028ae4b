use heapless::Vec;

use crate::config::device::DevAddr;

/// Size of the MAC header, frame header (without options) and port
pub const HEADER_SIZE: usize = 9;

/// MAC header types
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MType {
    JoinRequest = 0x00,
    JoinAccept = 0x20,
    UnconfirmedDataUp = 0x40,
    UnconfirmedDataDown = 0x60,
    ConfirmedDataUp = 0x80,
    ConfirmedDataDown = 0xA0,
    RejoinRequest = 0xC0,
    Proprietary = 0xE0,
}

/// Frame control flags
///
/// Uplinks built here never set a flag, so the byte is always zero; the
/// fields document what the bits mean on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FCtrl {
    /// Adaptive data rate
    pub adr: bool,
    /// ADR acknowledgement request
    pub adr_ack_req: bool,
    /// Acknowledges a confirmed downlink
    pub ack: bool,
    /// More downlink data pending (downlink only)
    pub f_pending: bool,
    /// Length of the frame options, always 0 here
    pub f_opts_len: u8,
}

impl FCtrl {
    /// Encode to the FCtrl byte
    pub fn to_byte(&self) -> u8 {
        let mut byte = self.f_opts_len & 0x0F;
        if self.adr {
            byte |= 0x80;
        }
        if self.adr_ack_req {
            byte |= 0x40;
        }
        if self.ack {
            byte |= 0x20;
        }
        if self.f_pending {
            byte |= 0x10;
        }
        byte
    }
}

/// Frame header without options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FHDR {
    /// Device address
    pub dev_addr: DevAddr,
    /// Frame control byte
    pub f_ctrl: FCtrl,
    /// Lower 16 bits of the frame counter
    pub f_cnt: u16,
}

impl FHDR {
    /// Append the header in wire order: address and counter little-endian
    pub fn serialize_into<const N: usize>(&self, buffer: &mut Vec<u8, N>) -> Result<(), ()> {
        buffer.extend_from_slice(&self.dev_addr.to_le_bytes())?;
        buffer.push(self.f_ctrl.to_byte()).map_err(|_| ())?;
        buffer.extend_from_slice(&self.f_cnt.to_le_bytes())?;
        Ok(())
    }
}
