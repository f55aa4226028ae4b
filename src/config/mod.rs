//! Device and radio configuration
//!
//! This module contains the types a device needs before it can send:
//! - Session credentials (device address, session keys, region)
//! - The caller-owned frame counter
//! - Transceiver settings (channel mode, data rate, timeouts)

/// Session credentials and frame counter
pub mod device;

/// Transceiver settings
pub mod radio;

pub use device::{AESKey, ConfigError, DevAddr, FrameCounter, Region, SessionCredentials};
pub use radio::{ChannelMode, RadioConfig};
