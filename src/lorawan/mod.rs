//! LoRaWAN uplink framing
//!
//! This module contains everything needed to turn a plaintext payload into
//! bytes on the air:
//! - MAC and frame header encoding
//! - Uplink frame assembly
//! - Regional channel tables
//! - Data-rate profiles

/// MAC and frame header types
pub mod mac;

/// Uplink frame assembly
pub mod frame;

/// PHY data-rate profiles
pub mod phy;

/// Regional channel tables
pub mod region;

pub use frame::{FrameBuilder, FrameError, UplinkFrame, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use phy::{DataRate, DataRateConfig};
pub use region::{channel_plan, ChannelConfig};
