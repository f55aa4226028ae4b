//! Radio hardware abstraction layer
//!
//! - `traits`: the [`Radio`] interface the device layer sends through
//! - `bus`: register access over SPI
//! - `sx127x`: driver for SX1276/7/8/9 and HopeRF RFM95/6/7/8 modules

pub mod bus;
pub mod sx127x;
pub mod traits;

pub use bus::{BusError, RegisterBus, SpiRegisterBus};
pub use sx127x::{RadioError, SX127x};
pub use traits::{Radio, RadioMode};
