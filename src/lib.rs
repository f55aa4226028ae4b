//! Single-frame LoRaWAN uplinks for SX127x radios
//!
//! This crate sends unconfirmed LoRaWAN uplinks from an ABP-activated
//! device through an SX1276/RFM95 class transceiver. It covers payload
//! encryption, MIC computation, frame assembly and the radio's
//! sleep/standby/transmit cycle with a bounded wait for TxDone.
//!
//! # Features
//! - AES-128 payload encryption and AES-CMAC message integrity codes
//! - Frame assembly bounded by the 64 byte FIFO
//! - Regional channel tables (US, EU, AU, AS, CN) with random hopping or a
//!   fixed channel
//! - Named data-rate profiles (`SF7BW125` .. `SF12BW125`)
//! - No heap, no unsafe code
//!
//! MAC-layer features (join, ADR, downlinks, retransmissions) are not
//! provided.
//!
//! # Example
//! ```no_run
//! use tinylora::{
//!     config::{AESKey, DevAddr, RadioConfig, SessionCredentials},
//!     device::Device,
//!     radio::{SpiRegisterBus, SX127x},
//! };
//!
//! # fn run<SPI, CS, RST, IRQ, D, T, RNG>(spi: SPI, cs: CS, rst: RST, irq: IRQ, delay: D, timer: T, rng: RNG)
//! # where
//! #     SPI: embedded_hal::blocking::spi::Transfer<u8> + embedded_hal::blocking::spi::Write<u8>,
//! #     CS: embedded_hal::digital::v2::OutputPin,
//! #     RST: embedded_hal::digital::v2::OutputPin,
//! #     IRQ: embedded_hal::digital::v2::InputPin,
//! #     D: embedded_hal::blocking::delay::DelayUs<u32>,
//! #     T: embedded_hal::timer::CountDown,
//! #     T::Time: From<core::time::Duration>,
//! #     RNG: rand_core::RngCore,
//! # {
//! let credentials = SessionCredentials::from_region_tag(
//!     DevAddr::new([0x26, 0x01, 0x1B, 0x3C]),
//!     AESKey::new([0x00; 16]), // network session key
//!     AESKey::new([0x00; 16]), // application session key
//!     "US",
//! )
//! .unwrap();
//!
//! let bus = SpiRegisterBus::new(spi, cs);
//! let radio = SX127x::new(
//!     bus, rst, irq, delay, timer, rng,
//!     credentials.region(),
//!     RadioConfig::default(),
//! )
//! .unwrap();
//!
//! let mut device = Device::new(radio, credentials);
//! let mut fcnt = 0u16;
//! device.send_data(b"Hello, LoRaWAN!", 1, fcnt).unwrap();
//! fcnt += 1;
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

/// Device and radio configuration
pub mod config;

/// Cryptographic functions
pub mod crypto;

/// High-level device interface
pub mod device;

/// LoRaWAN framing
pub mod lorawan;

/// Radio hardware abstraction layer
pub mod radio;
