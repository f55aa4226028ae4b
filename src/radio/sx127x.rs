use core::fmt;
use core::time::Duration;

use embedded_hal::{
    blocking::delay::DelayUs,
    digital::v2::{InputPin, OutputPin},
    timer::CountDown,
};
use rand_core::RngCore;

use crate::config::device::Region;
use crate::config::radio::{ChannelMode, RadioConfig};
use crate::lorawan::frame::MAX_FRAME_SIZE;
use crate::lorawan::phy::DataRate;
use crate::lorawan::region::{channel_plan, ChannelConfig};
use crate::radio::bus::RegisterBus;
use crate::radio::traits::{Radio, RadioMode};

// SX127x Register Map (LoRa mode)
const REG_FIFO: u8 = 0x00;
const REG_OP_MODE: u8 = 0x01;
const REG_FRF_MSB: u8 = 0x06;
const REG_FRF_MID: u8 = 0x07;
const REG_FRF_LSB: u8 = 0x08;
const REG_PA_CONFIG: u8 = 0x09;
const REG_FIFO_ADDR_PTR: u8 = 0x0D;
const REG_FIFO_TX_BASE_ADDR: u8 = 0x0E;
const REG_FIFO_RX_BASE_ADDR: u8 = 0x0F;
const REG_IRQ_FLAGS: u8 = 0x12;
const REG_MODEM_CONFIG_1: u8 = 0x1D;
const REG_MODEM_CONFIG_2: u8 = 0x1E;
const REG_SYMB_TIMEOUT_LSB: u8 = 0x1F;
const REG_PREAMBLE_MSB: u8 = 0x20;
const REG_PREAMBLE_LSB: u8 = 0x21;
const REG_PAYLOAD_LENGTH: u8 = 0x22;
const REG_MODEM_CONFIG_3: u8 = 0x26;
const REG_INVERTIQ: u8 = 0x33;
const REG_SYNC_WORD: u8 = 0x39;
const REG_INVERTIQ2: u8 = 0x3B;
const REG_DIO_MAPPING_1: u8 = 0x40;
const REG_VERSION: u8 = 0x42;

// Operating Mode bits
const MODE_LONG_RANGE_MODE: u8 = 0x80;
const MODE_SLEEP: u8 = 0x00;
const MODE_STDBY: u8 = 0x01;
const MODE_TX: u8 = 0x03;

/// Silicon revision reported by SX1276/7/8/9 and RFM95/6/7/8
pub const EXPECTED_VERSION: u8 = 0x12;

/// TX half of the FIFO
const FIFO_TX_BASE: u8 = 0x80;

/// DIO0 signals TxDone
const DIO0_TX_DONE: u8 = 0x40;

/// IRQ flag set once a packet has left the FIFO
pub const IRQ_TX_DONE_MASK: u8 = 0x08;

const IRQ_CLEAR_ALL: u8 = 0xFF;

// Reset pulse and wake-up timings
const RESET_PULSE_US: u32 = 100;
const RESET_WAKEUP_US: u32 = 5_000;
const STANDBY_SETTLE_US: u32 = 10_000;

/// Baseline LoRa configuration, written in order after the sleep transitions
const BASELINE: [(u8, u8); 10] = [
    (REG_PA_CONFIG, 0xFF),         // PA_BOOST, max power
    (REG_SYMB_TIMEOUT_LSB, 0x25),
    (REG_PREAMBLE_MSB, 0x00),      // 8 symbol preamble
    (REG_PREAMBLE_LSB, 0x08),
    (REG_MODEM_CONFIG_3, 0x0C),    // low data rate optimize, AGC
    (REG_SYNC_WORD, 0x34),         // LoRaWAN public network
    (REG_INVERTIQ, 0x27),          // IQ not inverted on uplink
    (REG_INVERTIQ2, 0x1D),
    (REG_FIFO_TX_BASE_ADDR, FIFO_TX_BASE),
    (REG_FIFO_RX_BASE_ADDR, 0x00),
];

/// Possible errors in radio operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError<E> {
    /// Register bus transaction failed
    Bus(E),
    /// Reset or DIO0 pin error
    Gpio,
    /// Version register did not match [`EXPECTED_VERSION`]
    DeviceNotDetected {
        /// Value read from the version register
        version: u8,
    },
    /// Unknown data-rate name
    UnsupportedDatarate,
    /// Channel index outside the region table
    UnsupportedChannel {
        /// Requested index
        index: usize,
        /// Number of channels in the region table
        available: usize,
    },
    /// Frame does not fit the FIFO
    PayloadTooLarge {
        /// Frame length
        len: usize,
    },
    /// TxDone was not signalled within the timeout
    SendTimeout,
}

impl<E> From<E> for RadioError<E> {
    fn from(error: E) -> Self {
        RadioError::Bus(error)
    }
}

impl<E: fmt::Debug> fmt::Display for RadioError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioError::Bus(err) => write!(f, "bus error: {:?}", err),
            RadioError::Gpio => f.write_str("GPIO error"),
            RadioError::DeviceNotDetected { version } => write!(
                f,
                "LoRa module not detected (version 0x{:02X}), check wiring",
                version
            ),
            RadioError::UnsupportedDatarate => f.write_str("invalid or unsupported data rate"),
            RadioError::UnsupportedChannel { index, available } => write!(
                f,
                "channel {} out of range, region has {} channels",
                index, available
            ),
            RadioError::PayloadTooLarge { len } => {
                write!(f, "frame of {} bytes exceeds FIFO", len)
            }
            RadioError::SendTimeout => f.write_str("timeout during packet send"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for RadioError<E> {}

fn op_mode_bits(mode: RadioMode) -> u8 {
    let bits = match mode {
        RadioMode::Sleep => MODE_SLEEP,
        RadioMode::Standby => MODE_STDBY,
        RadioMode::Transmit => MODE_TX,
    };
    MODE_LONG_RANGE_MODE | bits
}

/// Write the operating mode register and track the new mode
fn write_op_mode<BUS: RegisterBus>(
    bus: &mut BUS,
    current: &mut RadioMode,
    mode: RadioMode,
) -> Result<(), BUS::Error> {
    bus.write_register(REG_OP_MODE, op_mode_bits(mode))?;
    log::trace!("sx127x: mode {:?} -> {:?}", current, mode);
    *current = mode;
    Ok(())
}

/// Puts the radio back to sleep when a send leaves its scope.
///
/// [`SleepGuard::finish`] does it explicitly and reports the bus error; any
/// other exit (early `?` return) goes through `Drop`.
struct SleepGuard<'a, BUS: RegisterBus> {
    bus: &'a mut BUS,
    mode: &'a mut RadioMode,
    armed: bool,
}

impl<'a, BUS: RegisterBus> SleepGuard<'a, BUS> {
    /// Enter standby; the guard is armed even if the mode write fails
    fn standby(bus: &'a mut BUS, mode: &'a mut RadioMode) -> Result<Self, BUS::Error> {
        let mut guard = Self {
            bus,
            mode,
            armed: true,
        };
        guard.set_mode(RadioMode::Standby)?;
        Ok(guard)
    }

    fn set_mode(&mut self, mode: RadioMode) -> Result<(), BUS::Error> {
        write_op_mode(&mut *self.bus, &mut *self.mode, mode)
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), BUS::Error> {
        log::trace!("sx127x: reg 0x{:02X} <- 0x{:02X}", addr, value);
        self.bus.write_register(addr, value)
    }

    fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<(), BUS::Error> {
        self.bus.write_burst(addr, data)
    }

    fn finish(mut self) -> Result<(), BUS::Error> {
        self.armed = false;
        write_op_mode(&mut *self.bus, &mut *self.mode, RadioMode::Sleep)
    }
}

impl<'a, BUS: RegisterBus> Drop for SleepGuard<'a, BUS> {
    fn drop(&mut self) {
        if self.armed && write_op_mode(&mut *self.bus, &mut *self.mode, RadioMode::Sleep).is_err() {
            log::warn!("sx127x: failed to return to sleep after aborted send");
        }
    }
}

/// Poll DIO0 once
fn tx_done<DIO0: InputPin, E>(dio0: &DIO0) -> nb::Result<(), RadioError<E>> {
    if dio0.is_high().map_err(|_| nb::Error::Other(RadioError::Gpio))? {
        Ok(())
    } else {
        Err(nb::Error::WouldBlock)
    }
}

/// SX127x (RFM95/96/97/98) uplink driver
///
/// Owns the register bus, reset and DIO0 pins, a delay for the reset pulse
/// and poll pacing, a count-down timer bounding each send, and a random
/// source for channel hopping.
pub struct SX127x<BUS, RESET, DIO0, DELAY, TIMER, RNG>
where
    BUS: RegisterBus,
    RESET: OutputPin,
    DIO0: InputPin,
    DELAY: DelayUs<u32>,
    TIMER: CountDown,
    TIMER::Time: From<Duration>,
    RNG: RngCore,
{
    bus: BUS,
    reset: RESET,
    dio0: DIO0,
    delay: DELAY,
    timer: TIMER,
    rng: RNG,
    region: Region,
    channels: &'static [ChannelConfig],
    channel_mode: ChannelMode,
    channel: ChannelConfig,
    data_rate: DataRate,
    tx_timeout: Duration,
    poll_interval_us: u32,
    mode: RadioMode,
    version: u8,
}

impl<BUS, RESET, DIO0, DELAY, TIMER, RNG> SX127x<BUS, RESET, DIO0, DELAY, TIMER, RNG>
where
    BUS: RegisterBus,
    RESET: OutputPin,
    DIO0: InputPin,
    DELAY: DelayUs<u32>,
    TIMER: CountDown,
    TIMER::Time: From<Duration>,
    RNG: RngCore,
{
    /// Reset the transceiver, check its version and program the baseline
    /// configuration for `region`
    ///
    /// Fails with [`RadioError::DeviceNotDetected`] when the version register
    /// does not read [`EXPECTED_VERSION`].
    pub fn new(
        bus: BUS,
        reset: RESET,
        dio0: DIO0,
        delay: DELAY,
        timer: TIMER,
        rng: RNG,
        region: Region,
        config: RadioConfig,
    ) -> Result<Self, RadioError<BUS::Error>> {
        let channels = channel_plan(region);
        let channel = match config.channel {
            ChannelMode::Fixed(index) => *channels.get(index).ok_or(
                RadioError::UnsupportedChannel {
                    index,
                    available: channels.len(),
                },
            )?,
            ChannelMode::Hopping => channels[0],
        };
        let poll_interval_us = u32::try_from(config.poll_interval.as_micros()).unwrap_or(u32::MAX);

        let mut radio = Self {
            bus,
            reset,
            dio0,
            delay,
            timer,
            rng,
            region,
            channels,
            channel_mode: config.channel,
            channel,
            data_rate: config.data_rate,
            tx_timeout: config.tx_timeout,
            poll_interval_us,
            mode: RadioMode::Sleep,
            version: 0,
        };

        radio.hardware_reset()?;

        radio.version = radio.bus.read_register(REG_VERSION)?;
        if radio.version != EXPECTED_VERSION {
            log::warn!(
                "sx127x: unexpected version 0x{:02X}, check wiring",
                radio.version
            );
            return Err(RadioError::DeviceNotDetected {
                version: radio.version,
            });
        }

        radio.init()?;
        log::debug!(
            "sx127x: ready, region {}, {}, {:?}",
            region.tag(),
            radio.data_rate,
            radio.channel_mode
        );
        Ok(radio)
    }

    /// Pulse the reset line low
    fn hardware_reset(&mut self) -> Result<(), RadioError<BUS::Error>> {
        self.reset.set_low().map_err(|_| RadioError::Gpio)?;
        self.delay.delay_us(RESET_PULSE_US);
        self.reset.set_high().map_err(|_| RadioError::Gpio)?;
        self.delay.delay_us(RESET_WAKEUP_US);
        Ok(())
    }

    /// Write a radio register
    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), RadioError<BUS::Error>> {
        log::trace!("sx127x: reg 0x{:02X} <- 0x{:02X}", addr, value);
        self.bus.write_register(addr, value)?;
        Ok(())
    }

    /// Set operating mode
    fn set_mode(&mut self, mode: RadioMode) -> Result<(), RadioError<BUS::Error>> {
        write_op_mode(&mut self.bus, &mut self.mode, mode)?;
        Ok(())
    }

    /// Select a data-rate profile by name, e.g. `"SF9BW125"`
    ///
    /// Unknown names are rejected and the current profile is kept.
    pub fn set_datarate(&mut self, name: &str) -> Result<(), RadioError<BUS::Error>> {
        let data_rate = DataRate::from_name(name).ok_or(RadioError::UnsupportedDatarate)?;
        self.set_data_rate(data_rate);
        Ok(())
    }

    /// Select a data-rate profile
    ///
    /// Takes effect on the next send.
    pub fn set_data_rate(&mut self, data_rate: DataRate) {
        log::debug!("sx127x: data rate {}", data_rate);
        self.data_rate = data_rate;
    }

    /// Current data-rate profile
    pub fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// Pin every send to one channel of the region table
    ///
    /// Out-of-range indexes are rejected and the current setting is kept.
    pub fn set_channel(&mut self, index: usize) -> Result<(), RadioError<BUS::Error>> {
        let channel = *self
            .channels
            .get(index)
            .ok_or(RadioError::UnsupportedChannel {
                index,
                available: self.channels.len(),
            })?;
        log::debug!("sx127x: fixed channel {} ({} Hz)", index, channel.frequency_hz());
        self.channel = channel;
        self.channel_mode = ChannelMode::Fixed(index);
        Ok(())
    }

    /// Go back to picking a random channel on every send
    pub fn clear_channel(&mut self) {
        log::debug!("sx127x: channel hopping");
        self.channel_mode = ChannelMode::Hopping;
    }

    /// Current channel selection
    pub fn channel_mode(&self) -> ChannelMode {
        self.channel_mode
    }

    /// Channel used by the last send, or the fixed channel
    pub fn channel(&self) -> ChannelConfig {
        self.channel
    }

    /// Frequency-plan region
    pub fn region(&self) -> Region {
        self.region
    }

    /// Silicon version read at initialization
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Read the IRQ flag register
    pub fn read_status(&mut self) -> Result<u8, RadioError<BUS::Error>> {
        Ok(self.bus.read_register(REG_IRQ_FLAGS)?)
    }

    /// Clear every IRQ flag
    pub fn clear_irq_flags(&mut self) -> Result<(), RadioError<BUS::Error>> {
        self.write_register(REG_IRQ_FLAGS, IRQ_CLEAR_ALL)
    }

    /// Put the radio to sleep and give back the owned peripherals
    pub fn release(mut self) -> (BUS, RESET, DIO0, DELAY, TIMER, RNG) {
        if self.set_mode(RadioMode::Sleep).is_err() {
            log::warn!("sx127x: failed to enter sleep on release");
        }
        (self.bus, self.reset, self.dio0, self.delay, self.timer, self.rng)
    }

    /// Pick the channel for the next send
    fn next_channel(&mut self) -> ChannelConfig {
        if let ChannelMode::Hopping = self.channel_mode {
            let index = self.rng.next_u32() as usize % self.channels.len();
            self.channel = self.channels[index];
        }
        self.channel
    }
}

impl<BUS, RESET, DIO0, DELAY, TIMER, RNG> Radio for SX127x<BUS, RESET, DIO0, DELAY, TIMER, RNG>
where
    BUS: RegisterBus,
    RESET: OutputPin,
    DIO0: InputPin,
    DELAY: DelayUs<u32>,
    TIMER: CountDown,
    TIMER::Time: From<Duration>,
    RNG: RngCore,
{
    type Error = RadioError<BUS::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        // LoRa mode can only be selected from sleep
        self.write_register(REG_OP_MODE, MODE_SLEEP)?;
        self.set_mode(RadioMode::Sleep)?;

        for (addr, value) in BASELINE {
            self.write_register(addr, value)?;
        }

        Ok(())
    }

    fn transmit(&mut self, frame: &[u8], timeout: Duration) -> Result<(), Self::Error> {
        if frame.len() > MAX_FRAME_SIZE {
            return Err(RadioError::PayloadTooLarge { len: frame.len() });
        }

        self.timer.start(timeout);
        let channel = self.next_channel();
        let modem = self.data_rate.config();
        log::debug!(
            "sx127x: tx {} bytes, {} Hz, {}",
            frame.len(),
            channel.frequency_hz(),
            self.data_rate
        );

        let mut guard = SleepGuard::standby(&mut self.bus, &mut self.mode)?;
        self.delay.delay_us(STANDBY_SETTLE_US);

        let [frf_msb, frf_mid, frf_lsb] = channel.frf;
        for (addr, value) in [
            (REG_DIO_MAPPING_1, DIO0_TX_DONE),
            (REG_IRQ_FLAGS, IRQ_CLEAR_ALL),
            (REG_FRF_MSB, frf_msb),
            (REG_FRF_MID, frf_mid),
            (REG_FRF_LSB, frf_lsb),
            (REG_MODEM_CONFIG_2, modem.modem_config2),
            (REG_MODEM_CONFIG_1, modem.modem_config1),
            (REG_MODEM_CONFIG_3, modem.modem_config3),
            (REG_PAYLOAD_LENGTH, frame.len() as u8),
            (REG_FIFO_ADDR_PTR, FIFO_TX_BASE),
        ] {
            guard.write_register(addr, value)?;
        }

        guard.write_burst(REG_FIFO, frame)?;
        guard.set_mode(RadioMode::Transmit)?;

        let timed_out = loop {
            match tx_done(&self.dio0) {
                Ok(()) => break false,
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(err)) => return Err(err),
            }
            match self.timer.wait() {
                Ok(()) => break true,
                Err(nb::Error::WouldBlock) => self.delay.delay_us(self.poll_interval_us),
                Err(nb::Error::Other(never)) => match never {},
            }
        };

        if !timed_out {
            guard.write_register(REG_IRQ_FLAGS, IRQ_CLEAR_ALL)?;
        }
        guard.finish()?;

        if timed_out {
            log::warn!("sx127x: no TxDone within {:?}", timeout);
            return Err(RadioError::SendTimeout);
        }
        Ok(())
    }

    fn tx_timeout(&self) -> Duration {
        self.tx_timeout
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.set_mode(RadioMode::Sleep)
    }

    fn standby(&mut self) -> Result<(), Self::Error> {
        self.set_mode(RadioMode::Standby)
    }

    fn mode(&self) -> RadioMode {
        self.mode
    }
}
