#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

use embedded_hal::{
    blocking::{
        delay::DelayUs,
        spi::{Transfer, Write},
    },
    digital::v2::{InputPin, OutputPin},
    timer::CountDown,
};
use rand_core::RngCore;
use tinylora::{
    config::{device::Region, radio::RadioConfig},
    radio::{
        bus::RegisterBus,
        traits::{Radio, RadioMode},
        sx127x::{RadioError, SX127x},
    },
};

pub const REG_FIFO: u8 = 0x00;
pub const REG_OP_MODE: u8 = 0x01;
pub const REG_FRF_MSB: u8 = 0x06;
pub const REG_FRF_MID: u8 = 0x07;
pub const REG_FRF_LSB: u8 = 0x08;
pub const REG_IRQ_FLAGS: u8 = 0x12;
pub const REG_MODEM_CONFIG_1: u8 = 0x1D;
pub const REG_MODEM_CONFIG_2: u8 = 0x1E;
pub const REG_PAYLOAD_LENGTH: u8 = 0x22;
pub const REG_MODEM_CONFIG_3: u8 = 0x26;
pub const REG_DIO_MAPPING_1: u8 = 0x40;
pub const REG_VERSION: u8 = 0x42;

pub const OP_SLEEP: u8 = 0x80;
pub const OP_STANDBY: u8 = 0x81;
pub const OP_TX: u8 = 0x83;

/// Simulated SX127x shared by the bus, pins, delay and timer mocks
pub struct SimState {
    pub registers: [u8; 128],
    /// Every register write in order, FIFO bytes included
    pub writes: Vec<(u8, u8)>,
    pub fifo: Vec<u8>,
    /// DIO0 rises as soon as the radio enters TX
    pub tx_completes: bool,
    pub fail_fifo_write: bool,
    pub reset_levels: Vec<bool>,
    /// Simulated clock, advanced only by the delay mock
    pub now_us: u64,
    pub dio0_polls: usize,
}

impl SimState {
    pub fn new() -> Self {
        let mut registers = [0u8; 128];
        registers[REG_VERSION as usize] = 0x12;
        Self {
            registers,
            writes: Vec::new(),
            fifo: Vec::new(),
            tx_completes: true,
            fail_fifo_write: false,
            reset_levels: Vec::new(),
            now_us: 0,
            dio0_polls: 0,
        }
    }

    /// Values written to `addr`, oldest first
    pub fn writes_to(&self, addr: u8) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Index of the first write of `value` to `addr` after position `from`
    pub fn position(&self, addr: u8, value: u8, from: usize) -> Option<usize> {
        self.writes
            .iter()
            .skip(from)
            .position(|w| *w == (addr, value))
            .map(|i| i + from)
    }

    pub fn register(&self, addr: u8) -> u8 {
        self.registers[addr as usize]
    }
}

pub type Sim = Rc<RefCell<SimState>>;

pub fn sim() -> Sim {
    Rc::new(RefCell::new(SimState::new()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

pub struct MockBus(pub Sim);

impl RegisterBus for MockBus {
    type Error = MockBusError;

    fn read_register(&mut self, addr: u8) -> Result<u8, MockBusError> {
        Ok(self.0.borrow().registers[(addr & 0x7F) as usize])
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), MockBusError> {
        let mut state = self.0.borrow_mut();
        if addr == REG_FIFO {
            if state.fail_fifo_write {
                return Err(MockBusError);
            }
            state.fifo.push(value);
        }
        state.writes.push((addr, value));
        state.registers[(addr & 0x7F) as usize] = value;
        Ok(())
    }
}

pub struct MockResetPin(pub Sim);

impl OutputPin for MockResetPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().reset_levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().reset_levels.push(true);
        Ok(())
    }
}

/// DIO0 follows TxDone: high while the radio is in TX and completion is enabled
pub struct MockDio0(pub Sim);

impl InputPin for MockDio0 {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        let mut state = self.0.borrow_mut();
        state.dio0_polls += 1;
        Ok(state.tx_completes && state.register(REG_OP_MODE) & 0x07 == 0x03)
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

pub struct MockDelay(pub Sim);

impl DelayUs<u32> for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().now_us += u64::from(us);
    }
}

pub struct MockTimer {
    sim: Sim,
    deadline_us: u64,
}

impl MockTimer {
    pub fn new(sim: Sim) -> Self {
        Self { sim, deadline_us: 0 }
    }
}

impl CountDown for MockTimer {
    type Time = Duration;

    fn start<T>(&mut self, count: T)
    where
        T: Into<Self::Time>,
    {
        let count: Duration = count.into();
        let now = self.sim.borrow().now_us;
        self.deadline_us = now + count.as_micros() as u64;
    }

    fn wait(&mut self) -> nb::Result<(), void::Void> {
        if self.sim.borrow().now_us >= self.deadline_us {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

/// Replays a fixed sequence of values, then repeats the last one
pub struct MockRng {
    values: Vec<u32>,
    next: usize,
}

impl MockRng {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RngCore for MockRng {
    fn next_u32(&mut self) -> u32 {
        let index = self.next.min(self.values.len().saturating_sub(1));
        self.next += 1;
        self.values.get(index).copied().unwrap_or(0)
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.next_u32() as u8;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

pub type SimRadio = SX127x<MockBus, MockResetPin, MockDio0, MockDelay, MockTimer, MockRng>;

/// Build a driver against a fresh simulated transceiver
pub fn sim_radio(
    config: RadioConfig,
    rng: &[u32],
) -> (Result<SimRadio, RadioError<MockBusError>>, Sim) {
    let state = sim();
    let radio = sim_radio_on(state.clone(), config, rng);
    (radio, state)
}

pub fn sim_radio_on(
    state: Sim,
    config: RadioConfig,
    rng: &[u32],
) -> Result<SimRadio, RadioError<MockBusError>> {
    SX127x::new(
        MockBus(state.clone()),
        MockResetPin(state.clone()),
        MockDio0(state.clone()),
        MockDelay(state.clone()),
        MockTimer::new(state),
        MockRng::new(rng),
        Region::US,
        config,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRadioError {
    Timeout,
}

/// Radio that records frames instead of sending them
pub struct MockRadio {
    pub sent: Vec<Vec<u8>>,
    pub last_timeout: Option<Duration>,
    pub fail: bool,
    mode: RadioMode,
}

impl MockRadio {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            last_timeout: None,
            fail: false,
            mode: RadioMode::Sleep,
        }
    }

    /// Get last transmitted data
    pub fn get_last_tx(&self) -> Option<&[u8]> {
        self.sent.last().map(|v| v.as_slice())
    }
}

impl Radio for MockRadio {
    type Error = MockRadioError;

    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn transmit(&mut self, frame: &[u8], timeout: Duration) -> Result<(), Self::Error> {
        self.last_timeout = Some(timeout);
        self.mode = RadioMode::Sleep;
        if self.fail {
            return Err(MockRadioError::Timeout);
        }
        self.sent.push(frame.to_vec());
        Ok(())
    }

    fn tx_timeout(&self) -> Duration {
        Duration::from_secs(2)
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.mode = RadioMode::Sleep;
        Ok(())
    }

    fn standby(&mut self) -> Result<(), Self::Error> {
        self.mode = RadioMode::Standby;
        Ok(())
    }

    fn mode(&self) -> RadioMode {
        self.mode
    }
}

/// SPI bus that records every byte and answers reads with `response`
pub struct MockSpi {
    pub sent: Rc<RefCell<Vec<Vec<u8>>>>,
    pub response: u8,
    pub fail: bool,
}

impl Transfer<u8> for MockSpi {
    type Error = ();

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], ()> {
        if self.fail {
            return Err(());
        }
        self.sent.borrow_mut().push(words.to_vec());
        for word in words.iter_mut().skip(1) {
            *word = self.response;
        }
        Ok(words)
    }
}

impl Write<u8> for MockSpi {
    type Error = ();

    fn write(&mut self, words: &[u8]) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.sent.borrow_mut().push(words.to_vec());
        Ok(())
    }
}

/// Chip select pin recording its levels
pub struct MockCs(pub Rc<RefCell<Vec<bool>>>);

impl OutputPin for MockCs {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(true);
        Ok(())
    }
}
