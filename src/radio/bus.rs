use core::fmt;

use embedded_hal::{
    blocking::spi::{Transfer, Write},
    digital::v2::OutputPin,
};

/// Address bit selecting a write access
const WRITE_FLAG: u8 = 0x80;

/// Register-level access to a transceiver
///
/// Addresses are 7-bit; the implementation clears bit 7 for reads and sets
/// it for writes. Every call is one blocking bus transaction.
pub trait RegisterBus {
    /// Error type for bus transactions
    type Error;

    /// Read a single register
    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error>;

    /// Write a single register
    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error>;

    /// Write consecutive bytes to the same address, e.g. the FIFO
    fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.write_register(addr, byte)?;
        }
        Ok(())
    }
}

/// SPI bus transaction error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// SPI transfer error
    Spi,
    /// Chip select pin error
    ChipSelect,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Spi => f.write_str("SPI transfer failed"),
            BusError::ChipSelect => f.write_str("chip select failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BusError {}

/// [`RegisterBus`] over a blocking SPI bus with a manual chip select
pub struct SpiRegisterBus<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiRegisterBus<SPI, CS>
where
    SPI: Transfer<u8> + Write<u8>,
    CS: OutputPin,
{
    /// Wrap an SPI bus and its chip select pin
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Give back the SPI bus and pin
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Run `op` with chip select asserted; it is released even if `op` fails
    fn transaction<T>(
        &mut self,
        op: impl FnOnce(&mut SPI) -> Result<T, BusError>,
    ) -> Result<T, BusError> {
        self.cs.set_low().map_err(|_| BusError::ChipSelect)?;
        let result = op(&mut self.spi);
        self.cs.set_high().map_err(|_| BusError::ChipSelect)?;
        result
    }
}

impl<SPI, CS> RegisterBus for SpiRegisterBus<SPI, CS>
where
    SPI: Transfer<u8> + Write<u8>,
    CS: OutputPin,
{
    type Error = BusError;

    fn read_register(&mut self, addr: u8) -> Result<u8, BusError> {
        self.transaction(|spi| {
            let mut buffer = [addr & !WRITE_FLAG, 0];
            spi.transfer(&mut buffer).map_err(|_| BusError::Spi)?;
            Ok(buffer[1])
        })
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), BusError> {
        self.transaction(|spi| {
            spi.write(&[addr | WRITE_FLAG, value])
                .map_err(|_| BusError::Spi)
        })
    }

    fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<(), BusError> {
        self.transaction(|spi| {
            spi.write(&[addr | WRITE_FLAG]).map_err(|_| BusError::Spi)?;
            spi.write(data).map_err(|_| BusError::Spi)
        })
    }
}
