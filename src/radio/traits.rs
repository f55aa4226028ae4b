use core::time::Duration;

/// Transceiver operating mode
///
/// Exactly one mode is active at a time. Registers are only programmed in
/// `Standby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioMode {
    /// Lowest power, FIFO contents lost
    Sleep,
    /// Oscillator running, configuration enabled
    Standby,
    /// Sending the FIFO contents
    Transmit,
}

/// Generic radio interface trait
pub trait Radio {
    /// Error type for radio operations
    type Error;

    /// Program the baseline configuration and leave the radio asleep
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Transmit one frame, waiting at most `timeout` for completion
    ///
    /// The radio is back in [`RadioMode::Sleep`] when this returns, whatever
    /// the outcome.
    fn transmit(&mut self, frame: &[u8], timeout: Duration) -> Result<(), Self::Error>;

    /// Timeout used when the caller does not pick one
    fn tx_timeout(&self) -> Duration;

    /// Put the radio into sleep mode
    fn sleep(&mut self) -> Result<(), Self::Error>;

    /// Put the radio into standby mode
    fn standby(&mut self) -> Result<(), Self::Error>;

    /// Current operating mode
    fn mode(&self) -> RadioMode;
}
