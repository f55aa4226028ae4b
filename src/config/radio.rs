use core::time::Duration;

use crate::lorawan::phy::DataRate;

/// Default wait for the TxDone signal
pub const DEFAULT_TX_TIMEOUT: Duration = Duration::from_secs(2);

/// Default pause between TxDone polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// How the transmit frequency is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelMode {
    /// Pick a channel from the region table at random on every send
    Hopping,
    /// Always use the channel at this index of the region table
    Fixed(usize),
}

/// Transceiver configuration applied at initialization
#[derive(Debug, Clone)]
pub struct RadioConfig {
    /// Channel selection
    pub channel: ChannelMode,
    /// Initial data rate
    pub data_rate: DataRate,
    /// Default wait for TxDone
    pub tx_timeout: Duration,
    /// Pause between TxDone polls
    pub poll_interval: Duration,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            channel: ChannelMode::Hopping,
            data_rate: DataRate::SF7BW125,
            tx_timeout: DEFAULT_TX_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RadioConfig {
    /// Pin transmissions to a single channel
    pub fn with_channel(mut self, index: usize) -> Self {
        self.channel = ChannelMode::Fixed(index);
        self
    }

    /// Start with the given data rate
    pub fn with_data_rate(mut self, data_rate: DataRate) -> Self {
        self.data_rate = data_rate;
        self
    }

    /// Change the default TxDone timeout
    pub fn with_tx_timeout(mut self, timeout: Duration) -> Self {
        self.tx_timeout = timeout;
        self
    }

    /// Change the TxDone poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
