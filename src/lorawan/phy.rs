use core::fmt;
use core::str::FromStr;

/// Modem register values for one data-rate profile
///
/// Written to `RegModemConfig2`, `RegModemConfig1` and `RegModemConfig3`
/// respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataRateConfig {
    /// Spreading factor and CRC bits
    pub modem_config2: u8,
    /// Bandwidth, coding rate and header mode bits
    pub modem_config1: u8,
    /// Low data rate optimization and AGC bits
    pub modem_config3: u8,
}

/// Data rate profile
///
/// Spreading factor and bandwidth; coding rate is always 4/5 with an
/// explicit header and CRC on.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    SF7BW125,
    SF7BW250,
    SF8BW125,
    SF9BW125,
    SF10BW125,
    SF11BW125,
    SF12BW125,
}

impl DataRate {
    /// Every supported profile
    pub const ALL: [DataRate; 7] = [
        DataRate::SF7BW125,
        DataRate::SF7BW250,
        DataRate::SF8BW125,
        DataRate::SF9BW125,
        DataRate::SF10BW125,
        DataRate::SF11BW125,
        DataRate::SF12BW125,
    ];

    /// Profile name, e.g. `"SF7BW125"`
    pub fn name(&self) -> &'static str {
        match self {
            DataRate::SF7BW125 => "SF7BW125",
            DataRate::SF7BW250 => "SF7BW250",
            DataRate::SF8BW125 => "SF8BW125",
            DataRate::SF9BW125 => "SF9BW125",
            DataRate::SF10BW125 => "SF10BW125",
            DataRate::SF11BW125 => "SF11BW125",
            DataRate::SF12BW125 => "SF12BW125",
        }
    }

    /// Look a profile up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|dr| dr.name() == name)
    }

    /// Get spreading factor
    pub fn spreading_factor(&self) -> u8 {
        match self {
            DataRate::SF7BW125 | DataRate::SF7BW250 => 7,
            DataRate::SF8BW125 => 8,
            DataRate::SF9BW125 => 9,
            DataRate::SF10BW125 => 10,
            DataRate::SF11BW125 => 11,
            DataRate::SF12BW125 => 12,
        }
    }

    /// Get bandwidth in Hz
    pub fn bandwidth(&self) -> u32 {
        match self {
            DataRate::SF7BW250 => 250_000,
            _ => 125_000,
        }
    }

    /// Modem register values for this profile
    pub fn config(&self) -> DataRateConfig {
        // SF11/SF12 at 125 kHz need low data rate optimization (0x08).
        let (modem_config2, modem_config1, modem_config3) = match self {
            DataRate::SF7BW125 => (0x74, 0x72, 0x04),
            DataRate::SF7BW250 => (0x74, 0x82, 0x04),
            DataRate::SF8BW125 => (0x84, 0x72, 0x04),
            DataRate::SF9BW125 => (0x94, 0x72, 0x04),
            DataRate::SF10BW125 => (0xA4, 0x72, 0x04),
            DataRate::SF11BW125 => (0xB4, 0x72, 0x0C),
            DataRate::SF12BW125 => (0xC4, 0x72, 0x0C),
        };
        DataRateConfig {
            modem_config2,
            modem_config1,
            modem_config3,
        }
    }
}

/// Unknown data-rate name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownDataRate;

impl fmt::Display for UnknownDataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid or unsupported data rate")
    }
}

impl FromStr for DataRate {
    type Err = UnknownDataRate;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or(UnknownDataRate)
    }
}

impl fmt::Display for DataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
