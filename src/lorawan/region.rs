use crate::config::device::Region;

/// Crystal oscillator frequency of the SX127x
const FXOSC: u64 = 32_000_000;

/// Frequency synthesizer step is FXOSC / 2^19
const FSTEP_SHIFT: u32 = 19;

/// Carrier frequency as the `RegFrfMsb`, `RegFrfMid`, `RegFrfLsb` triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Register bytes, most significant first
    pub frf: [u8; 3],
}

impl ChannelConfig {
    /// Wrap a register triple
    pub const fn new(frf: [u8; 3]) -> Self {
        Self { frf }
    }

    /// Compute the register triple for a carrier frequency in Hz
    pub const fn from_frequency(freq: u32) -> Self {
        let frf = ((freq as u64) << FSTEP_SHIFT) / FXOSC;
        Self::new([(frf >> 16) as u8, (frf >> 8) as u8, frf as u8])
    }

    /// Carrier frequency in Hz (rounded down to the synthesizer step)
    pub fn frequency_hz(&self) -> u32 {
        let [msb, mid, lsb] = self.frf;
        let frf = u64::from(u32::from_be_bytes([0, msb, mid, lsb]));
        ((frf * FXOSC) >> FSTEP_SHIFT) as u32
    }
}

/// US915 sub-band 2, 903.9 - 905.3 MHz
const US915: [ChannelConfig; 8] = [
    ChannelConfig::new([0xE1, 0xF9, 0x99]), // 903.9 MHz
    ChannelConfig::new([0xE2, 0x06, 0x66]), // 904.1 MHz
    ChannelConfig::new([0xE2, 0x13, 0x33]), // 904.3 MHz
    ChannelConfig::new([0xE2, 0x20, 0x00]), // 904.5 MHz
    ChannelConfig::new([0xE2, 0x2C, 0xCC]), // 904.7 MHz
    ChannelConfig::new([0xE2, 0x39, 0x99]), // 904.9 MHz
    ChannelConfig::new([0xE2, 0x46, 0x66]), // 905.1 MHz
    ChannelConfig::new([0xE2, 0x53, 0x33]), // 905.3 MHz
];

const EU868: [ChannelConfig; 8] = [
    ChannelConfig::new([0xD9, 0x06, 0x66]), // 868.1 MHz
    ChannelConfig::new([0xD9, 0x13, 0x33]), // 868.3 MHz
    ChannelConfig::new([0xD9, 0x20, 0x00]), // 868.5 MHz
    ChannelConfig::new([0xD8, 0xC6, 0x66]), // 867.1 MHz
    ChannelConfig::new([0xD8, 0xD3, 0x33]), // 867.3 MHz
    ChannelConfig::new([0xD8, 0xE0, 0x00]), // 867.5 MHz
    ChannelConfig::new([0xD8, 0xEC, 0xCC]), // 867.7 MHz
    ChannelConfig::new([0xD8, 0xF9, 0x99]), // 867.9 MHz
];

/// AU915 sub-band 2, 916.8 - 918.2 MHz
const AU915: [ChannelConfig; 8] = [
    ChannelConfig::new([0xE5, 0x33, 0x33]), // 916.8 MHz
    ChannelConfig::new([0xE5, 0x40, 0x00]), // 917.0 MHz
    ChannelConfig::new([0xE5, 0x4C, 0xCC]), // 917.2 MHz
    ChannelConfig::new([0xE5, 0x59, 0x99]), // 917.4 MHz
    ChannelConfig::new([0xE5, 0x66, 0x66]), // 917.6 MHz
    ChannelConfig::new([0xE5, 0x73, 0x33]), // 917.8 MHz
    ChannelConfig::new([0xE5, 0x80, 0x00]), // 918.0 MHz
    ChannelConfig::new([0xE5, 0x8C, 0xCC]), // 918.2 MHz
];

const AS923: [ChannelConfig; 8] = [
    ChannelConfig::new([0xE6, 0xCC, 0xCC]), // 923.2 MHz
    ChannelConfig::new([0xE6, 0xD9, 0x99]), // 923.4 MHz
    ChannelConfig::new([0xE6, 0x8C, 0xCC]), // 922.2 MHz
    ChannelConfig::new([0xE6, 0x99, 0x99]), // 922.4 MHz
    ChannelConfig::new([0xE6, 0xA6, 0x66]), // 922.6 MHz
    ChannelConfig::new([0xE6, 0xB3, 0x33]), // 922.8 MHz
    ChannelConfig::new([0xE6, 0xC0, 0x00]), // 923.0 MHz
    ChannelConfig::new([0xE6, 0x80, 0x00]), // 922.0 MHz
];

const CN470: [ChannelConfig; 8] = [
    ChannelConfig::new([0x79, 0x93, 0x33]), // 486.3 MHz
    ChannelConfig::new([0x79, 0xA0, 0x00]), // 486.5 MHz
    ChannelConfig::new([0x79, 0xAC, 0xCC]), // 486.7 MHz
    ChannelConfig::new([0x79, 0xB9, 0x99]), // 486.9 MHz
    ChannelConfig::new([0x79, 0xC6, 0x66]), // 487.1 MHz
    ChannelConfig::new([0x79, 0xD3, 0x33]), // 487.3 MHz
    ChannelConfig::new([0x79, 0xE0, 0x00]), // 487.5 MHz
    ChannelConfig::new([0x79, 0xEC, 0xCC]), // 487.7 MHz
];

/// Uplink channel table of a region
///
/// Every table holds at least one channel.
pub fn channel_plan(region: Region) -> &'static [ChannelConfig] {
    match region {
        Region::US => &US915,
        Region::AS => &AS923,
        Region::AU => &AU915,
        Region::EU => &EU868,
        Region::CN => &CN470,
    }
}
