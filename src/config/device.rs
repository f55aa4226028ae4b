use core::fmt;
use core::str::FromStr;

/// AES-128 key (16 bytes)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AESKey([u8; 16]);

impl AESKey {
    /// Wrap raw key bytes
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// Keys never end up in logs or panic messages.
impl fmt::Debug for AESKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AESKey(..)")
    }
}

/// Device address (4 bytes)
///
/// Stored most-significant byte first, the way network consoles print it
/// (`26 01 1B 3C`). On the air and inside the cipher blocks the address is
/// little-endian, see [`DevAddr::to_le_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DevAddr([u8; 4]);

impl DevAddr {
    /// Wrap an address given most-significant byte first
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Address bytes, most-significant byte first
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Address bytes in wire order (least-significant byte first)
    pub fn to_le_bytes(&self) -> [u8; 4] {
        let [a, b, c, d] = self.0;
        [d, c, b, a]
    }

    /// Address as a 32-bit integer
    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

/// Frequency-plan region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    /// United States, 902-928 MHz (sub-band 2)
    US,
    /// Asia, 923 MHz
    AS,
    /// Australia, 915-928 MHz (sub-band 2)
    AU,
    /// Europe, 863-870 MHz
    EU,
    /// China, 470-510 MHz
    CN,
}

impl Region {
    /// Short region tag
    pub fn tag(&self) -> &'static str {
        match self {
            Region::US => "US",
            Region::AS => "AS",
            Region::AU => "AU",
            Region::EU => "EU",
            Region::CN => "CN",
        }
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    /// Any tag containing `US` selects the US plan, so `"US915"` works too.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        if tag.contains("US") {
            return Ok(Region::US);
        }
        match tag {
            "AS" => Ok(Region::AS),
            "AU" => Ok(Region::AU),
            "EU" => Ok(Region::EU),
            "CN" => Ok(Region::CN),
            _ => Err(ConfigError::UnsupportedRegion),
        }
    }
}

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Region tag is not one of the known frequency plans
    UnsupportedRegion,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsupportedRegion => f.write_str("unsupported region"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// ABP session credentials
///
/// Immutable once built and shared by reference for every uplink the device
/// sends.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    dev_addr: DevAddr,
    nwk_skey: AESKey,
    app_skey: AESKey,
    region: Region,
}

impl SessionCredentials {
    /// Create credentials for a known region
    pub fn new(dev_addr: DevAddr, nwk_skey: AESKey, app_skey: AESKey, region: Region) -> Self {
        Self {
            dev_addr,
            nwk_skey,
            app_skey,
            region,
        }
    }

    /// Create credentials from a region tag such as `"US"` or `"EU"`
    pub fn from_region_tag(
        dev_addr: DevAddr,
        nwk_skey: AESKey,
        app_skey: AESKey,
        region: &str,
    ) -> Result<Self, ConfigError> {
        let region = region.parse()?;
        Ok(Self::new(dev_addr, nwk_skey, app_skey, region))
    }

    /// Device address
    pub fn device_address(&self) -> DevAddr {
        self.dev_addr
    }

    /// Network session key, used for the MIC
    pub fn network_key(&self) -> &AESKey {
        &self.nwk_skey
    }

    /// Application session key, used for payload encryption
    pub fn application_key(&self) -> &AESKey {
        &self.app_skey
    }

    /// Frequency-plan region
    pub fn region(&self) -> Region {
        self.region
    }
}

/// Uplink frame counter
///
/// The caller owns the counter and must advance it between sends: a value
/// reused with a different payload reuses the keystream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameCounter(u16);

impl FrameCounter {
    /// Start from a given value
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Current value
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Advance the counter by one
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Return the current value and advance
    pub fn next(&mut self) -> u16 {
        let current = self.0;
        self.increment();
        current
    }
}

impl From<u16> for FrameCounter {
    fn from(value: u16) -> Self {
        Self(value)
    }
}
