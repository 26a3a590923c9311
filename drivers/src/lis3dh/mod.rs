use core::fmt::{self, Display, Formatter};

// https://www.st.com/resource/en/datasheet/lis3dh.pdf
use bitflags::bitflags;
use embedded_hal::i2c::{Error, ErrorKind, NoAcknowledgeSource};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Address with SDO/SA0 pulled low
pub const DEFAULT_ADDRESS: u8 = 0x18;
/// Address with SDO/SA0 pulled high
pub const ALTERNATE_ADDRESS: u8 = 0x19;

/// `WHO_AM_I` value of every LIS3DH
pub const DEVICE_ID: u8 = 0x33;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f32 = 9.806;

pub(crate) mod reg {
    pub const WHO_AM_I: u8 = 0x0F;
    pub const TEMP_CFG: u8 = 0x1F;
    pub const CTRL1: u8 = 0x20;
    pub const CTRL3: u8 = 0x22;
    pub const CTRL4: u8 = 0x23;
    pub const CTRL5: u8 = 0x24;
    pub const OUT_X_L: u8 = 0x28;
    pub const CLICK_CFG: u8 = 0x38;
    pub const CLICK_SRC: u8 = 0x39;
    pub const CLICK_THS: u8 = 0x3A;
    pub const TIME_LIMIT: u8 = 0x3B;
    pub const TIME_LATENCY: u8 = 0x3C;
    pub const TIME_WINDOW: u8 = 0x3D;
}

/// Set on a register address to read consecutive registers in one transfer
pub(crate) const AUTO_INCREMENT: u8 = 0x80;

/// Time the memory reboot takes (datasheet: 5 ms)
pub(crate) const BOOT_DELAY_MS: u32 = 10;

/// Full-scale selection, `FS` bits of `CTRL_REG4`.
#[derive(Debug, Clone, Copy, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Range {
    G2 = 0b00,
    G4 = 0b01,
    G8 = 0b10,
    G16 = 0b11,
}

impl Range {
    /// Raw counts per g for a left-justified 16-bit sample.
    pub fn divider(self) -> f32 {
        match self {
            Range::G2 => 16380.0,
            Range::G4 => 8190.0,
            Range::G8 => 4096.0,
            Range::G16 => 1365.0,
        }
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Range::G2 => write!(f, "±2 G"),
            Range::G4 => write!(f, "±4 G"),
            Range::G8 => write!(f, "±8 G"),
            Range::G16 => write!(f, "±16 G"),
        }
    }
}

/// Output data rate, `ODR` bits of `CTRL_REG1`.
#[derive(Debug, Clone, Copy, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    PowerDown = 0b0000,
    Hz1 = 0b0001,
    Hz10 = 0b0010,
    Hz25 = 0b0011,
    Hz50 = 0b0100,
    Hz100 = 0b0101,
    Hz200 = 0b0110,
    Hz400 = 0b0111,
    LowPower1600Hz = 0b1000,
    Hz1344LowPower5376Hz = 0b1001,
}

bitflags! {
    /// `CLICK_CFG` register: which axes and click kinds raise an interrupt.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ClickConfig: u8 {
        const X_SINGLE = 1 << 0;
        const X_DOUBLE = 1 << 1;
        const Y_SINGLE = 1 << 2;
        const Y_DOUBLE = 1 << 3;
        const Z_SINGLE = 1 << 4;
        const Z_DOUBLE = 1 << 5;
    }
}

impl ClickConfig {
    pub const SINGLE: ClickConfig = ClickConfig::X_SINGLE
        .union(ClickConfig::Y_SINGLE)
        .union(ClickConfig::Z_SINGLE);
    pub const DOUBLE: ClickConfig = ClickConfig::X_DOUBLE
        .union(ClickConfig::Y_DOUBLE)
        .union(ClickConfig::Z_DOUBLE);
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClickConfig {
    fn format(&self, f: defmt::Formatter) {
        self.iter_names().for_each(|name| {
            defmt::write!(f, "{}", name.0);
        });
    }
}

/// Tap detection mode for [`blocking::Lis3dh::set_tap`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapMode {
    Disabled,
    /// Single taps on all axes
    Single,
    /// Double taps on all axes
    Double,
    Custom(ClickConfig),
}

/// Click timing registers, in ODR periods.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapTiming {
    pub time_limit: u8,
    pub time_latency: u8,
    pub time_window: u8,
}

impl Default for TapTiming {
    fn default() -> Self {
        Self {
            time_limit: 10,
            time_latency: 20,
            time_window: 255,
        }
    }
}

/// One acceleration sample in m/s².
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub(crate) fn from_raw(raw: [i16; 3], range: Range) -> Self {
        let scale = STANDARD_GRAVITY / range.divider();
        Self {
            x: f32::from(raw[0]) * scale,
            y: f32::from(raw[1]) * scale,
            z: f32::from(raw[2]) * scale,
        }
    }

    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

impl Display for Acceleration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3}) m/s²", self.x, self.y, self.z)
    }
}

/// Errors that can occur when interacting with the LIS3DH
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lis3dhError {
    /// Nothing acknowledged the address during the identity read
    NotFound,
    /// Something answered but `WHO_AM_I` is not 0x33
    WrongDevice(u8),
    /// A register field holds a reserved value
    InvalidRegisterValue(u8),
    I2CError(ErrorKind),
    PinError,
}

impl Lis3dhError {
    /// Classify a failed identity read.
    ///
    /// Address NACKs mean "no device here". Many HALs cannot tell which phase
    /// was not acknowledged, so `Unknown` counts as an address NACK too.
    pub(crate) fn from_probe(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => Lis3dhError::NotFound,
            other => Lis3dhError::I2CError(other),
        }
    }
}

impl Display for Lis3dhError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Lis3dhError::NotFound => write!(f, "no I2C device at the LIS3DH address"),
            Lis3dhError::WrongDevice(id) => {
                write!(f, "failed to find LIS3DH, WHO_AM_I is 0x{:02X}", id)
            }
            Lis3dhError::InvalidRegisterValue(value) => {
                write!(f, "reserved register value 0x{:02X}", value)
            }
            Lis3dhError::I2CError(kind) => write!(f, "I2C error: {:?}", kind),
            Lis3dhError::PinError => write!(f, "interrupt pin error"),
        }
    }
}

impl<E> From<E> for Lis3dhError
where
    E: Error,
{
    fn from(e: E) -> Self {
        Lis3dhError::I2CError(e.kind())
    }
}

pub mod blocking;
