//! Pin map of the Monster M4SK
//!
//! The terms "left" and "right" are always from the perspective of looking
//! out of the mask. The right screen is the one with the USB port directly
//! above it.

/// Seesaw pins. These numbers are the expander's physical pin map.
pub mod seesaw {
    pub const LIGHT_SENSOR: u8 = 2;
    pub const VCC_SENSOR: u8 = 3;
    pub const BACKLIGHT: u8 = 5;
    pub const TFT_RESET: u8 = 8;
    pub const SWITCH1: u8 = 9;
    pub const SWITCH2: u8 = 10;
    pub const SWITCH3: u8 = 11;

    pub const SWITCHES: [u8; 3] = [SWITCH1, SWITCH2, SWITCH3];
}

/// Host (SAMD51) pins the board layer asks the [`Platform`](crate::Platform) for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostPin {
    LeftTftSck,
    LeftTftMosi,
    LeftTftCs,
    LeftTftDc,
    RightTftSck,
    RightTftMosi,
    RightTftCs,
    RightTftDc,
    RightTftRst,
    /// Right backlight PWM
    RightTftLite,
    AccelerometerInterrupt,
    /// Capacitive touch pad on the nose
    Nose,
}

/// Clock and data lines of a write-only SPI bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiPins {
    pub sck: HostPin,
    pub mosi: HostPin,
}

pub const LEFT_TFT_SPI: SpiPins = SpiPins {
    sck: HostPin::LeftTftSck,
    mosi: HostPin::LeftTftMosi,
};

pub const RIGHT_TFT_SPI: SpiPins = SpiPins {
    sck: HostPin::RightTftSck,
    mosi: HostPin::RightTftMosi,
};
