use core::fmt::{self, Display, Formatter};

// https://github.com/adafruit/Adafruit_Seesaw
use embedded_hal::i2c::{Error, ErrorKind};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Default I2C address of a seesaw
pub const SEESAW_DEFAULT_ADDRESS: u8 = 0x49;

/// Time the firmware needs after a software reset before it answers again
pub(crate) const RESET_SETTLE_MS: u32 = 500;
/// Time between selecting a register and reading it back
pub(crate) const READ_DELAY_US: u32 = 8_000;
/// Time the firmware needs to apply a PWM or ADC command
pub(crate) const COMMAND_DELAY_US: u32 = 1_000;

/// Largest payload any command carries (a 32-bit pin mask)
pub(crate) const MAX_PAYLOAD: usize = 4;

pub mod base {
    //! Module base addresses
    pub const STATUS: u8 = 0x00;
    pub const GPIO: u8 = 0x01;
    pub const TIMER: u8 = 0x08;
    pub const ADC: u8 = 0x09;
}

pub mod status {
    pub const HW_ID: u8 = 0x01;
    pub const VERSION: u8 = 0x02;
    pub const SWRST: u8 = 0x7F;
}

pub mod gpio {
    pub const DIRSET_BULK: u8 = 0x02;
    pub const DIRCLR_BULK: u8 = 0x03;
    pub const BULK: u8 = 0x04;
    pub const BULK_SET: u8 = 0x05;
    pub const BULK_CLR: u8 = 0x06;
    pub const PULLENSET: u8 = 0x0B;
    pub const PULLENCLR: u8 = 0x0C;
}

pub mod timer {
    pub const PWM: u8 = 0x01;
}

pub mod adc {
    pub const CHANNEL_OFFSET: u8 = 0x07;
}

/// Hardware id reported by the seesaw status module.
#[derive(Debug, Clone, Copy, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipId {
    SAMD09 = 0x55,
    ATtiny8x7 = 0x87,
}

impl Display for ChipId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ChipId::SAMD09 => write!(f, "SAMD09"),
            ChipId::ATtiny8x7 => write!(f, "ATtiny8x7"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmWidth {
    Bits8,
    Bits16,
}

/// Which seesaw pins can do what, per firmware variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinMapping {
    pub analog_pins: &'static [u8],
    pub pwm_pins: &'static [u8],
    pub pwm_width: PwmWidth,
}

const SAMD09_MAPPING: PinMapping = PinMapping {
    analog_pins: &[2, 3, 4, 5],
    pwm_pins: &[4, 5, 6, 7],
    pwm_width: PwmWidth::Bits8,
};

const ATTINY8X7_MAPPING: PinMapping = PinMapping {
    analog_pins: &[0, 1, 2, 3, 4, 5, 14, 15, 16],
    pwm_pins: &[0, 1, 9, 12, 13],
    pwm_width: PwmWidth::Bits16,
};

impl ChipId {
    pub fn pin_mapping(self) -> &'static PinMapping {
        match self {
            ChipId::SAMD09 => &SAMD09_MAPPING,
            ChipId::ATtiny8x7 => &ATTINY8X7_MAPPING,
        }
    }

    /// ADC channel register offset for `pin`.
    ///
    /// The SAMD09 firmware numbers its ADC channels by position in the analog
    /// pin list, the ATtiny firmware by pin number.
    pub(crate) fn adc_channel(self, pin: u8) -> Option<u8> {
        let position = self
            .pin_mapping()
            .analog_pins
            .iter()
            .position(|p| *p == pin)?;
        match self {
            ChipId::SAMD09 => Some(position as u8),
            ChipId::ATtiny8x7 => Some(pin),
        }
    }

    /// Leading byte of a timer PWM command for `pin`.
    pub(crate) fn pwm_channel(self, pin: u8) -> Option<u8> {
        let position = self.pin_mapping().pwm_pins.iter().position(|p| *p == pin)?;
        match self {
            ChipId::SAMD09 => Some(position as u8),
            ChipId::ATtiny8x7 => Some(pin),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Output,
    Input,
    InputPullup,
    InputPulldown,
}

/// Single-bit mask for a seesaw pin. Only the first 32 pins are addressable.
pub fn pin_mask(pin: u8) -> Result<u32, SeesawError> {
    if pin < 32 {
        Ok(1 << pin)
    } else {
        Err(SeesawError::InvalidPin(pin))
    }
}

/// Errors that can occur when interacting with a seesaw
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeesawError {
    /// The status module reported an id that is not a known seesaw firmware
    WrongHardwareId(u8),
    /// Pin number outside the 32-bit pin mask
    InvalidPin(u8),
    /// Pin has no ADC channel on this firmware
    InvalidAnalogPin(u8),
    /// Pin has no PWM channel on this firmware
    InvalidPwmPin(u8),
    /// `begin` has not identified the chip yet
    NotStarted,
    I2CError(ErrorKind),
}

impl Display for SeesawError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SeesawError::WrongHardwareId(id) => write!(
                f,
                "seesaw hardware id 0x{:02X} is not correct, expected 0x{:02X} or 0x{:02X}; check the wiring",
                id,
                u8::from(ChipId::SAMD09),
                u8::from(ChipId::ATtiny8x7)
            ),
            SeesawError::InvalidPin(pin) => write!(f, "invalid seesaw pin {}", pin),
            SeesawError::InvalidAnalogPin(pin) => write!(f, "invalid ADC pin {}", pin),
            SeesawError::InvalidPwmPin(pin) => write!(f, "invalid PWM pin {}", pin),
            SeesawError::NotStarted => write!(f, "seesaw not started"),
            SeesawError::I2CError(kind) => write!(f, "I2C error: {:?}", kind),
        }
    }
}

impl<E> From<E> for SeesawError
where
    E: Error,
{
    fn from(e: E) -> Self {
        SeesawError::I2CError(e.kind())
    }
}

pub mod blocking;
