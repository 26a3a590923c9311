use core::fmt::{self, Display, Formatter};

use drivers::lis3dh::Lis3dhError;
use drivers::seesaw::SeesawError;
use embedded_hal::pwm;

use crate::display::Eye;
use crate::pins::HostPin;

/// Errors that can occur while bringing up or using the board.
///
/// `E` is the platform's error type.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError<E> {
    /// No I2C handle was supplied and the default bus is unavailable
    Bus(E),
    /// The platform could not provide a pin, bus or channel
    Peripheral(HostPin, E),
    Expander(SeesawError),
    /// Chip select could not be claimed or the panel did not initialize
    Display(Eye),
    /// The right backlight channel rejected a duty cycle
    Backlight(pwm::ErrorKind),
    Accelerometer(Lis3dhError),
    /// The nose pad could not be read
    Touch(E),
    /// A newer controller has taken over the displays
    Released,
}

impl<E> Display for BoardError<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Bus(e) => write!(f, "default I2C bus unavailable: {:?}", e),
            BoardError::Peripheral(pin, e) => write!(f, "{:?} unavailable: {:?}", pin, e),
            BoardError::Expander(e) => write!(f, "GPIO expander: {}", e),
            BoardError::Display(eye) => write!(f, "{:?} display failed to initialize", eye),
            BoardError::Backlight(kind) => write!(f, "backlight PWM error: {:?}", kind),
            BoardError::Accelerometer(e) => write!(f, "accelerometer: {}", e),
            BoardError::Touch(e) => write!(f, "nose touch sensor error: {:?}", e),
            BoardError::Released => write!(f, "displays released to a newer controller"),
        }
    }
}

impl<E> From<SeesawError> for BoardError<E> {
    fn from(e: SeesawError) -> Self {
        BoardError::Expander(e)
    }
}

impl<E> From<Lis3dhError> for BoardError<E> {
    fn from(e: Lis3dhError) -> Self {
        BoardError::Accelerometer(e)
    }
}
