//! Eye displays
//!
//! Two ST7789 240x240 panels, each on its own write-only SPI bus. The
//! controller's frame memory is 240x320; the visible window starts at row 80.

use embedded_graphics_core::geometry::{OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::Rgb565;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::interface::{Interface, InterfacePixelFormat, SpiInterface};
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;
use mipidsi::{Builder, Display, NoResetPin};

use crate::error::BoardError;
use crate::pins::{HostPin, SpiPins, LEFT_TFT_SPI, RIGHT_TFT_SPI};
use crate::platform::Platform;

/// Display dimensions
pub const DISPLAY_WIDTH: u16 = 240;
pub const DISPLAY_HEIGHT: u16 = 240;
/// First visible row in controller memory
pub const ROW_START: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn spi_pins(self) -> SpiPins {
        match self {
            Eye::Left => LEFT_TFT_SPI,
            Eye::Right => RIGHT_TFT_SPI,
        }
    }

    pub fn cs(self) -> HostPin {
        match self {
            Eye::Left => HostPin::LeftTftCs,
            Eye::Right => HostPin::RightTftCs,
        }
    }

    pub fn dc(self) -> HostPin {
        match self {
            Eye::Left => HostPin::LeftTftDc,
            Eye::Right => HostPin::RightTftDc,
        }
    }
}

/// Command buffers for the two display interfaces.
///
/// Larger buffers mean fewer SPI transactions per pixel batch.
#[derive(Debug)]
pub struct DisplayBuffers<'a> {
    pub left: &'a mut [u8],
    pub right: &'a mut [u8],
}

impl<'a> DisplayBuffers<'a> {
    pub fn new(left: &'a mut [u8], right: &'a mut [u8]) -> Self {
        Self { left, right }
    }
}

/// SPI interface of one eye as built from a [`Platform`]
pub type EyeInterface<'a, P> = SpiInterface<
    'a,
    ExclusiveDevice<<P as Platform>::SpiBus, <P as Platform>::Output, NoDelay>,
    <P as Platform>::Output,
>;

/// The left panel's reset line is on the expander and pulsed by hand
pub type LeftDisplay<'a, P> = EyeDisplay<EyeInterface<'a, P>, NoResetPin>;
pub type RightDisplay<'a, P> = EyeDisplay<EyeInterface<'a, P>, <P as Platform>::Output>;

/// An initialized eye panel.
///
/// Draw through [`inner_mut`](Self::inner_mut); the wrapper keeps the side
/// and the fixed geometry.
///
/// Not safe for concurrent use: the panel owns its SPI bus and control pins,
/// so sharing one across threads needs external synchronization.
pub struct EyeDisplay<DI, RST>
where
    DI: Interface,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
{
    eye: Eye,
    inner: Display<DI, ST7789, RST>,
}

impl<DI, RST> EyeDisplay<DI, RST>
where
    DI: Interface,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
{
    pub fn new(eye: Eye, inner: Display<DI, ST7789, RST>) -> Self {
        Self { eye, inner }
    }

    pub fn eye(&self) -> Eye {
        self.eye
    }

    pub fn width(&self) -> u16 {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> u16 {
        DISPLAY_HEIGHT
    }

    pub fn row_start(&self) -> u16 {
        ROW_START
    }

    pub fn inner(&self) -> &Display<DI, ST7789, RST> {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut Display<DI, ST7789, RST> {
        &mut self.inner
    }

    pub fn into_inner(self) -> Display<DI, ST7789, RST> {
        self.inner
    }
}

impl<DI, RST> OriginDimensions for EyeDisplay<DI, RST>
where
    DI: Interface,
    Rgb565: InterfacePixelFormat<DI::Word>,
    RST: OutputPin,
{
    fn size(&self) -> Size {
        Size::new(u32::from(DISPLAY_WIDTH), u32::from(DISPLAY_HEIGHT))
    }
}

/// Panel settings shared by both eyes.
fn panel<DI>(di: DI) -> Builder<DI, ST7789, NoResetPin>
where
    DI: Interface,
    Rgb565: InterfacePixelFormat<DI::Word>,
{
    Builder::new(ST7789, di)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .display_offset(0, ROW_START)
        .invert_colors(ColorInversion::Inverted)
}

/// SPI bus, chip select and data/command line of one eye.
fn interface<'a, P>(
    platform: &mut P,
    eye: Eye,
    buffer: &'a mut [u8],
) -> Result<EyeInterface<'a, P>, BoardError<P::Error>>
where
    P: Platform,
{
    let pins = eye.spi_pins();
    let spi = platform
        .spi(pins)
        .map_err(|e| BoardError::Peripheral(pins.sck, e))?;
    let cs = platform
        .output(eye.cs())
        .map_err(|e| BoardError::Peripheral(eye.cs(), e))?;
    let dc = platform
        .output(eye.dc())
        .map_err(|e| BoardError::Peripheral(eye.dc(), e))?;

    // Attach the SPI device using the chip-select control pin (no delay used)
    let device = ExclusiveDevice::new_no_delay(spi, cs).map_err(|_| BoardError::Display(eye))?;
    Ok(SpiInterface::new(device, dc, buffer))
}

/// Bring up the left panel. Its reset must already have been pulsed.
pub(crate) fn init_left<'a, P, D>(
    platform: &mut P,
    buffer: &'a mut [u8],
    delay: &mut D,
) -> Result<LeftDisplay<'a, P>, BoardError<P::Error>>
where
    P: Platform,
    D: DelayNs,
{
    let di = interface(platform, Eye::Left, buffer)?;
    let inner = panel(di)
        .init(delay)
        .map_err(|_| BoardError::Display(Eye::Left))?;
    Ok(EyeDisplay::new(Eye::Left, inner))
}

/// Bring up the right panel, reset through its host pin.
pub(crate) fn init_right<'a, P, D>(
    platform: &mut P,
    buffer: &'a mut [u8],
    delay: &mut D,
) -> Result<RightDisplay<'a, P>, BoardError<P::Error>>
where
    P: Platform,
    D: DelayNs,
{
    let di = interface(platform, Eye::Right, buffer)?;
    let rst = platform
        .output(HostPin::RightTftRst)
        .map_err(|e| BoardError::Peripheral(HostPin::RightTftRst, e))?;
    let inner = panel(di)
        .reset_pin(rst)
        .init(delay)
        .map_err(|_| BoardError::Display(Eye::Right))?;
    Ok(EyeDisplay::new(Eye::Right, inner))
}
