//! Host-side I2C simulators shared by the driver tests.

use core::cell::RefCell;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, InputPin};
use embedded_hal::i2c::{self, ErrorKind, I2c, NoAcknowledgeSource, Operation};
use std::rc::Rc;
use std::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimError(pub ErrorKind);

impl i2c::Error for SimError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

const ADDRESS_NACK: SimError = SimError(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));

#[derive(Debug)]
struct RegisterState {
    address: u8,
    registers: [u8; 256],
    pointer: u8,
    writes: Vec<(u8, u8)>,
    fail_with: Option<ErrorKind>,
}

/// A device with flat 8-bit registers. Bit 7 of the register address selects
/// auto-increment, as on the LIS3DH.
#[derive(Debug, Clone)]
pub struct RegisterBus {
    state: Rc<RefCell<RegisterState>>,
}

impl RegisterBus {
    pub fn new(address: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegisterState {
                address,
                registers: [0; 256],
                pointer: 0,
                writes: Vec::new(),
                fail_with: None,
            })),
        }
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.state.borrow().registers[reg as usize]
    }

    pub fn set_register(&self, reg: u8, value: u8) {
        self.state.borrow_mut().registers[reg as usize] = value;
    }

    pub fn set_registers(&self, reg: u8, values: &[u8]) {
        for (offset, value) in values.iter().enumerate() {
            self.set_register(reg + offset as u8, *value);
        }
    }

    /// Every `(register, value)` pair written, in order.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.state.borrow().writes.clone()
    }

    pub fn fail_with(&self, kind: ErrorKind) {
        self.state.borrow_mut().fail_with = Some(kind);
    }
}

impl i2c::ErrorType for RegisterBus {
    type Error = SimError;
}

impl I2c for RegisterBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if address != state.address {
            return Err(ADDRESS_NACK);
        }
        if let Some(kind) = state.fail_with {
            return Err(SimError(kind));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let Some((reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    state.pointer = *reg & 0x7F;
                    for value in data {
                        let reg = state.pointer;
                        state.registers[reg as usize] = *value;
                        state.writes.push((reg, *value));
                        state.pointer = state.pointer.wrapping_add(1);
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = state.registers[state.pointer as usize];
                        state.pointer = state.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct SeesawState {
    address: u8,
    hardware_id: u8,
    version: u32,
    pointer: (u8, u8),
    writes: Vec<Vec<u8>>,
    adc: [u16; 32],
    gpio: u32,
}

/// Register-level model of a seesaw: records every command and answers
/// status, ADC and GPIO reads.
#[derive(Debug, Clone)]
pub struct SeesawBus {
    state: Rc<RefCell<SeesawState>>,
}

impl SeesawBus {
    pub fn new(address: u8, hardware_id: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(SeesawState {
                address,
                hardware_id,
                version: 0x0FA2_2024,
                pointer: (0, 0),
                writes: Vec::new(),
                adc: [0; 32],
                gpio: 0,
            })),
        }
    }

    pub fn set_adc(&self, channel: usize, value: u16) {
        self.state.borrow_mut().adc[channel] = value;
    }

    pub fn set_gpio(&self, bits: u32) {
        self.state.borrow_mut().gpio = bits;
    }

    /// Every command written as `[base, function, payload...]`, excluding
    /// the bare two-byte pointer writes that precede reads.
    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|w| w.len() > 2)
            .cloned()
            .collect()
    }
}

impl i2c::ErrorType for SeesawBus {
    type Error = SimError;
}

impl I2c for SeesawBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if address != state.address {
            return Err(ADDRESS_NACK);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if bytes.len() >= 2 {
                        state.pointer = (bytes[0], bytes[1]);
                    }
                    state.writes.push(bytes.to_vec());
                }
                Operation::Read(buffer) => {
                    let reply: Vec<u8> = match state.pointer {
                        (0x00, 0x01) => std::vec![state.hardware_id],
                        (0x00, 0x02) => state.version.to_be_bytes().to_vec(),
                        (0x01, 0x04) => state.gpio.to_be_bytes().to_vec(),
                        (0x09, func) if func >= 0x07 => {
                            state.adc[(func - 0x07) as usize].to_be_bytes().to_vec()
                        }
                        _ => Vec::new(),
                    };
                    for (i, byte) in buffer.iter_mut().enumerate() {
                        *byte = reply.get(i).copied().unwrap_or(0);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that only accumulates the requested time.
#[derive(Debug, Clone, Default)]
pub struct SimDelay {
    elapsed_ns: Rc<RefCell<u64>>,
}

impl SimDelay {
    pub fn elapsed_ms(&self) -> u64 {
        *self.elapsed_ns.borrow() / 1_000_000
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.elapsed_ns.borrow_mut() += u64::from(ns);
    }
}

/// Input pin with a level that tests can flip.
#[derive(Debug, Clone, Default)]
pub struct SimPin {
    high: Rc<RefCell<bool>>,
}

impl SimPin {
    pub fn set(&self, high: bool) {
        *self.high.borrow_mut() = high;
    }
}

impl PinErrorType for SimPin {
    type Error = core::convert::Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(*self.high.borrow())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!*self.high.borrow())
    }
}
