//! SPI peripheral, master mode, polled.
//!
//! Example use:
//!
//! ```ignore
//! // Enable system clock.
//! clock::init();
//!
//! // Create the spi bus.
//! let mut bus = spi::Config {
//!     prescaler: spi::Prescaler::Div8,
//!     mode: spi::Mode::Mode0,
//!     byteorder: spi::ByteOrder::MsbFirst,
//!     retries: spi::DEFAULT_RETRIES,
//! }
//! .make(spi::Spi::Spi1);
//!
//! // Exchange bytes with the peer device.
//! bus.send(0x9F)?;
//! let id = bus.receive()?;
//! ```

mod pac;

#[cfg(test)]
mod tests;

pub use pac::{Spi, SpiRegs};

use core::fmt;

/// Dummy byte clocked out by [receive][Bus::receive].
///
/// The clock line is only driven while the master shifts a byte out, so a
/// receive-only caller still has to occupy the data register with
/// something.
pub const DUMMY_BYTE: u8 = 0xFF;

/// Default poll budget for a single status wait.
pub const DEFAULT_RETRIES: u32 = 100_000;

/// SPI mode: clock polarity and phase.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum Mode {
    Mode0 = 0,
    Mode1 = 1,
    Mode2 = 2,
    Mode3 = 3,
}

/// SPI transmission byte order.
#[derive(Copy, Clone, Debug)]
pub enum ByteOrder {
    MsbFirst,
    LsbFirst,
}

/// Bus clock prescaler.
///
/// The peripheral clock is divided by a power of two; these are the only
/// divisors the hardware knows.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Div2 = 0b000,
    Div4 = 0b001,
    Div8 = 0b010,
    Div16 = 0b011,
    Div32 = 0b100,
    Div64 = 0b101,
    Div128 = 0b110,
    Div256 = 0b111,
}

impl Prescaler {
    /// Map a raw divisor code onto a prescaler.
    ///
    /// Anything outside the three bit range is rejected before any
    /// register is written.
    pub fn from_code(code: u8) -> Result<Self, Error> {
        match code {
            0b000 => Ok(Self::Div2),
            0b001 => Ok(Self::Div4),
            0b010 => Ok(Self::Div8),
            0b011 => Ok(Self::Div16),
            0b100 => Ok(Self::Div32),
            0b101 => Ok(Self::Div64),
            0b110 => Ok(Self::Div128),
            0b111 => Ok(Self::Div256),
            _ => Err(Error::InvalidPrescaler(code)),
        }
    }

    /// Division factor applied to the peripheral clock.
    #[inline]
    pub fn divisor(self) -> u32 {
        2 << self as u32
    }
}

/// Status flag a transfer waits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flag {
    /// Transmit buffer empty.
    TxEmpty,
    /// Receive buffer not empty.
    RxNotEmpty,
    /// Shift register no longer busy.
    Idle,
}

/// SPI driver errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A raw divisor code outside the supported range.
    InvalidPrescaler(u8),
    /// A status flag did not reach the awaited state within the poll
    /// budget, usually a disconnected or wedged peer. The peripheral is
    /// left as-is; the caller decides whether to re-initialize.
    Timeout(Flag),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidPrescaler(code) => write!(f, "invalid prescaler code {}", code),
            Error::Timeout(flag) => write!(f, "timed out waiting for {:?}", flag),
        }
    }
}

/// Spi bus configuration.
///
/// Use [make][Self::make] for creating a new [spi bus][Bus].
#[derive(Copy, Clone, Debug)]
pub struct Config {
    /// Bus clock prescaler.
    pub prescaler: Prescaler,
    /// Spi mode.
    pub mode: Mode,
    /// Byte order: lsb or msb first.
    pub byteorder: ByteOrder,
    /// Poll budget for each status wait during a transfer.
    pub retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prescaler: Prescaler::Div8,
            mode: Mode::Mode0,
            byteorder: ByteOrder::MsbFirst,
            retries: DEFAULT_RETRIES,
        }
    }
}

impl Config {
    /// Enable the clock domains, route the pins and configure the
    /// peripheral as a master [bus][Bus].
    #[inline]
    pub fn make(self, spi: Spi) -> Bus<Spi> {
        spi.enable_clocks();
        spi.route_pins();
        Bus::new(spi, self)
    }

    fn cr1_bits(&self) -> u32 {
        // Master with software slave management; SSI held high keeps the
        // mode fault detection from tripping on a shared bus.
        let mut cr1 = pac::CR1_MSTR | pac::CR1_SSM | pac::CR1_SSI;
        cr1 |= ((self.prescaler as u32) << pac::CR1_BR_SHIFT) & pac::CR1_BR_MASK;
        if (self.mode as u8 & 0b01) != 0 {
            cr1 |= pac::CR1_CPHA;
        }
        if (self.mode as u8 & 0b10) != 0 {
            cr1 |= pac::CR1_CPOL;
        }
        if let ByteOrder::LsbFirst = self.byteorder {
            cr1 |= pac::CR1_LSBFIRST;
        }
        cr1
    }
}

/// Master SPI bus.
///
/// Does not support slave mode.
/// Does not control the chip select pin.
pub struct Bus<R = Spi> {
    regs: R,
    retries: u32,
}

impl<R: SpiRegs> Bus<R> {
    /// Configure and enable the peripheral behind `regs`.
    ///
    /// All mode bits are committed first; the enable bit is written as a
    /// separate, final step. Enabling earlier risks the peripheral
    /// latching a half-configured state.
    pub fn new(regs: R, config: Config) -> Self {
        let cr1 = config.cr1_bits();
        regs.write_cr1(cr1);
        regs.write_cr1(cr1 | pac::CR1_SPE);
        Self {
            regs,
            retries: config.retries,
        }
    }

    /// Exchange one byte with the peer.
    ///
    /// The bus is full duplex: while `byte` shifts out, the peer's byte
    /// shifts in and is returned.
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8, Error> {
        self.send(byte)?;
        self.wait(Flag::RxNotEmpty)?;
        // Reading the data register also clears the receive flag.
        Ok(self.regs.read_dr())
    }

    /// Send one byte, discarding whatever the peer shifts back.
    ///
    /// The data register is never read.
    pub fn send(&mut self, byte: u8) -> Result<(), Error> {
        // A write while the previous byte still occupies the transmit
        // buffer would corrupt an in-flight transfer.
        self.wait(Flag::TxEmpty)?;
        self.regs.write_dr(byte);
        // The flag re-asserts once the byte has moved into the shift
        // register.
        self.wait(Flag::TxEmpty)?;
        // The peripheral must be quiescent before anything else touches
        // it.
        self.wait(Flag::Idle)?;
        Ok(())
    }

    /// Receive one byte by clocking out [DUMMY_BYTE].
    #[inline]
    pub fn receive(&mut self) -> Result<u8, Error> {
        self.receive_with(DUMMY_BYTE)
    }

    /// Receive one byte, clocking out a caller supplied dummy byte.
    ///
    /// Some peer protocols expect 0x00 instead of 0xFF on the data-out
    /// line while being read.
    #[inline]
    pub fn receive_with(&mut self, dummy: u8) -> Result<u8, Error> {
        self.transfer_byte(dummy)
    }

    fn wait(&self, flag: Flag) -> Result<(), Error> {
        for _ in 0..self.retries {
            let done = match flag {
                Flag::TxEmpty => self.regs.tx_buffer_empty(),
                Flag::RxNotEmpty => self.regs.rx_buffer_not_empty(),
                Flag::Idle => !self.regs.busy(),
            };
            if done {
                return Ok(());
            }
        }
        Err(Error::Timeout(flag))
    }
}

impl Bus<Spi> {
    /// Actual bus clock the peripheral is programmed for.
    #[inline]
    pub fn clock_speed(&self) -> u32 {
        self.regs.clock_speed()
    }
}

impl<R: SpiRegs> embedded_hal::blocking::spi::Transfer<u8> for Bus<R> {
    type Error = Error;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Error> {
        for word in words.iter_mut() {
            *word = self.transfer_byte(*word)?;
        }
        Ok(words)
    }
}

impl<R: SpiRegs> embedded_hal::blocking::spi::Write<u8> for Bus<R> {
    type Error = Error;

    fn write(&mut self, words: &[u8]) -> Result<(), Error> {
        for word in words {
            self.send(*word)?;
        }
        Ok(())
    }
}
